//! Analytic problems used to test the algorithms.

use std::collections::HashMap;

use crate::algorithms::{
    BoxSolver, RelaxedOutcome, RelaxedSolver, SolverError, SubproblemOutcome, WeightedSumSolver,
};
use crate::core::{DecisionBox, Point};

/// Minimise `x` and `(1 - x)^2` with `x` in the union of disjoint sorted intervals of `[0, 1]`.
/// The nondominated set is the image of the feasible set.
#[derive(Debug)]
pub(crate) struct ConvexFront {
    pub intervals: Vec<(f64, f64)>,
    /// When `false`, the elaborate discarding test rejects all boxes.
    pub keep_boxes: bool,
}

impl ConvexFront {
    pub fn new() -> Self {
        Self {
            intervals: vec![(0.0, 1.0)],
            keep_boxes: true,
        }
    }

    /// The feasible set has a hole between 0.3 and 0.7.
    pub fn with_gap() -> Self {
        Self {
            intervals: vec![(0.0, 0.3), (0.7, 1.0)],
            keep_boxes: true,
        }
    }

    pub fn objectives(x: f64) -> Point {
        vec![x, (1.0 - x).powi(2)]
    }

    /// Whether a point lies on the image of the feasible set.
    pub fn is_on_front(&self, y: &[f64]) -> bool {
        self.intervals
            .iter()
            .any(|(a, b)| y[0] >= *a && y[0] <= *b)
            && (y[1] - (1.0 - y[0]).powi(2)).abs() < 1e-9
    }

    /// The parts of the feasible set in `[lower, upper]`.
    fn restrict(&self, lower: f64, upper: f64) -> Vec<(f64, f64)> {
        self.intervals
            .iter()
            .map(|(a, b)| (a.max(lower), b.min(upper)))
            .filter(|(a, b)| a <= b)
            .collect()
    }

    fn outcome(x: f64) -> SubproblemOutcome {
        SubproblemOutcome::Optimal {
            point: Self::objectives(x),
            assignment: HashMap::from([("x".to_string(), x)]),
        }
    }
}

impl WeightedSumSolver for ConvexFront {
    fn solve(&self, weights: &[f64], cutoff: &[f64]) -> Result<SubproblemOutcome, SolverError> {
        if cutoff[1] < 0.0 {
            return Ok(SubproblemOutcome::Infeasible);
        }
        // unconstrained minimum of w0 * x + w1 * (1 - x)^2
        let target = if weights[1] > 0.0 {
            1.0 - weights[0] / (2.0 * weights[1])
        } else {
            f64::NEG_INFINITY
        };

        let mut best: Option<(f64, f64)> = None;
        for (lower, upper) in self.restrict(1.0 - cutoff[1].sqrt(), cutoff[0]) {
            let x = target.clamp(lower, upper);
            let y = Self::objectives(x);
            let value = weights[0] * y[0] + weights[1] * y[1];
            if best.map_or(true, |(v, _)| value < v) {
                best = Some((value, x));
            }
        }
        Ok(match best {
            Some((_, x)) => Self::outcome(x),
            None => SubproblemOutcome::Infeasible,
        })
    }
}

impl BoxSolver for ConvexFront {
    fn ideal_point(&self, decision_box: &DecisionBox) -> Result<Option<Point>, SolverError> {
        let (lower, upper) = decision_box.variable("x")?.bounds();
        let parts = self.restrict(lower, upper);
        match (parts.first(), parts.last()) {
            (Some(first), Some(last)) => Ok(Some(vec![first.0, (1.0 - last.1).powi(2)])),
            _ => Ok(None),
        }
    }

    fn feasible_point(
        &self,
        decision_box: &DecisionBox,
        _ideal_point: &[f64],
    ) -> Result<SubproblemOutcome, SolverError> {
        let (lower, upper) = decision_box.variable("x")?.bounds();
        Ok(match self.restrict(lower, upper).first() {
            Some((a, b)) => Self::outcome((a + b) / 2.0),
            None => SubproblemOutcome::Infeasible,
        })
    }

    fn may_improve(&self, _decision_box: &DecisionBox, _lub: &[f64]) -> Result<bool, SolverError> {
        Ok(self.keep_boxes)
    }
}

/// A relaxation of a [`ConvexFront`] whose relaxed images lie `error` below the front in every
/// objective. Each refinement halves the error.
#[derive(Debug)]
pub(crate) struct RelaxedConvexFront {
    pub front: ConvexFront,
    pub error: f64,
    /// Relaxed solutions are considered feasible when the error is not larger than this.
    pub feasibility_tolerance: f64,
    /// The reduced problem has no solution while the error is larger than this.
    pub reduced_error_limit: f64,
}

impl RelaxedConvexFront {
    pub fn new(
        front: ConvexFront,
        error: f64,
        feasibility_tolerance: f64,
        reduced_error_limit: f64,
    ) -> Self {
        Self {
            front,
            error,
            feasibility_tolerance,
            reduced_error_limit,
        }
    }
}

impl RelaxedSolver for RelaxedConvexFront {
    fn solve_relaxed(
        &mut self,
        _zone: &[f64],
        weights: &[f64],
        cutoff: &[f64],
    ) -> Result<RelaxedOutcome, SolverError> {
        Ok(match self.front.solve(weights, cutoff)? {
            SubproblemOutcome::Optimal { point, assignment } => {
                if self.error <= self.feasibility_tolerance {
                    RelaxedOutcome::Utopian {
                        point,
                        considered_feasible: true,
                        assignment,
                    }
                } else {
                    RelaxedOutcome::Utopian {
                        point: point.iter().map(|v| v - self.error).collect(),
                        considered_feasible: false,
                        assignment,
                    }
                }
            }
            _ => RelaxedOutcome::Infeasible,
        })
    }

    fn solve_reduced(
        &mut self,
        _weights: &[f64],
        _cutoff: &[f64],
        relaxed_solution: &HashMap<String, f64>,
    ) -> Result<SubproblemOutcome, SolverError> {
        if self.error > self.reduced_error_limit {
            return Ok(SubproblemOutcome::Infeasible);
        }
        let x = relaxed_solution.get("x").ok_or("x is missing")?;
        Ok(ConvexFront::outcome(*x))
    }

    fn refine(
        &mut self,
        _zone: &[f64],
        _relaxed_solution: &HashMap<String, f64>,
    ) -> Result<(), SolverError> {
        self.error /= 2.0;
        Ok(())
    }

    fn feasible_point(
        &mut self,
        weights: &[f64],
        cutoff: &[f64],
    ) -> Result<SubproblemOutcome, SolverError> {
        self.front.solve(weights, cutoff)
    }
}

/// Minimise `i` and `9 - i` with the integer `i` in `[0, 9]`. All feasible points are
/// nondominated.
#[derive(Debug)]
pub(crate) struct IntegerLine;

impl BoxSolver for IntegerLine {
    fn ideal_point(&self, decision_box: &DecisionBox) -> Result<Option<Point>, SolverError> {
        let (lower, upper) = decision_box.variable("i")?.bounds();
        Ok(Some(vec![lower, 9.0 - upper]))
    }

    fn feasible_point(
        &self,
        decision_box: &DecisionBox,
        _ideal_point: &[f64],
    ) -> Result<SubproblemOutcome, SolverError> {
        let lower = decision_box.variable("i")?.lower();
        Ok(SubproblemOutcome::optimal(vec![lower, 9.0 - lower]))
    }
}

/// A solver that never finds a solution in time.
#[derive(Debug)]
pub(crate) struct SlowSolver;

impl WeightedSumSolver for SlowSolver {
    fn solve(&self, _weights: &[f64], _cutoff: &[f64]) -> Result<SubproblemOutcome, SolverError> {
        Ok(SubproblemOutcome::TimeLimit)
    }
}

impl RelaxedSolver for SlowSolver {
    fn solve_relaxed(
        &mut self,
        _zone: &[f64],
        _weights: &[f64],
        _cutoff: &[f64],
    ) -> Result<RelaxedOutcome, SolverError> {
        Ok(RelaxedOutcome::TimeLimit)
    }

    fn solve_reduced(
        &mut self,
        _weights: &[f64],
        _cutoff: &[f64],
        _relaxed_solution: &HashMap<String, f64>,
    ) -> Result<SubproblemOutcome, SolverError> {
        Ok(SubproblemOutcome::TimeLimit)
    }

    fn refine(
        &mut self,
        _zone: &[f64],
        _relaxed_solution: &HashMap<String, f64>,
    ) -> Result<(), SolverError> {
        Ok(())
    }

    fn feasible_point(
        &mut self,
        _weights: &[f64],
        _cutoff: &[f64],
    ) -> Result<SubproblemOutcome, SolverError> {
        Ok(SubproblemOutcome::TimeLimit)
    }
}

/// A solver that always fails.
#[derive(Debug)]
pub(crate) struct BrokenSolver;

impl WeightedSumSolver for BrokenSolver {
    fn solve(&self, _weights: &[f64], _cutoff: &[f64]) -> Result<SubproblemOutcome, SolverError> {
        Err("the model is not valid".into())
    }
}

impl BoxSolver for BrokenSolver {
    fn ideal_point(&self, _decision_box: &DecisionBox) -> Result<Option<Point>, SolverError> {
        Err("the model is not valid".into())
    }

    fn feasible_point(
        &self,
        _decision_box: &DecisionBox,
        _ideal_point: &[f64],
    ) -> Result<SubproblemOutcome, SolverError> {
        Err("the model is not valid".into())
    }
}

impl RelaxedSolver for BrokenSolver {
    fn solve_relaxed(
        &mut self,
        _zone: &[f64],
        _weights: &[f64],
        _cutoff: &[f64],
    ) -> Result<RelaxedOutcome, SolverError> {
        Err("the model is not valid".into())
    }

    fn solve_reduced(
        &mut self,
        _weights: &[f64],
        _cutoff: &[f64],
        _relaxed_solution: &HashMap<String, f64>,
    ) -> Result<SubproblemOutcome, SolverError> {
        Err("the model is not valid".into())
    }

    fn refine(
        &mut self,
        _zone: &[f64],
        _relaxed_solution: &HashMap<String, f64>,
    ) -> Result<(), SolverError> {
        Err("the model is not valid".into())
    }

    fn feasible_point(
        &mut self,
        _weights: &[f64],
        _cutoff: &[f64],
    ) -> Result<SubproblemOutcome, SolverError> {
        Err("the model is not valid".into())
    }
}
