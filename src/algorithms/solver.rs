use std::collections::HashMap;
use std::error::Error;
use std::fmt::Debug;

use crate::core::{DecisionBox, Point};

/// The error returned by the subproblem solvers.
pub type SolverError = Box<dyn Error + Send + Sync>;

/// The result of a subproblem.
#[derive(Clone, Debug, PartialEq)]
pub enum SubproblemOutcome {
    /// The subproblem was solved to optimality.
    Optimal {
        /// The objective values of the solution.
        point: Point,
        /// The values of the decision variables, keyed by name.
        assignment: HashMap<String, f64>,
    },
    /// The subproblem has no feasible solution.
    Infeasible,
    /// The solver reached its time limit without finding a solution.
    TimeLimit,
}

impl SubproblemOutcome {
    /// Create an optimal outcome without a decision variable assignment.
    ///
    /// # Arguments
    ///
    /// * `point`: The objective values.
    ///
    /// returns: `SubproblemOutcome`
    pub fn optimal(point: Point) -> Self {
        SubproblemOutcome::Optimal {
            point,
            assignment: HashMap::new(),
        }
    }

    /// The objective values when the outcome is optimal.
    pub fn point(&self) -> Option<&Point> {
        match self {
            SubproblemOutcome::Optimal { point, .. } => Some(point),
            _ => None,
        }
    }
}

/// Solve the weighted-sum scalarisation of the multi-objective problem restricted to a search
/// zone. This is used by [`crate::algorithms::DirectSearch`].
///
/// # Example
///
/// ```
/// use frontier_enclosure::algorithms::{SolverError, SubproblemOutcome, WeightedSumSolver};
///
/// /// Minimise x and 1 - x with x in [0, 1].
/// #[derive(Debug)]
/// struct LinearProblem;
///
/// impl WeightedSumSolver for LinearProblem {
///     fn solve(&self, weights: &[f64], cutoff: &[f64]) -> Result<SubproblemOutcome, SolverError> {
///         let lower = (1.0 - cutoff[1]).max(0.0);
///         let upper = cutoff[0].min(1.0);
///         if lower > upper {
///             return Ok(SubproblemOutcome::Infeasible);
///         }
///         let x = if weights[0] > weights[1] { lower } else { upper };
///         Ok(SubproblemOutcome::optimal(vec![x, 1.0 - x]))
///     }
/// }
/// ```
pub trait WeightedSumSolver: Send + Sync + Debug {
    /// Minimise `weights * f(x)` subject to `f(x) <= cutoff`, where `f` are the problem
    /// objectives. Solvers must return [`SubproblemOutcome::Infeasible`] or
    /// [`SubproblemOutcome::TimeLimit`] when no solution is found in the zone.
    ///
    /// # Arguments
    ///
    /// * `weights`: The non-negative weight of each objective. These sum to one.
    /// * `cutoff`: The upper bound on each objective.
    ///
    /// returns: `Result<SubproblemOutcome, SolverError>`
    fn solve(&self, weights: &[f64], cutoff: &[f64]) -> Result<SubproblemOutcome, SolverError>;
}

/// Solve the subproblems of the multi-objective problem restricted to a box of the decision
/// space. This is used by [`crate::algorithms::BranchAndBound`]. The methods may be called from
/// different threads at the same time.
pub trait BoxSolver: Send + Sync + Debug {
    /// Compute the ideal point of the problem restricted to `decision_box`, i.e. the minimum of
    /// each objective over the box. This returns `None` when the box has no feasible solution.
    ///
    /// # Arguments
    ///
    /// * `decision_box`: The box.
    ///
    /// returns: `Result<Option<Point>, SolverError>`
    fn ideal_point(&self, decision_box: &DecisionBox) -> Result<Option<Point>, SolverError>;

    /// Find the image of a feasible solution in `decision_box`, preferably close to the box ideal
    /// point.
    ///
    /// # Arguments
    ///
    /// * `decision_box`: The box.
    /// * `ideal_point`: The ideal point of the box.
    ///
    /// returns: `Result<SubproblemOutcome, SolverError>`
    fn feasible_point(
        &self,
        decision_box: &DecisionBox,
        ideal_point: &[f64],
    ) -> Result<SubproblemOutcome, SolverError>;

    /// Whether the box may contain a solution whose image lies in the search zone of the local
    /// upper bound `lub`. This is the elaborate discarding test, run only when the ideal point of
    /// the box is below some local upper bound. The box is discarded when this returns `false` for
    /// all of them. By default boxes are always kept.
    ///
    /// # Arguments
    ///
    /// * `decision_box`: The box.
    /// * `lub`: The local upper bound.
    ///
    /// returns: `Result<bool, SolverError>`
    fn may_improve(&self, decision_box: &DecisionBox, lub: &[f64]) -> Result<bool, SolverError> {
        let _ = (decision_box, lub);
        Ok(true)
    }
}

/// The result of a relaxed subproblem.
#[derive(Clone, Debug, PartialEq)]
pub enum RelaxedOutcome {
    /// The relaxed subproblem was solved. Its image is a utopian point: no nondominated point of
    /// the search zone lies strictly below it.
    Utopian {
        /// The objective values of the relaxed solution.
        point: Point,
        /// Whether the relaxed solution violates the full constraints by less than the solver
        /// tolerance, so that `point` can be used as the image of a feasible solution.
        considered_feasible: bool,
        /// The values of the decision variables, keyed by name.
        assignment: HashMap<String, f64>,
    },
    /// The relaxed subproblem has no feasible solution, so neither has the full one.
    Infeasible,
    /// The solver reached its time limit without finding a solution.
    TimeLimit,
}

impl RelaxedOutcome {
    /// Create a utopian outcome without a decision variable assignment.
    ///
    /// # Arguments
    ///
    /// * `point`: The objective values.
    /// * `considered_feasible`: Whether the relaxed solution can be considered feasible.
    ///
    /// returns: `RelaxedOutcome`
    pub fn utopian(point: Point, considered_feasible: bool) -> Self {
        RelaxedOutcome::Utopian {
            point,
            considered_feasible,
            assignment: HashMap::new(),
        }
    }
}

/// Solve the subproblems of a relaxation-refinement scheme. This is used by
/// [`crate::algorithms::TwoStageSearch`]. The solver owns the relaxation of the problem and is
/// free to keep a different relaxation for each search zone, identified by its local upper bound.
pub trait RelaxedSolver: Send + Sync + Debug {
    /// Minimise `weights * f(x)` over the relaxation of the problem, subject to `f(x) <= cutoff`.
    ///
    /// # Arguments
    ///
    /// * `zone`: The local upper bound of the search zone.
    /// * `weights`: The non-negative weight of each objective. These sum to one.
    /// * `cutoff`: The upper bound on each objective.
    ///
    /// returns: `Result<RelaxedOutcome, SolverError>`
    fn solve_relaxed(
        &mut self,
        zone: &[f64],
        weights: &[f64],
        cutoff: &[f64],
    ) -> Result<RelaxedOutcome, SolverError>;

    /// Solve the weighted-sum problem reduced by the relaxed solution, for example with its
    /// integer variables fixed, to find a feasible point in the search zone.
    ///
    /// # Arguments
    ///
    /// * `weights`: The objective weights.
    /// * `cutoff`: The upper bound on each objective.
    /// * `relaxed_solution`: The decision variables of the relaxed solution.
    ///
    /// returns: `Result<SubproblemOutcome, SolverError>`
    fn solve_reduced(
        &mut self,
        weights: &[f64],
        cutoff: &[f64],
        relaxed_solution: &HashMap<String, f64>,
    ) -> Result<SubproblemOutcome, SolverError>;

    /// Tighten the relaxation of the search zone around the relaxed solution. This is called when
    /// the relaxed solution does not improve the utopian points or its reduced problem has no
    /// solution.
    ///
    /// # Arguments
    ///
    /// * `zone`: The local upper bound of the search zone.
    /// * `relaxed_solution`: The decision variables of the relaxed solution.
    ///
    /// returns: `Result<(), SolverError>`
    fn refine(
        &mut self,
        zone: &[f64],
        relaxed_solution: &HashMap<String, f64>,
    ) -> Result<(), SolverError>;

    /// Solve the weighted-sum problem with the full constraints. This is used to enforce a
    /// feasible point after too many refinements of the same search zone.
    ///
    /// # Arguments
    ///
    /// * `weights`: The objective weights.
    /// * `cutoff`: The upper bound on each objective.
    ///
    /// returns: `Result<SubproblemOutcome, SolverError>`
    fn feasible_point(
        &mut self,
        weights: &[f64],
        cutoff: &[f64],
    ) -> Result<SubproblemOutcome, SolverError>;
}
