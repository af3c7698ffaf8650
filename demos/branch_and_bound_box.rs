use std::error::Error;

use log::LevelFilter;

use frontier_enclosure::algorithms::{
    Algorithm, BoxSolver, BranchAndBound, BranchAndBoundArg, MaxIterationValue, SolverError,
    StoppingConditionType, SubproblemOutcome,
};
use frontier_enclosure::core::{BoundedVariable, DecisionBox, Point};

/// The following mixed-integer problem, where both objectives are minimised:
/// - `f_1(x, n) = x + n`
/// - `f_2(x, n) = (1 - x)^2 + 3 - n`
///
/// with `x` in [0; 1] and the integer `n` in [0; 3]. Both objectives are separable, so their
/// minimum on a box is found at its corners.
#[derive(Debug)]
struct MixedIntegerProblem;

impl MixedIntegerProblem {
    fn objectives(x: f64, n: f64) -> Point {
        vec![x + n, (1.0 - x).powi(2) + 3.0 - n]
    }
}

impl BoxSolver for MixedIntegerProblem {
    fn ideal_point(&self, decision_box: &DecisionBox) -> Result<Option<Point>, SolverError> {
        let (x_min, x_max) = decision_box.variable("x")?.bounds();
        let (n_min, n_max) = decision_box.variable("n")?.bounds();
        Ok(Some(vec![
            x_min + n_min,
            (1.0 - x_max).powi(2) + 3.0 - n_max,
        ]))
    }

    fn feasible_point(
        &self,
        decision_box: &DecisionBox,
        _ideal_point: &[f64],
    ) -> Result<SubproblemOutcome, SolverError> {
        let (x_min, x_max) = decision_box.variable("x")?.bounds();
        let n = decision_box.variable("n")?.lower();
        Ok(SubproblemOutcome::optimal(Self::objectives(
            (x_min + x_max) / 2.0,
            n,
        )))
    }
}

/// Compute the enclosure of the nondominated set of a mixed-integer problem by branching on its
/// decision space.
///
/// `cargo run --example branch_and_bound_box`
fn main() -> Result<(), Box<dyn Error>> {
    // Add log
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let decision_box = DecisionBox::new(vec![
        BoundedVariable::continuous("x", 0.0, 1.0)?,
        BoundedVariable::discrete("n", 0, 3)?,
    ])?;
    let args = BranchAndBoundArg {
        ideal: vec![0.0, 0.0],
        nadir: vec![4.5, 4.5],
        decision_box,
        tolerance: 0.05,
        stopping_condition: StoppingConditionType::MaxIterations(MaxIterationValue(2000)),
        direction: None,
    };
    let mut algo = BranchAndBound::new(Box::new(MixedIntegerProblem), args)?;
    algo.run()?;

    let results = algo.get_results()?;
    println!(
        "Found {} points with {} subproblems. {} boxes are left and the width is {:?}",
        results.nondominated.len(),
        results.subproblems,
        results.boxes.len(),
        results.width
    );
    for point in &results.nondominated {
        println!("{:?}", point);
    }

    Ok(())
}
