use std::error::Error;
use std::time::Duration;

use log::LevelFilter;

use frontier_enclosure::algorithms::{
    Algorithm, DirectSearch, DirectSearchArg, MaxDurationValue, MaxIterationValue, SolverError,
    StoppingConditionType, SubproblemOutcome, WeightedSumSolver, WidthDirection,
};

/// The weighted-sum subproblem of the following problem, where both objectives are minimised:
/// - `f_1(x) = x`
/// - `f_2(x) = 1 - sqrt(x)`
///
/// with `x` in [0; 1]. The nondominated set is the convex curve `f_2 = 1 - sqrt(f_1)`.
#[derive(Debug)]
struct SqrtProblem;

impl WeightedSumSolver for SqrtProblem {
    fn solve(&self, weights: &[f64], cutoff: &[f64]) -> Result<SubproblemOutcome, SolverError> {
        // the cutoff restricts x to [(1 - c_2)^2; c_1]
        let lower = if cutoff[1] >= 1.0 {
            0.0
        } else {
            (1.0 - cutoff[1]).powi(2)
        };
        let upper = cutoff[0].min(1.0);
        if lower > upper {
            return Ok(SubproblemOutcome::Infeasible);
        }

        let x = if weights[0] > 0.0 {
            (weights[1] / (2.0 * weights[0])).powi(2)
        } else {
            upper
        };
        let x = x.clamp(lower, upper);
        Ok(SubproblemOutcome::optimal(vec![x, 1.0 - x.sqrt()]))
    }
}

/// Compute the enclosure of the nondominated set of a problem with two objectives by solving
/// weighted-sum subproblems in the search zones of the local upper bounds.
///
/// `cargo run --example direct_search_biobjective`
fn main() -> Result<(), Box<dyn Error>> {
    // Add log
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let args = DirectSearchArg {
        ideal: vec![0.0, 0.0],
        nadir: vec![1.0, 1.0],
        tolerance: 0.01,
        // stop after 50 iterations or 10 seconds, whichever comes first
        stopping_condition: StoppingConditionType::Any(vec![
            StoppingConditionType::MaxIterations(MaxIterationValue(50)),
            StoppingConditionType::MaxDuration(MaxDurationValue(Duration::from_secs(10))),
        ]),
        direction: Some(WidthDirection::Relative),
        factor_delta: None,
        gap_tolerance: None,
    };
    let mut algo = DirectSearch::new(Box::new(SqrtProblem), args)?;
    algo.run()?;

    let results = algo.get_results()?;
    println!(
        "Found {} points in {} iterations. Width is {:?}",
        results.nondominated.len(),
        results.iterations,
        results.width
    );
    println!("{}", results.to_json()?);

    Ok(())
}
