pub use algorithm::{Algorithm, Elapsed, EnclosureResults, WidthDirection};
pub use branch_and_bound::{BranchAndBound, BranchAndBoundArg};
pub use direct_search::{DirectSearch, DirectSearchArg};
pub use solver::{
    BoxSolver, RelaxedOutcome, RelaxedSolver, SolverError, SubproblemOutcome, WeightedSumSolver,
};
pub use stopping_condition::{
    MaxDurationValue, MaxIterationValue, StoppingCondition, StoppingConditionType,
};
pub use two_stage_search::{TwoStageSearch, TwoStageSearchArg};

mod algorithm;
mod branch_and_bound;
mod direct_search;
mod solver;
mod stopping_condition;
mod two_stage_search;
#[cfg(test)]
mod test_problems;
