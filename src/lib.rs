//! Compute guaranteed enclosures of the nondominated set of multi-objective optimisation
//! problems.
//!
//! An enclosure is made of two families of local bounds: the local upper bounds, which are above
//! every nondominated point, and the local lower bounds, which are below it. The
//! [`bounds::Enclosure`] keeps both families up to date as new points are found; the
//! [`metrics::compute_width`] function measures how tight the enclosure is. Three algorithms
//! refine an enclosure using an external solver for the scalarised subproblems:
//! - [`algorithms::DirectSearch`] explores the search zone of each local upper bound with a
//!   weighted-sum subproblem;
//! - [`algorithms::TwoStageSearch`] solves the weighted-sum subproblem over a relaxation first,
//!   collecting utopian points as lower bounds, and refines the relaxation when needed;
//! - [`algorithms::BranchAndBound`] bisects the decision space and uses the ideal point of each box
//!   as lower bound.
//!
//! All objectives are minimised.
pub mod algorithms;
pub mod bounds;
pub mod core;
pub mod metrics;
pub mod operators;
pub mod utils;
