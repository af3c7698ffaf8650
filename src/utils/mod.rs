pub use algebra::{all_close, solve_linear_system, LinearSolverTolerance};

mod algebra;
