use thiserror::Error;

#[derive(Error, Debug)]
/// Errors raised by the library.
pub enum EError {
    #[error("The following error occurred: {0}")]
    Generic(String),
    #[error("The {0} has {1} coordinates, but {2} coordinates were expected")]
    ShapeMismatch(String, usize, usize),
    #[error("NaN detected in the {0} {1:?}")]
    NaN(String, Vec<f64>),
    #[error("The coordinate #{0} of the direction vector ({1}) must be strictly positive")]
    NonPositiveDirection(usize, f64),
    #[error("The image box is not valid: {0}")]
    InvalidImageBox(String),
    #[error("The {0} type named '{1}' already exist")]
    DuplicatedName(String, String),
    #[error("The {0} named '{1}' does not exist")]
    NonExistingName(String, String),
    #[error("The min value ({0}) must be smaller than or equal to the max value ({1}).")]
    TooLargeLowerBound(String, String),
    #[error("The bounds of the variable '{0}' must be finite, but {1} was given")]
    NonFiniteBound(String, String),
    #[error("The bounds of the discrete variable '{0}' must be integers, but {1} was given")]
    NonIntegerBound(String, String),
    #[error("The decision box cannot be split because all its edges have zero length")]
    UnsplittableBox,
    #[error("An error occurred when solving a subproblem: {0}")]
    Solver(String),
    #[error("An error occurred when initialising {0}: {1}")]
    AlgorithmInit(String, String),
    #[error("An error occurred when running {0}: {1}")]
    AlgorithmRun(String, String),
    #[error("An error occurred when exporting the algorithm data: {0}")]
    AlgorithmExport(String),
}
