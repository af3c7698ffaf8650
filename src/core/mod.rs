pub use decision_box::{BoundedVariable, DecisionBox, VariableKind};
pub use error::EError;
pub use point::Point;

mod decision_box;
mod error;
pub mod point;
#[cfg(test)]
pub(crate) mod test_utils;
