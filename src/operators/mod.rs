pub use box_splitter::split_box;
pub use weight_hyperplane::weight_hyperplane;

mod box_splitter;
mod weight_hyperplane;
