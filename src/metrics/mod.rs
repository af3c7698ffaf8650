pub use width::{check_direction, compute_width, shortest_edge, EnclosureWidth};

mod width;
