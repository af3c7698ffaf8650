pub use antichain::{AntichainKind, AntichainSet};
pub use bound_type::BoundType;
pub use enclosure::Enclosure;
pub use local_bounds::{BoundId, DefiningPoints, InsertionSummary, LocalBound, LocalBoundSet};

mod antichain;
mod bound_type;
mod enclosure;
mod local_bounds;
