pub mod categorizer;
pub mod snapshot;

pub use categorizer::*;
pub use snapshot::*;
