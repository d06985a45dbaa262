// Domain services: the transform engine and its pure helpers
pub mod detector;
pub mod engine;
pub mod reports;

pub use detector::*;
pub use engine::*;
