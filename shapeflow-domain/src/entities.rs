// Domain entities
pub mod alert;
pub mod event;
pub mod filter;
pub mod report;
pub mod runtime_config;

pub use alert::*;
pub use event::*;
pub use filter::*;
pub use report::*;
pub use runtime_config::*;
