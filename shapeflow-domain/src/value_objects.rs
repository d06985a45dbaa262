// Domain value objects
pub mod action_type;
pub mod alert_status;
pub mod collection_path;

pub use action_type::*;
pub use alert_status::*;
pub use collection_path::*;
