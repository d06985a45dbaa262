pub mod ingest_commands;

pub use ingest_commands::*;
