//! Core module
//!
//! Configuration, error types and per-update statistics

mod config;
mod error;
mod stats;

pub use config::{HierarchyConfig, InvariantPolicy};
pub use error::{ConfigError, ErrorKind, HierarchyError};
pub use stats::UpdateStats;
