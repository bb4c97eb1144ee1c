//! Configuration module
//!
//! - Data-directory path resolution
//! - Service settings persistence

pub mod paths;
pub mod settings;

pub use paths::AccountingPaths;
pub use settings::{AccountConfig, SecurityValidatorSettings, Settings};
