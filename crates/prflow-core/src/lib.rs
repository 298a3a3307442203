//! prflow Core Library
//!
//! This crate provides the domain models, error types, configuration, and store traits
//! shared across all prflow components.

pub mod config;
pub mod error;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use config::{BaseConfig, Config, DatabaseConfig, ServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use store::{PullRequestStore, RosterStore};
