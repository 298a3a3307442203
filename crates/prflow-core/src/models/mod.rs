//! Data models for the application
//!
//! This module contains all data structures used throughout the application,
//! organized by domain. Each sub-module represents a specific feature area.

mod pull_request;
mod team;
mod user;

// Re-export all models for convenient imports
pub use pull_request::*;
pub use team::*;
pub use user::*;
