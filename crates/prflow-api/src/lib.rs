//! prflow API Library
//!
//! This crate provides the HTTP handlers, error rendering, and application setup.

mod api_doc;
mod handlers;
mod telemetry;

pub mod error;
pub mod setup;
pub mod state;

pub use error::ErrorResponse;
pub use state::AppState;
