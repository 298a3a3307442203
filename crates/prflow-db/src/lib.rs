//! prflow database layer
//!
//! PostgreSQL repositories implementing the store traits from `prflow-core`, plus an
//! in-memory store used by tests and local runs without a database.

pub mod db;

pub use db::{InMemoryStore, PullRequestRepository, TeamRepository};
