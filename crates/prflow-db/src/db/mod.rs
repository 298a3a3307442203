//! Database repositories for data access layer
//!
//! Each repository is responsible for a specific domain entity: `team` owns the
//! `teams`/`users` tables, `pull_request` owns `pull_requests`/`pr_reviewers`.
//! `memory` implements both store traits over in-process maps.

pub mod memory;
pub mod pull_request;
pub mod team;

pub use memory::InMemoryStore;
pub use pull_request::PullRequestRepository;
pub use team::TeamRepository;
