//! prflow Services Layer
//!
//! Reviewer assignment and pull request lifecycle rules, written against the store traits
//! from `prflow-core`. HTTP handling stays in `prflow-api`.

pub mod assignment;
pub mod lifecycle;
pub mod selection;
pub mod team;

pub use assignment::{ReviewerAssignmentEngine, INITIAL_REVIEWER_COUNT};
pub use lifecycle::PullRequestService;
pub use selection::{choose_distinct, choose_one, RandomSource, ScriptedRandom, ThreadRandom};
pub use team::TeamService;
