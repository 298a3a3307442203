//! Store traits consumed by the service layer
//!
//! The reviewer-assignment and lifecycle services only talk to persistence through these
//! traits. `prflow-db` provides the PostgreSQL implementations and an in-memory one.
//! Lookups return `Ok(None)` for absent records; turning absence into a domain error is the
//! caller's decision.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{PullRequest, Team, User};
use crate::AppError;

/// Teams and their members
#[async_trait]
pub trait RosterStore: Send + Sync {
    /// Create a team and upsert its members into it, atomically.
    ///
    /// Fails with `AppError::TeamExists` when the name is taken. Members that already
    /// belong to another team are moved into this one.
    async fn create_team(&self, team: &Team) -> Result<Team, AppError>;

    /// Name of the team owning `user_id`
    async fn find_user_team(&self, user_id: &str) -> Result<Option<String>, AppError>;

    /// Full roster of a team
    async fn get_team(&self, team_name: &str) -> Result<Option<Team>, AppError>;

    async fn list_teams(&self) -> Result<Vec<Team>, AppError>;

    async fn set_user_active(
        &self,
        user_id: &str,
        is_active: bool,
    ) -> Result<Option<User>, AppError>;
}

/// Pull requests and their reviewer edges
#[async_trait]
pub trait PullRequestStore: Send + Sync {
    /// Persist a new pull request. Fails with `AppError::PrExists` on an ID collision.
    async fn create_pull_request(&self, pr: &PullRequest) -> Result<(), AppError>;

    /// Pull request with its current reviewers
    async fn get_pull_request(&self, pr_id: &str) -> Result<Option<PullRequest>, AppError>;

    /// Add a reviewer edge. Adding an existing edge is a no-op.
    async fn add_reviewer(&self, pr_id: &str, user_id: &str) -> Result<(), AppError>;

    /// Remove a reviewer edge. Removing a missing edge is a no-op.
    async fn remove_reviewer(&self, pr_id: &str, user_id: &str) -> Result<(), AppError>;

    /// Move an OPEN pull request to MERGED with the given timestamp.
    ///
    /// Pull requests that are already merged keep their original timestamp.
    async fn set_merged(&self, pr_id: &str, merged_at: DateTime<Utc>) -> Result<(), AppError>;

    /// Every pull request where `user_id` is currently a reviewer, oldest first
    async fn list_by_reviewer(&self, user_id: &str) -> Result<Vec<PullRequest>, AppError>;
}
