use std::sync::Arc;

use chrono::Utc;
use prflow_core::{models::PullRequest, AppError, PullRequestStore, RosterStore};

use crate::assignment::ReviewerAssignmentEngine;

/// Pull request lifecycle: OPEN on creation, MERGED once and for good
#[derive(Clone)]
pub struct PullRequestService {
    roster: Arc<dyn RosterStore>,
    pull_requests: Arc<dyn PullRequestStore>,
    engine: ReviewerAssignmentEngine,
}

impl PullRequestService {
    pub fn new(
        roster: Arc<dyn RosterStore>,
        pull_requests: Arc<dyn PullRequestStore>,
        engine: ReviewerAssignmentEngine,
    ) -> Self {
        Self {
            roster,
            pull_requests,
            engine,
        }
    }

    /// Open a pull request and assign its initial reviewers
    #[tracing::instrument(skip(self, name))]
    pub async fn create_pr(
        &self,
        pr_id: &str,
        name: &str,
        author_id: &str,
    ) -> Result<PullRequest, AppError> {
        let author_not_found =
            || AppError::AuthorNotFound(format!("author '{}' not found", author_id));

        let team_name = self
            .roster
            .find_user_team(author_id)
            .await?
            .ok_or_else(author_not_found)?;
        let team = self
            .roster
            .get_team(&team_name)
            .await?
            .ok_or_else(author_not_found)?;

        let mut pr = PullRequest::open(pr_id, name, author_id, Utc::now());
        self.pull_requests.create_pull_request(&pr).await?;

        pr.assigned_reviewers = self
            .engine
            .assign_initial_reviewers(pr_id, author_id, &team)
            .await;

        tracing::info!(
            pr_id,
            author_id,
            team_name = %team.team_name,
            reviewers = ?pr.assigned_reviewers,
            "Pull request created"
        );

        Ok(pr)
    }

    /// Merge a pull request. Merging a merged pull request returns it unchanged.
    #[tracing::instrument(skip(self))]
    pub async fn merge_pr(&self, pr_id: &str) -> Result<PullRequest, AppError> {
        let pr = self.fetch(pr_id).await?;
        if pr.is_merged() {
            tracing::debug!(pr_id, "Pull request already merged");
            return Ok(pr);
        }

        self.pull_requests.set_merged(pr_id, Utc::now()).await?;
        let merged = self.fetch(pr_id).await?;

        tracing::info!(pr_id, merged_at = ?merged.merged_at, "Pull request merged");

        Ok(merged)
    }

    /// Replace one reviewer and return the refreshed pull request with the new reviewer's ID
    #[tracing::instrument(skip(self))]
    pub async fn reassign_reviewer(
        &self,
        pr_id: &str,
        old_reviewer_id: &str,
    ) -> Result<(PullRequest, String), AppError> {
        let replaced_by = self
            .engine
            .reassign_reviewer(pr_id, old_reviewer_id)
            .await?;
        let pr = self.fetch(pr_id).await?;
        Ok((pr, replaced_by))
    }

    /// Pull requests where `user_id` currently reviews, open and merged alike
    #[tracing::instrument(skip(self))]
    pub async fn list_for_reviewer(&self, user_id: &str) -> Result<Vec<PullRequest>, AppError> {
        self.pull_requests.list_by_reviewer(user_id).await
    }

    async fn fetch(&self, pr_id: &str) -> Result<PullRequest, AppError> {
        self.pull_requests
            .get_pull_request(pr_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("pull request '{}' not found", pr_id)))
    }
}
