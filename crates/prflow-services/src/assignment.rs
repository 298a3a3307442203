use std::sync::Arc;

use prflow_core::{models::Team, AppError, PullRequestStore, RosterStore};

use crate::selection::{choose_distinct, choose_one, RandomSource};

/// Reviewers picked when a pull request is opened
pub const INITIAL_REVIEWER_COUNT: usize = 2;

/// Picks reviewers and writes the reviewer edges
#[derive(Clone)]
pub struct ReviewerAssignmentEngine {
    roster: Arc<dyn RosterStore>,
    pull_requests: Arc<dyn PullRequestStore>,
    random: Arc<dyn RandomSource>,
}

impl ReviewerAssignmentEngine {
    pub fn new(
        roster: Arc<dyn RosterStore>,
        pull_requests: Arc<dyn PullRequestStore>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            roster,
            pull_requests,
            random,
        }
    }

    /// Active teammates of the author, author excluded
    pub fn eligible_initial_reviewers(team: &Team, author_id: &str) -> Vec<String> {
        team.members
            .iter()
            .filter(|m| m.is_active && m.user_id != author_id)
            .map(|m| m.user_id.clone())
            .collect()
    }

    /// Active teammates of the departing reviewer, that reviewer excluded.
    /// The author and reviewers already on the pull request stay in the pool.
    pub fn eligible_replacements(team: &Team, old_reviewer_id: &str) -> Vec<String> {
        team.members
            .iter()
            .filter(|m| m.is_active && m.user_id != old_reviewer_id)
            .map(|m| m.user_id.clone())
            .collect()
    }

    /// Attach up to two reviewers from the author's team.
    ///
    /// Each edge is written on its own. A failed write is logged and the reviewer is left out
    /// of the result, so the returned list is exactly what was persisted.
    #[tracing::instrument(skip(self, team), fields(team_name = %team.team_name))]
    pub async fn assign_initial_reviewers(
        &self,
        pr_id: &str,
        author_id: &str,
        team: &Team,
    ) -> Vec<String> {
        let pool = Self::eligible_initial_reviewers(team, author_id);
        let picked = choose_distinct(&pool, INITIAL_REVIEWER_COUNT, self.random.as_ref());

        let mut assigned = Vec::with_capacity(picked.len());
        for reviewer in picked {
            match self.pull_requests.add_reviewer(pr_id, &reviewer).await {
                Ok(()) => assigned.push(reviewer),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        pr_id,
                        reviewer_id = %reviewer,
                        "Failed to assign reviewer; continuing without them"
                    );
                }
            }
        }

        tracing::debug!(
            pr_id,
            pool_size = pool.len(),
            assigned = assigned.len(),
            "Initial reviewers assigned"
        );

        assigned
    }

    /// Swap `old_reviewer_id` for a random active member of the old reviewer's team.
    ///
    /// Returns the new reviewer. The candidate pool may contain the author or reviewers that
    /// are already assigned.
    #[tracing::instrument(skip(self))]
    pub async fn reassign_reviewer(
        &self,
        pr_id: &str,
        old_reviewer_id: &str,
    ) -> Result<String, AppError> {
        let pr = self
            .pull_requests
            .get_pull_request(pr_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("pull request '{}' not found", pr_id)))?;

        if pr.is_merged() {
            return Err(AppError::PrMerged(format!(
                "cannot reassign on merged pull request '{}'",
                pr_id
            )));
        }

        if !pr.has_reviewer(old_reviewer_id) {
            return Err(AppError::NotAssigned(format!(
                "user '{}' is not a reviewer of '{}'",
                old_reviewer_id, pr_id
            )));
        }

        let team_name = self
            .roster
            .find_user_team(old_reviewer_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{}' not found", old_reviewer_id)))?;
        let team = self
            .roster
            .get_team(&team_name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("team '{}' not found", team_name)))?;

        let pool = Self::eligible_replacements(&team, old_reviewer_id);

        let new_reviewer = choose_one(&pool, self.random.as_ref()).ok_or_else(|| {
            AppError::NoCandidate(format!(
                "no active replacement for '{}' in team '{}'",
                old_reviewer_id, team_name
            ))
        })?;

        self.pull_requests
            .remove_reviewer(pr_id, old_reviewer_id)
            .await?;
        self.pull_requests.add_reviewer(pr_id, &new_reviewer).await?;

        tracing::info!(
            pr_id,
            old_reviewer_id,
            new_reviewer_id = %new_reviewer,
            "Reviewer reassigned"
        );

        Ok(new_reviewer)
    }
}
