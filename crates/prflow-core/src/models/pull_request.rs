use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

/// Pull request state. `Merged` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "pr_status", rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum PullRequestStatus {
    Open,
    Merged,
}

impl Display for PullRequestStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            PullRequestStatus::Open => write!(f, "OPEN"),
            PullRequestStatus::Merged => write!(f, "MERGED"),
        }
    }
}

impl FromStr for PullRequestStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(PullRequestStatus::Open),
            "MERGED" => Ok(PullRequestStatus::Merged),
            _ => Err(anyhow::anyhow!("Invalid pull request status: {}", s)),
        }
    }
}

/// Pull request with its current reviewer set.
///
/// `merged_at` is present exactly when `status` is `Merged`. Reviewers never repeat and
/// their order carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PullRequest {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PullRequestStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<DateTime<Utc>>,
    pub assigned_reviewers: Vec<String>,
}

impl PullRequest {
    /// A freshly opened pull request with no reviewers yet
    pub fn open(
        pull_request_id: impl Into<String>,
        pull_request_name: impl Into<String>,
        author_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            pull_request_id: pull_request_id.into(),
            pull_request_name: pull_request_name.into(),
            author_id: author_id.into(),
            status: PullRequestStatus::Open,
            created_at,
            merged_at: None,
            assigned_reviewers: Vec::new(),
        }
    }

    pub fn is_merged(&self) -> bool {
        self.status == PullRequestStatus::Merged
    }

    pub fn has_reviewer(&self, user_id: &str) -> bool {
        self.assigned_reviewers.iter().any(|r| r == user_id)
    }

    /// True when the merge timestamp agrees with the status
    pub fn merge_state_consistent(&self) -> bool {
        self.is_merged() == self.merged_at.is_some()
    }
}

/// Request DTO for opening a pull request
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreatePullRequestRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "pull_request_id must be between 1 and 255 characters"
    ))]
    pub pull_request_id: String,
    #[validate(length(
        min = 1,
        max = 255,
        message = "pull_request_name must be between 1 and 255 characters"
    ))]
    pub pull_request_name: String,
    #[validate(length(
        min = 1,
        max = 255,
        message = "author_id must be between 1 and 255 characters"
    ))]
    pub author_id: String,
}

/// Request DTO for merging a pull request
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct MergePullRequestRequest {
    #[validate(length(min = 1, max = 255, message = "pull_request_id is required"))]
    pub pull_request_id: String,
}

/// Request DTO for replacing one reviewer
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ReassignReviewerRequest {
    #[validate(length(min = 1, max = 255, message = "pull_request_id is required"))]
    pub pull_request_id: String,
    #[serde(alias = "old_reviewer_id")]
    #[validate(length(min = 1, max = 255, message = "old_user_id is required"))]
    pub old_user_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PullRequestResponse {
    pub pr: PullRequest,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReassignResponse {
    pub pr: PullRequest,
    /// ID of the reviewer that took over
    pub replaced_by: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewerPullRequestsResponse {
    pub user_id: String,
    pub pull_requests: Vec<PullRequest>,
}
