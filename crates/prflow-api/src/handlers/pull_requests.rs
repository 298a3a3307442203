//! Pull request lifecycle handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use prflow_core::models::{
    CreatePullRequestRequest, MergePullRequestRequest, PullRequestResponse,
    ReassignReviewerRequest, ReassignResponse,
};

/// Open a pull request and assign up to two reviewers from the author's team
#[utoipa::path(
    post,
    path = "/pullRequest/create",
    request_body = CreatePullRequestRequest,
    responses(
        (status = 201, description = "Pull request created", body = PullRequestResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Pull request ID already used", body = crate::error::ErrorResponse)
    ),
    tag = "pull-requests"
)]
#[tracing::instrument(skip(state, request), fields(pr_id = %request.pull_request_id, author_id = %request.author_id))]
pub async fn create_pull_request(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreatePullRequestRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let pr = state
        .pull_requests
        .create_pr(
            &request.pull_request_id,
            &request.pull_request_name,
            &request.author_id,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(PullRequestResponse { pr })))
}

/// Merge a pull request; repeated merges return the merged state unchanged
#[utoipa::path(
    post,
    path = "/pullRequest/merge",
    request_body = MergePullRequestRequest,
    responses(
        (status = 200, description = "Pull request merged", body = PullRequestResponse),
        (status = 404, description = "Pull request not found", body = crate::error::ErrorResponse)
    ),
    tag = "pull-requests"
)]
#[tracing::instrument(skip(state, request), fields(pr_id = %request.pull_request_id))]
pub async fn merge_pull_request(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<MergePullRequestRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let pr = state
        .pull_requests
        .merge_pr(&request.pull_request_id)
        .await?;
    Ok(Json(PullRequestResponse { pr }))
}

/// Replace one reviewer with a random active teammate of theirs
#[utoipa::path(
    post,
    path = "/pullRequest/reassign",
    request_body = ReassignReviewerRequest,
    responses(
        (status = 200, description = "Reviewer replaced", body = ReassignResponse),
        (status = 404, description = "Pull request or user not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Merged, not assigned, or no candidate", body = crate::error::ErrorResponse)
    ),
    tag = "pull-requests"
)]
#[tracing::instrument(skip(state, request), fields(pr_id = %request.pull_request_id, old_user_id = %request.old_user_id))]
pub async fn reassign_reviewer(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<ReassignReviewerRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let (pr, replaced_by) = state
        .pull_requests
        .reassign_reviewer(&request.pull_request_id, &request.old_user_id)
        .await?;
    Ok(Json(ReassignResponse { pr, replaced_by }))
}
