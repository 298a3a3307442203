//! User handlers

use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::error::{HttpAppError, ValidatedJson, ValidatedQuery};
use crate::state::AppState;
use prflow_core::models::{
    ReviewerPullRequestsResponse, ReviewerQuery, SetUserActiveRequest, UserResponse,
};

/// Mark a user active or inactive for future reviewer picks
#[utoipa::path(
    post,
    path = "/users/setIsActive",
    request_body = SetUserActiveRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    ),
    tag = "users"
)]
#[tracing::instrument(skip(state, request), fields(user_id = %request.user_id, is_active = request.is_active))]
pub async fn set_is_active(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<SetUserActiveRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let user = state
        .teams
        .set_user_active(&request.user_id, request.is_active)
        .await?;
    Ok(Json(UserResponse { user }))
}

/// Pull requests the user currently reviews
#[utoipa::path(
    get,
    path = "/users/getReview",
    params(ReviewerQuery),
    responses(
        (status = 200, description = "Pull requests under review", body = ReviewerPullRequestsResponse)
    ),
    tag = "users"
)]
#[tracing::instrument(skip(state))]
pub async fn get_review(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<ReviewerQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let pull_requests = state
        .pull_requests
        .list_for_reviewer(&query.user_id)
        .await?;
    Ok(Json(ReviewerPullRequestsResponse {
        user_id: query.user_id,
        pull_requests,
    }))
}
