//! Domain route groups (teams, users, pull requests).

use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub fn team_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/team/add", post(handlers::teams::create_team))
        .route("/team/get", get(handlers::teams::get_team))
        .route("/team/list", get(handlers::teams::list_teams))
        .with_state(state)
}

pub fn user_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/setIsActive", post(handlers::users::set_is_active))
        .route("/users/getReview", get(handlers::users::get_review))
        .with_state(state)
}

pub fn pull_request_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/pullRequest/create",
            post(handlers::pull_requests::create_pull_request),
        )
        .route(
            "/pullRequest/merge",
            post(handlers::pull_requests::merge_pull_request),
        )
        .route(
            "/pullRequest/reassign",
            post(handlers::pull_requests::reassign_reviewer),
        )
        .with_state(state)
}
