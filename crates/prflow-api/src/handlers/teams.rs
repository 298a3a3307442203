//! Team roster handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use crate::error::{HttpAppError, ValidatedJson, ValidatedQuery};
use crate::state::AppState;
use prflow_core::models::{CreateTeamRequest, TeamListResponse, TeamQuery, TeamResponse};

/// Create a team together with its members
#[utoipa::path(
    post,
    path = "/team/add",
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Team created", body = TeamResponse),
        (status = 400, description = "Invalid roster or team already exists", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    ),
    tag = "teams"
)]
#[tracing::instrument(skip(state, request), fields(team_name = %request.team_name))]
pub async fn create_team(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateTeamRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let team = state.teams.create_team(request.into()).await?;
    Ok((StatusCode::CREATED, Json(TeamResponse { team })))
}

/// Get a team with its roster
#[utoipa::path(
    get,
    path = "/team/get",
    params(TeamQuery),
    responses(
        (status = 200, description = "Team found", body = TeamResponse),
        (status = 404, description = "Team not found", body = crate::error::ErrorResponse)
    ),
    tag = "teams"
)]
#[tracing::instrument(skip(state))]
pub async fn get_team(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<TeamQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let team = state.teams.get_team(&query.team_name).await?;
    Ok(Json(TeamResponse { team }))
}

/// List every team, ordered by name
#[utoipa::path(
    get,
    path = "/team/list",
    responses(
        (status = 200, description = "All teams", body = TeamListResponse)
    ),
    tag = "teams"
)]
#[tracing::instrument(skip(state))]
pub async fn list_teams(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let teams = state.teams.list_teams().await?;
    Ok(Json(TeamListResponse { teams }))
}
