//! OpenAPI documentation, served at `/api/openapi.json` and rendered by RapiDoc at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use prflow_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "prflow API",
        version = "0.1.0",
        description = "Pull request reviewer assignment. Teams own users; opening a pull request assigns up to two active teammates of the author as reviewers, and reviewers can be swapped for an active teammate of theirs until the pull request is merged."
    ),
    paths(
        // Teams
        handlers::teams::create_team,
        handlers::teams::get_team,
        handlers::teams::list_teams,
        // Users
        handlers::users::set_is_active,
        handlers::users::get_review,
        // Pull requests
        handlers::pull_requests::create_pull_request,
        handlers::pull_requests::merge_pull_request,
        handlers::pull_requests::reassign_reviewer,
    ),
    components(
        schemas(
            models::Team,
            models::TeamMember,
            models::User,
            models::PullRequest,
            models::PullRequestStatus,
            models::CreateTeamRequest,
            models::SetUserActiveRequest,
            models::CreatePullRequestRequest,
            models::MergePullRequestRequest,
            models::ReassignReviewerRequest,
            models::TeamResponse,
            models::TeamListResponse,
            models::UserResponse,
            models::PullRequestResponse,
            models::ReassignResponse,
            models::ReviewerPullRequestsResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "teams", description = "Team rosters"),
        (name = "users", description = "User activity and review queues"),
        (name = "pull-requests", description = "Pull request lifecycle and reviewer assignment")
    )
)]
pub struct ApiDoc;
