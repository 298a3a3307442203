use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// A user together with the team that owns them.
///
/// Every user belongs to exactly one team; the `users.team_name` foreign key is the owning
/// relation and a roster upsert moves the user between teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub user_id: String,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}

/// Request DTO for toggling a user's active flag
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SetUserActiveRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "user_id must be between 1 and 255 characters"
    ))]
    pub user_id: String,
    pub is_active: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub user: User,
}

/// Query parameters for listing a reviewer's pull requests
#[derive(Debug, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct ReviewerQuery {
    /// Reviewer user ID
    #[validate(length(min = 1, message = "user_id is required"))]
    pub user_id: String,
}
