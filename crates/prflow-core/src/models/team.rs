use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::User;

/// A roster entry: one member of a team as seen from the team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TeamMember {
    #[validate(length(
        min = 1,
        max = 255,
        message = "user_id must be between 1 and 255 characters"
    ))]
    pub user_id: String,
    #[validate(length(
        min = 1,
        max = 255,
        message = "username must be between 1 and 255 characters"
    ))]
    pub username: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Team with its full roster. Member order carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Team {
    pub team_name: String,
    pub members: Vec<TeamMember>,
}

impl Team {
    pub fn member(&self, user_id: &str) -> Option<&TeamMember> {
        self.members.iter().find(|m| m.user_id == user_id)
    }

    /// Flatten the roster into users owned by this team
    pub fn users(&self) -> Vec<User> {
        self.members
            .iter()
            .map(|m| User {
                user_id: m.user_id.clone(),
                username: m.username.clone(),
                team_name: self.team_name.clone(),
                is_active: m.is_active,
            })
            .collect()
    }
}

/// Request DTO for creating a team together with its members
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateTeamRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "team_name must be between 1 and 255 characters"
    ))]
    pub team_name: String,
    #[serde(default)]
    #[validate(nested)]
    pub members: Vec<TeamMember>,
}

impl From<CreateTeamRequest> for Team {
    fn from(request: CreateTeamRequest) -> Self {
        Team {
            team_name: request.team_name,
            members: request.members,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TeamResponse {
    pub team: Team,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TeamListResponse {
    pub teams: Vec<Team>,
}

/// Query parameters for fetching a team
#[derive(Debug, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct TeamQuery {
    /// Team name
    #[validate(length(min = 1, message = "team_name is required"))]
    pub team_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_defaults_to_active() {
        let member: TeamMember =
            serde_json::from_str(r#"{"user_id":"u1","username":"Alice"}"#).unwrap();
        assert!(member.is_active);
    }

    #[test]
    fn test_users_carry_team_name() {
        let team = Team {
            team_name: "core".to_string(),
            members: vec![TeamMember {
                user_id: "u1".to_string(),
                username: "Alice".to_string(),
                is_active: false,
            }],
        };
        let users = team.users();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].team_name, "core");
        assert!(!users[0].is_active);
        assert!(team.member("u1").is_some());
        assert!(team.member("u2").is_none());
    }

    #[test]
    fn test_create_request_validates_members() {
        let request: CreateTeamRequest = serde_json::from_str(
            r#"{"team_name":"core","members":[{"user_id":"","username":"x"}]}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }
}
