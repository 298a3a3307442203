use std::collections::HashSet;
use std::sync::Arc;

use prflow_core::{
    models::{Team, User},
    AppError, RosterStore,
};

#[derive(Clone)]
pub struct TeamService {
    roster: Arc<dyn RosterStore>,
}

impl TeamService {
    pub fn new(roster: Arc<dyn RosterStore>) -> Self {
        Self { roster }
    }

    /// Create a team with its roster. Members already on another team move into this one.
    #[tracing::instrument(skip(self, team), fields(team_name = %team.team_name, members = team.members.len()))]
    pub async fn create_team(&self, team: Team) -> Result<Team, AppError> {
        let mut seen = HashSet::new();
        if let Some(duplicate) = team
            .members
            .iter()
            .find(|m| !seen.insert(m.user_id.as_str()))
        {
            return Err(AppError::InvalidInput(format!(
                "user '{}' appears more than once in team '{}'",
                duplicate.user_id, team.team_name
            )));
        }

        self.roster.create_team(&team).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_team(&self, team_name: &str) -> Result<Team, AppError> {
        self.roster
            .get_team(team_name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("team '{}' not found", team_name)))
    }

    pub async fn list_teams(&self) -> Result<Vec<Team>, AppError> {
        self.roster.list_teams().await
    }

    /// Toggle a user's active flag. Existing assignments stay; only future picks change.
    #[tracing::instrument(skip(self))]
    pub async fn set_user_active(&self, user_id: &str, is_active: bool) -> Result<User, AppError> {
        let user = self
            .roster
            .set_user_active(user_id, is_active)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{}' not found", user_id)))?;

        tracing::info!(user_id, is_active, team_name = %user.team_name, "User activity updated");

        Ok(user)
    }
}
