use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use prflow_core::{
    models::{PullRequest, PullRequestStatus, Team, TeamMember, User},
    AppError, PullRequestStore, RosterStore,
};
use tokio::sync::RwLock;

#[derive(Default)]
struct State {
    teams: BTreeSet<String>,
    users: BTreeMap<String, User>,
    pull_requests: BTreeMap<String, PullRequest>,
}

impl State {
    fn roster(&self, team_name: &str) -> Vec<TeamMember> {
        self.users
            .values()
            .filter(|u| u.team_name == team_name)
            .map(|u| TeamMember {
                user_id: u.user_id.clone(),
                username: u.username.clone(),
                is_active: u.is_active,
            })
            .collect()
    }
}

/// Both stores over in-process maps.
///
/// Mirrors the PostgreSQL repositories: team creation is atomic, reviewer edges are
/// idempotent and merging only touches OPEN pull requests.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RosterStore for InMemoryStore {
    async fn create_team(&self, team: &Team) -> Result<Team, AppError> {
        let mut state = self.state.write().await;

        if !state.teams.insert(team.team_name.clone()) {
            return Err(AppError::TeamExists(format!(
                "team '{}' already exists",
                team.team_name
            )));
        }

        for user in team.users() {
            state.users.insert(user.user_id.clone(), user);
        }

        Ok(Team {
            team_name: team.team_name.clone(),
            members: state.roster(&team.team_name),
        })
    }

    async fn find_user_team(&self, user_id: &str) -> Result<Option<String>, AppError> {
        let state = self.state.read().await;
        Ok(state.users.get(user_id).map(|u| u.team_name.clone()))
    }

    async fn get_team(&self, team_name: &str) -> Result<Option<Team>, AppError> {
        let state = self.state.read().await;
        if !state.teams.contains(team_name) {
            return Ok(None);
        }
        Ok(Some(Team {
            team_name: team_name.to_string(),
            members: state.roster(team_name),
        }))
    }

    async fn list_teams(&self) -> Result<Vec<Team>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .teams
            .iter()
            .map(|name| Team {
                team_name: name.clone(),
                members: state.roster(name),
            })
            .collect())
    }

    async fn set_user_active(
        &self,
        user_id: &str,
        is_active: bool,
    ) -> Result<Option<User>, AppError> {
        let mut state = self.state.write().await;
        Ok(state.users.get_mut(user_id).map(|user| {
            user.is_active = is_active;
            user.clone()
        }))
    }
}

#[async_trait]
impl PullRequestStore for InMemoryStore {
    async fn create_pull_request(&self, pr: &PullRequest) -> Result<(), AppError> {
        let mut state = self.state.write().await;

        if state.pull_requests.contains_key(&pr.pull_request_id) {
            return Err(AppError::PrExists(format!(
                "pull request '{}' already exists",
                pr.pull_request_id
            )));
        }
        if !state.users.contains_key(&pr.author_id) {
            return Err(AppError::AuthorNotFound(format!(
                "author '{}' not found",
                pr.author_id
            )));
        }

        state
            .pull_requests
            .insert(pr.pull_request_id.clone(), pr.clone());
        Ok(())
    }

    async fn get_pull_request(&self, pr_id: &str) -> Result<Option<PullRequest>, AppError> {
        let state = self.state.read().await;
        Ok(state.pull_requests.get(pr_id).cloned())
    }

    async fn add_reviewer(&self, pr_id: &str, user_id: &str) -> Result<(), AppError> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(user_id) {
            return Err(AppError::NotFound(format!("user '{}' not found", user_id)));
        }
        let pr = state
            .pull_requests
            .get_mut(pr_id)
            .ok_or_else(|| AppError::NotFound(format!("pull request '{}' not found", pr_id)))?;

        if !pr.has_reviewer(user_id) {
            pr.assigned_reviewers.push(user_id.to_string());
        }
        Ok(())
    }

    async fn remove_reviewer(&self, pr_id: &str, user_id: &str) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        if let Some(pr) = state.pull_requests.get_mut(pr_id) {
            pr.assigned_reviewers.retain(|r| r != user_id);
        }
        Ok(())
    }

    async fn set_merged(&self, pr_id: &str, merged_at: DateTime<Utc>) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        if let Some(pr) = state.pull_requests.get_mut(pr_id) {
            if pr.status == PullRequestStatus::Open {
                pr.status = PullRequestStatus::Merged;
                pr.merged_at = Some(merged_at);
            }
        }
        Ok(())
    }

    async fn list_by_reviewer(&self, user_id: &str) -> Result<Vec<PullRequest>, AppError> {
        let state = self.state.read().await;
        let mut prs: Vec<PullRequest> = state
            .pull_requests
            .values()
            .filter(|pr| pr.has_reviewer(user_id))
            .cloned()
            .collect();
        prs.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.pull_request_id.cmp(&b.pull_request_id))
        });
        Ok(prs)
    }
}
