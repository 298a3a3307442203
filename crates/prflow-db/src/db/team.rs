use async_trait::async_trait;
use prflow_core::{
    models::{Team, TeamMember, User},
    AppError, RosterStore,
};
use sqlx::{PgPool, Postgres};

/// Repository for teams and their members
#[derive(Clone)]
pub struct TeamRepository {
    pool: PgPool,
}

impl TeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn members_of(&self, team_name: &str) -> Result<Vec<TeamMember>, AppError> {
        let members = sqlx::query_as::<Postgres, TeamMember>(
            "SELECT user_id, username, is_active FROM users WHERE team_name = $1 ORDER BY user_id",
        )
        .bind(team_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }
}

#[async_trait]
impl RosterStore for TeamRepository {
    /// Insert the team and upsert its members in one transaction
    #[tracing::instrument(skip(self, team), fields(db.table = "teams", db.operation = "insert", team_name = %team.team_name))]
    async fn create_team(&self, team: &Team) -> Result<Team, AppError> {
        let mut tx = self.pool.begin().await?;

        // The insert doubles as the existence check so concurrent creations cannot both win
        let inserted =
            sqlx::query("INSERT INTO teams (team_name) VALUES ($1) ON CONFLICT (team_name) DO NOTHING")
                .bind(&team.team_name)
                .execute(&mut *tx)
                .await?
                .rows_affected();

        if inserted == 0 {
            tx.rollback().await?;
            return Err(AppError::TeamExists(format!(
                "team '{}' already exists",
                team.team_name
            )));
        }

        for member in &team.members {
            sqlx::query(
                r#"
                INSERT INTO users (user_id, username, team_name, is_active)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (user_id) DO UPDATE
                  SET username = EXCLUDED.username,
                      team_name = EXCLUDED.team_name,
                      is_active = EXCLUDED.is_active
                "#,
            )
            .bind(&member.user_id)
            .bind(&member.username)
            .bind(&team.team_name)
            .bind(member.is_active)
            .execute(&mut *tx)
            .await?;
        }

        let members = sqlx::query_as::<Postgres, TeamMember>(
            "SELECT user_id, username, is_active FROM users WHERE team_name = $1 ORDER BY user_id",
        )
        .bind(&team.team_name)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            team_name = %team.team_name,
            member_count = members.len(),
            "Team created"
        );

        Ok(Team {
            team_name: team.team_name.clone(),
            members,
        })
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    async fn find_user_team(&self, user_id: &str) -> Result<Option<String>, AppError> {
        let team_name = sqlx::query_scalar::<Postgres, String>(
            "SELECT team_name FROM users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(team_name)
    }

    #[tracing::instrument(skip(self), fields(db.table = "teams", db.operation = "select"))]
    async fn get_team(&self, team_name: &str) -> Result<Option<Team>, AppError> {
        let exists = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM teams WHERE team_name = $1)",
        )
        .bind(team_name)
        .fetch_one(&self.pool)
        .await?;

        if !exists {
            return Ok(None);
        }

        let members = self.members_of(team_name).await?;

        Ok(Some(Team {
            team_name: team_name.to_string(),
            members,
        }))
    }

    #[tracing::instrument(skip(self), fields(db.table = "teams", db.operation = "select"))]
    async fn list_teams(&self) -> Result<Vec<Team>, AppError> {
        let names = sqlx::query_scalar::<Postgres, String>(
            "SELECT team_name FROM teams ORDER BY team_name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let users = sqlx::query_as::<Postgres, User>(
            "SELECT user_id, username, team_name, is_active FROM users ORDER BY team_name, user_id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut teams: Vec<Team> = names
            .into_iter()
            .map(|team_name| Team {
                team_name,
                members: Vec::new(),
            })
            .collect();

        for user in users {
            if let Some(team) = teams.iter_mut().find(|t| t.team_name == user.team_name) {
                team.members.push(TeamMember {
                    user_id: user.user_id,
                    username: user.username,
                    is_active: user.is_active,
                });
            }
        }

        Ok(teams)
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "update"))]
    async fn set_user_active(
        &self,
        user_id: &str,
        is_active: bool,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<Postgres, User>(
            r#"
            UPDATE users
            SET is_active = $2
            WHERE user_id = $1
            RETURNING user_id, username, team_name, is_active
            "#,
        )
        .bind(user_id)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
