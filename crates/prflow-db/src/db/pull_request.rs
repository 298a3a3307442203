use async_trait::async_trait;
use chrono::{DateTime, Utc};
use prflow_core::{models::PullRequest, AppError, PullRequestStore};
use sqlx::{PgPool, Postgres};

/// Pull request columns plus the aggregated reviewer list.
/// Used with `LEFT JOIN pr_reviewers r` and `GROUP BY pr.pull_request_id`.
const PULL_REQUEST_COLUMNS: &str = r#"
    pr.pull_request_id,
    pr.pull_request_name,
    pr.author_id,
    pr.status,
    pr.created_at,
    pr.merged_at,
    COALESCE(
        array_agg(r.user_id ORDER BY r.user_id) FILTER (WHERE r.user_id IS NOT NULL),
        ARRAY[]::TEXT[]
    ) AS assigned_reviewers
"#;

/// Repository for pull requests and reviewer edges
#[derive(Clone)]
pub struct PullRequestRepository {
    pool: PgPool,
}

impl PullRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PullRequestStore for PullRequestRepository {
    #[tracing::instrument(skip(self, pr), fields(db.table = "pull_requests", db.operation = "insert", pr_id = %pr.pull_request_id))]
    async fn create_pull_request(&self, pr: &PullRequest) -> Result<(), AppError> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO pull_requests (pull_request_id, pull_request_name, author_id, status, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (pull_request_id) DO NOTHING
            "#,
        )
        .bind(&pr.pull_request_id)
        .bind(&pr.pull_request_name)
        .bind(&pr.author_id)
        .bind(pr.status)
        .bind(pr.created_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted == 0 {
            return Err(AppError::PrExists(format!(
                "pull request '{}' already exists",
                pr.pull_request_id
            )));
        }

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "pull_requests", db.operation = "select"))]
    async fn get_pull_request(&self, pr_id: &str) -> Result<Option<PullRequest>, AppError> {
        let query = format!(
            r#"
            SELECT {PULL_REQUEST_COLUMNS}
            FROM pull_requests pr
            LEFT JOIN pr_reviewers r ON r.pull_request_id = pr.pull_request_id
            WHERE pr.pull_request_id = $1
            GROUP BY pr.pull_request_id
            "#
        );

        let pr = sqlx::query_as::<Postgres, PullRequest>(&query)
            .bind(pr_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(pr)
    }

    #[tracing::instrument(skip(self), fields(db.table = "pr_reviewers", db.operation = "insert"))]
    async fn add_reviewer(&self, pr_id: &str, user_id: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO pr_reviewers (pull_request_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(pr_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "pr_reviewers", db.operation = "delete"))]
    async fn remove_reviewer(&self, pr_id: &str, user_id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM pr_reviewers WHERE pull_request_id = $1 AND user_id = $2")
            .bind(pr_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "pull_requests", db.operation = "update"))]
    async fn set_merged(&self, pr_id: &str, merged_at: DateTime<Utc>) -> Result<(), AppError> {
        let updated = sqlx::query(
            r#"
            UPDATE pull_requests
            SET status = 'MERGED', merged_at = $2
            WHERE pull_request_id = $1 AND status = 'OPEN'
            "#,
        )
        .bind(pr_id)
        .bind(merged_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            tracing::debug!(pr_id, "Pull request was not open; merge timestamp left as is");
        }

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "pr_reviewers", db.operation = "select"))]
    async fn list_by_reviewer(&self, user_id: &str) -> Result<Vec<PullRequest>, AppError> {
        let query = format!(
            r#"
            SELECT {PULL_REQUEST_COLUMNS}
            FROM pull_requests pr
            LEFT JOIN pr_reviewers r ON r.pull_request_id = pr.pull_request_id
            WHERE EXISTS (
                SELECT 1 FROM pr_reviewers mine
                WHERE mine.pull_request_id = pr.pull_request_id AND mine.user_id = $1
            )
            GROUP BY pr.pull_request_id
            ORDER BY pr.created_at ASC, pr.pull_request_id ASC
            "#
        );

        let prs = sqlx::query_as::<Postgres, PullRequest>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(prs)
    }
}
