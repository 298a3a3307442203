//! Wire the PostgreSQL repositories into the service layer

use crate::state::AppState;
use prflow_db::{PullRequestRepository, TeamRepository};
use prflow_services::ThreadRandom;
use sqlx::PgPool;
use std::sync::Arc;

pub fn initialize_services(pool: PgPool) -> Arc<AppState> {
    let teams = Arc::new(TeamRepository::new(pool.clone()));
    let pull_requests = Arc::new(PullRequestRepository::new(pool.clone()));

    tracing::info!("Services initialized with PostgreSQL stores");

    Arc::new(AppState::new(
        teams,
        pull_requests,
        Arc::new(ThreadRandom),
        Some(pool),
    ))
}
