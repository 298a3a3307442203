//! Application state shared by all handlers.

use std::sync::Arc;

use prflow_core::{PullRequestStore, RosterStore};
use prflow_db::InMemoryStore;
use prflow_services::{PullRequestService, RandomSource, ReviewerAssignmentEngine, TeamService};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub teams: TeamService,
    pub pull_requests: PullRequestService,
    /// Set when the stores are PostgreSQL-backed; probed by `/ready`
    pub pool: Option<PgPool>,
}

impl AppState {
    pub fn new(
        roster: Arc<dyn RosterStore>,
        pull_request_store: Arc<dyn PullRequestStore>,
        random: Arc<dyn RandomSource>,
        pool: Option<PgPool>,
    ) -> Self {
        let engine =
            ReviewerAssignmentEngine::new(roster.clone(), pull_request_store.clone(), random);

        Self {
            teams: TeamService::new(roster.clone()),
            pull_requests: PullRequestService::new(roster, pull_request_store, engine),
            pool,
        }
    }

    /// State over a fresh in-memory store
    pub fn in_memory(random: Arc<dyn RandomSource>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::new(store.clone(), store, random, None)
    }
}
