//! Test helpers: build the router over in-memory stores.
//!
//! Run from workspace root: `cargo test -p prflow-api`. No database is needed.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use prflow_api::setup::routes::setup_routes;
use prflow_api::state::AppState;
use prflow_core::{Config, ServiceConfig};
use prflow_services::{RandomSource, ScriptedRandom, ThreadRandom};
use serde_json::{json, Value};

pub fn test_config() -> Config {
    let config = ServiceConfig::from_lookup(|_| None).expect("Default config should load");
    Config(Box::new(config))
}

/// Router with thread-local randomness
pub fn setup_test_app() -> TestServer {
    setup_test_app_with(Arc::new(ThreadRandom))
}

/// Router with scripted reviewer picks
pub fn setup_scripted_app(picks: Vec<usize>) -> TestServer {
    setup_test_app_with(Arc::new(ScriptedRandom::new(picks)))
}

fn setup_test_app_with(random: Arc<dyn RandomSource>) -> TestServer {
    let state = Arc::new(AppState::in_memory(random));
    let app = setup_routes(&test_config(), state).expect("Failed to build router");
    TestServer::new(app.into_make_service()).expect("Failed to create test server")
}

/// POST /team/add with `(user_id, is_active)` members
pub async fn create_team(server: &TestServer, team_name: &str, members: &[(&str, bool)]) {
    let members: Vec<Value> = members
        .iter()
        .map(|(id, active)| json!({ "user_id": id, "username": id.to_uppercase(), "is_active": active }))
        .collect();
    let response = server
        .post("/team/add")
        .json(&json!({ "team_name": team_name, "members": members }))
        .await;
    assert_eq!(response.status_code(), 201);
}

pub async fn create_pr(server: &TestServer, pr_id: &str, author_id: &str) -> Value {
    let response = server
        .post("/pullRequest/create")
        .json(&json!({
            "pull_request_id": pr_id,
            "pull_request_name": format!("Change {}", pr_id),
            "author_id": author_id,
        }))
        .await;
    assert_eq!(response.status_code(), 201);
    response.json()
}

pub fn reviewers(pr: &Value) -> Vec<String> {
    let mut ids: Vec<String> = pr["assigned_reviewers"]
        .as_array()
        .expect("assigned_reviewers should be an array")
        .iter()
        .map(|v| v.as_str().unwrap_or_default().to_string())
        .collect();
    ids.sort();
    ids
}
