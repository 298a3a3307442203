use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use prflow_core::{
    models::{PullRequest, PullRequestStatus, Team, TeamMember, User},
    AppError, PullRequestStore, RosterStore,
};
use prflow_db::InMemoryStore;
use prflow_services::{
    PullRequestService, RandomSource, ReviewerAssignmentEngine, ScriptedRandom, TeamService,
    ThreadRandom,
};

struct Harness {
    store: Arc<InMemoryStore>,
    teams: TeamService,
    pull_requests: PullRequestService,
}

fn harness_with(random: Arc<dyn RandomSource>) -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let pr_store: Arc<dyn PullRequestStore> = store.clone();
    build(store, pr_store, random)
}

fn build(
    store: Arc<InMemoryStore>,
    pr_store: Arc<dyn PullRequestStore>,
    random: Arc<dyn RandomSource>,
) -> Harness {
    let roster: Arc<dyn RosterStore> = store.clone();
    let engine = ReviewerAssignmentEngine::new(roster.clone(), pr_store.clone(), random);
    Harness {
        teams: TeamService::new(roster.clone()),
        pull_requests: PullRequestService::new(roster, pr_store, engine),
        store,
    }
}

fn member(id: &str, active: bool) -> TeamMember {
    TeamMember {
        user_id: id.to_string(),
        username: id.to_string(),
        is_active: active,
    }
}

async fn seed_team(h: &Harness, name: &str, members: &[(&str, bool)]) {
    h.teams
        .create_team(Team {
            team_name: name.to_string(),
            members: members.iter().map(|(id, a)| member(id, *a)).collect(),
        })
        .await
        .unwrap();
}

fn sorted(mut ids: Vec<String>) -> Vec<String> {
    ids.sort();
    ids
}

#[tokio::test]
async fn test_three_member_team_gets_two_teammates() {
    for _ in 0..50 {
        let h = harness_with(Arc::new(ThreadRandom));
        seed_team(&h, "core", &[("alice", true), ("bob", true), ("carol", true)]).await;

        let pr = h
            .pull_requests
            .create_pr("p1", "Add search", "alice")
            .await
            .unwrap();
        assert_eq!(pr.status, PullRequestStatus::Open);
        assert!(pr.merged_at.is_none());
        assert_eq!(sorted(pr.assigned_reviewers.clone()), vec!["bob", "carol"]);
        assert!(!pr.has_reviewer("alice"));
    }
}

#[tokio::test]
async fn test_two_member_team_gets_single_reviewer() {
    let h = harness_with(Arc::new(ThreadRandom));
    seed_team(&h, "core", &[("alice", true), ("bob", true)]).await;

    let pr = h
        .pull_requests
        .create_pr("p1", "Add search", "alice")
        .await
        .unwrap();
    assert_eq!(pr.assigned_reviewers, vec!["bob"]);

    let stored = h.store.get_pull_request("p1").await.unwrap().unwrap();
    assert_eq!(stored.assigned_reviewers, vec!["bob"]);
}

#[tokio::test]
async fn test_selection_follows_random_source() {
    let h = harness_with(Arc::new(ScriptedRandom::new([2, 1])));
    seed_team(
        &h,
        "core",
        &[("alice", true), ("bob", true), ("carol", true), ("dave", true)],
    )
    .await;

    // Pool in roster order is [bob, carol, dave]
    let pr = h
        .pull_requests
        .create_pr("p1", "Add search", "alice")
        .await
        .unwrap();
    assert_eq!(pr.assigned_reviewers, vec!["dave", "bob"]);
}

#[tokio::test]
async fn test_inactive_teammates_never_selected() {
    let h = harness_with(Arc::new(ThreadRandom));
    seed_team(
        &h,
        "core",
        &[("alice", true), ("bob", false), ("carol", true), ("dave", false)],
    )
    .await;

    for i in 0..20 {
        let pr = h
            .pull_requests
            .create_pr(&format!("p{}", i), "Change", "alice")
            .await
            .unwrap();
        assert_eq!(pr.assigned_reviewers, vec!["carol"]);
    }
}

#[tokio::test]
async fn test_lone_author_gets_no_reviewers() {
    let h = harness_with(Arc::new(ThreadRandom));
    seed_team(&h, "solo", &[("alice", true)]).await;

    let pr = h
        .pull_requests
        .create_pr("p1", "Add search", "alice")
        .await
        .unwrap();
    assert!(pr.assigned_reviewers.is_empty());
}

#[tokio::test]
async fn test_create_pr_unknown_author() {
    let h = harness_with(Arc::new(ThreadRandom));
    let err = h
        .pull_requests
        .create_pr("p1", "Add search", "ghost")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AuthorNotFound(_)));
    assert!(h.store.get_pull_request("p1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_pr_id_writes_no_edges() {
    let h = harness_with(Arc::new(ThreadRandom));
    seed_team(&h, "core", &[("alice", true), ("bob", true)]).await;
    seed_team(&h, "platform", &[("erin", true), ("frank", true)]).await;

    h.pull_requests
        .create_pr("p1", "First", "alice")
        .await
        .unwrap();
    let err = h
        .pull_requests
        .create_pr("p1", "Second", "erin")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PrExists(_)));

    let stored = h.store.get_pull_request("p1").await.unwrap().unwrap();
    assert_eq!(stored.pull_request_name, "First");
    assert_eq!(stored.assigned_reviewers, vec!["bob"]);
}

#[tokio::test]
async fn test_reassign_picks_remaining_active_teammate() {
    let h = harness_with(Arc::new(ThreadRandom));
    seed_team(
        &h,
        "core",
        &[("alice", true), ("bob", true), ("carol", true)],
    )
    .await;
    h.store
        .create_pull_request(&PullRequest::open("p1", "Add search", "alice", Utc::now()))
        .await
        .unwrap();
    h.store.add_reviewer("p1", "bob").await.unwrap();
    // Only carol remains active besides bob
    h.teams.set_user_active("alice", false).await.unwrap();

    let (pr, replaced_by) = h
        .pull_requests
        .reassign_reviewer("p1", "bob")
        .await
        .unwrap();
    assert_eq!(replaced_by, "carol");
    assert_eq!(pr.assigned_reviewers, vec!["carol"]);
    assert!(!pr.has_reviewer("bob"));
}

#[tokio::test]
async fn test_reassign_draws_from_departing_reviewers_team() {
    let h = harness_with(Arc::new(ThreadRandom));
    seed_team(&h, "core", &[("alice", true), ("bob", true)]).await;
    seed_team(&h, "platform", &[("erin", true), ("frank", true)]).await;

    h.store
        .create_pull_request(&PullRequest::open("p1", "Cross-team", "alice", Utc::now()))
        .await
        .unwrap();
    h.store.add_reviewer("p1", "erin").await.unwrap();

    let (_, replaced_by) = h
        .pull_requests
        .reassign_reviewer("p1", "erin")
        .await
        .unwrap();
    assert_eq!(replaced_by, "frank");
}

#[tokio::test]
async fn test_merge_is_idempotent() {
    let h = harness_with(Arc::new(ThreadRandom));
    seed_team(&h, "core", &[("alice", true), ("bob", true)]).await;
    h.pull_requests
        .create_pr("p1", "Add search", "alice")
        .await
        .unwrap();

    let first = h.pull_requests.merge_pr("p1").await.unwrap();
    let second = h.pull_requests.merge_pr("p1").await.unwrap();

    assert_eq!(first.status, PullRequestStatus::Merged);
    assert!(first.merged_at.is_some());
    assert!(first.merge_state_consistent());
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_merge_unknown_pr() {
    let h = harness_with(Arc::new(ThreadRandom));
    let err = h.pull_requests.merge_pr("missing").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_reassign_on_merged_pr_changes_nothing() {
    let h = harness_with(Arc::new(ThreadRandom));
    seed_team(&h, "core", &[("alice", true), ("bob", true), ("carol", true)]).await;
    let created = h
        .pull_requests
        .create_pr("p1", "Add search", "alice")
        .await
        .unwrap();
    let merged = h.pull_requests.merge_pr("p1").await.unwrap();

    let err = h
        .pull_requests
        .reassign_reviewer("p1", &created.assigned_reviewers[0])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PrMerged(_)));

    let after = h.store.get_pull_request("p1").await.unwrap().unwrap();
    assert_eq!(after, merged);
}

#[tokio::test]
async fn test_reassign_precondition_failures() {
    let h = harness_with(Arc::new(ThreadRandom));
    seed_team(&h, "core", &[("alice", true), ("bob", true)]).await;
    h.pull_requests
        .create_pr("p1", "Add search", "alice")
        .await
        .unwrap();

    let err = h
        .pull_requests
        .reassign_reviewer("missing", "bob")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = h
        .pull_requests
        .reassign_reviewer("p1", "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotAssigned(_)));

    // With alice inactive, bob's team has nobody left to take over
    h.teams.set_user_active("alice", false).await.unwrap();
    let err = h
        .pull_requests
        .reassign_reviewer("p1", "bob")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NoCandidate(_)));

    let pr = h.store.get_pull_request("p1").await.unwrap().unwrap();
    assert_eq!(pr.assigned_reviewers, vec!["bob"]);
}

#[tokio::test]
async fn test_list_for_reviewer_includes_merged() {
    let h = harness_with(Arc::new(ThreadRandom));
    seed_team(&h, "core", &[("alice", true), ("bob", true)]).await;
    h.pull_requests.create_pr("p1", "One", "alice").await.unwrap();
    h.pull_requests.create_pr("p2", "Two", "alice").await.unwrap();
    h.pull_requests.merge_pr("p1").await.unwrap();

    let listed = h.pull_requests.list_for_reviewer("bob").await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|pr| pr.merge_state_consistent()));
    assert!(h.pull_requests.list_for_reviewer("nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_team_service_rules() {
    let h = harness_with(Arc::new(ThreadRandom));
    seed_team(&h, "core", &[("alice", true)]).await;

    let err = h
        .teams
        .create_team(Team {
            team_name: "core".to_string(),
            members: vec![],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::TeamExists(_)));

    let err = h
        .teams
        .create_team(Team {
            team_name: "twins".to_string(),
            members: vec![member("x", true), member("x", false)],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));

    assert!(matches!(
        h.teams.get_team("missing").await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        h.teams.set_user_active("ghost", true).await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert_eq!(h.teams.list_teams().await.unwrap().len(), 1);
}

/// Delegates to the in-memory store but refuses edges for one user
struct RejectingStore {
    inner: Arc<InMemoryStore>,
    rejected_user: String,
}

#[async_trait]
impl PullRequestStore for RejectingStore {
    async fn create_pull_request(&self, pr: &PullRequest) -> Result<(), AppError> {
        self.inner.create_pull_request(pr).await
    }

    async fn get_pull_request(&self, pr_id: &str) -> Result<Option<PullRequest>, AppError> {
        self.inner.get_pull_request(pr_id).await
    }

    async fn add_reviewer(&self, pr_id: &str, user_id: &str) -> Result<(), AppError> {
        if user_id == self.rejected_user {
            return Err(AppError::Internal("connection reset".to_string()));
        }
        self.inner.add_reviewer(pr_id, user_id).await
    }

    async fn remove_reviewer(&self, pr_id: &str, user_id: &str) -> Result<(), AppError> {
        self.inner.remove_reviewer(pr_id, user_id).await
    }

    async fn set_merged(&self, pr_id: &str, merged_at: DateTime<Utc>) -> Result<(), AppError> {
        self.inner.set_merged(pr_id, merged_at).await
    }

    async fn list_by_reviewer(&self, user_id: &str) -> Result<Vec<PullRequest>, AppError> {
        self.inner.list_by_reviewer(user_id).await
    }
}

#[tokio::test]
async fn test_failed_edge_write_is_left_out() {
    let store = Arc::new(InMemoryStore::new());
    let rejecting: Arc<dyn PullRequestStore> = Arc::new(RejectingStore {
        inner: store.clone(),
        rejected_user: "carol".to_string(),
    });
    let h = build(store, rejecting, Arc::new(ThreadRandom));
    seed_team(&h, "core", &[("alice", true), ("bob", true), ("carol", true)]).await;

    let pr = h
        .pull_requests
        .create_pr("p1", "Add search", "alice")
        .await
        .unwrap();
    assert_eq!(pr.status, PullRequestStatus::Open);
    assert_eq!(pr.assigned_reviewers, vec!["bob"]);

    let stored = h.store.get_pull_request("p1").await.unwrap().unwrap();
    assert_eq!(stored.assigned_reviewers, vec!["bob"]);
}

#[tokio::test]
async fn test_reassign_surfaces_edge_write_failure() {
    let store = Arc::new(InMemoryStore::new());
    let rejecting: Arc<dyn PullRequestStore> = Arc::new(RejectingStore {
        inner: store.clone(),
        rejected_user: "carol".to_string(),
    });
    let h = build(store, rejecting, Arc::new(ThreadRandom));
    seed_team(&h, "core", &[("alice", false), ("bob", true), ("carol", true)]).await;
    h.store
        .create_pull_request(&PullRequest::open("p1", "Add search", "alice", Utc::now()))
        .await
        .unwrap();
    h.store.add_reviewer("p1", "bob").await.unwrap();

    let err = h
        .pull_requests
        .reassign_reviewer("p1", "bob")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Internal(_)));
}

#[tokio::test]
async fn test_reassign_onto_existing_reviewer_shrinks_set() {
    // Replacement pool for bob is [alice, carol]; index 1 is carol, already reviewing
    let h = harness_with(Arc::new(ScriptedRandom::new([1])));
    seed_team(&h, "core", &[("alice", true), ("bob", true), ("carol", true)]).await;
    h.store
        .create_pull_request(&PullRequest::open("p1", "Add search", "alice", Utc::now()))
        .await
        .unwrap();
    h.store.add_reviewer("p1", "bob").await.unwrap();
    h.store.add_reviewer("p1", "carol").await.unwrap();

    let (pr, replaced_by) = h
        .pull_requests
        .reassign_reviewer("p1", "bob")
        .await
        .unwrap();
    assert_eq!(replaced_by, "carol");
    assert_eq!(pr.assigned_reviewers, vec!["carol"]);

    let stored = h.store.get_pull_request("p1").await.unwrap().unwrap();
    assert_eq!(stored.assigned_reviewers, vec!["carol"]);
}

/// Delegates to the in-memory store but has no team for one user
struct ForgetfulRoster {
    inner: Arc<InMemoryStore>,
    forgotten_user: String,
}

#[async_trait]
impl RosterStore for ForgetfulRoster {
    async fn create_team(&self, team: &Team) -> Result<Team, AppError> {
        self.inner.create_team(team).await
    }

    async fn find_user_team(&self, user_id: &str) -> Result<Option<String>, AppError> {
        if user_id == self.forgotten_user {
            return Ok(None);
        }
        self.inner.find_user_team(user_id).await
    }

    async fn get_team(&self, team_name: &str) -> Result<Option<Team>, AppError> {
        self.inner.get_team(team_name).await
    }

    async fn list_teams(&self) -> Result<Vec<Team>, AppError> {
        self.inner.list_teams().await
    }

    async fn set_user_active(
        &self,
        user_id: &str,
        is_active: bool,
    ) -> Result<Option<User>, AppError> {
        self.inner.set_user_active(user_id, is_active).await
    }
}

#[tokio::test]
async fn test_reassign_reviewer_without_team_is_not_found() {
    let store = Arc::new(InMemoryStore::new());
    let roster: Arc<dyn RosterStore> = Arc::new(ForgetfulRoster {
        inner: store.clone(),
        forgotten_user: "bob".to_string(),
    });
    let engine =
        ReviewerAssignmentEngine::new(roster.clone(), store.clone(), Arc::new(ThreadRandom));

    roster
        .create_team(&Team {
            team_name: "core".to_string(),
            members: vec![
                member("alice", true),
                member("bob", true),
                member("carol", true),
            ],
        })
        .await
        .unwrap();
    store
        .create_pull_request(&PullRequest::open("p1", "Add search", "alice", Utc::now()))
        .await
        .unwrap();
    store.add_reviewer("p1", "bob").await.unwrap();

    let err = engine.reassign_reviewer("p1", "bob").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let pr = store.get_pull_request("p1").await.unwrap().unwrap();
    assert_eq!(pr.assigned_reviewers, vec!["bob"]);
}
