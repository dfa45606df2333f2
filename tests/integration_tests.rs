//! Integration tests for the PeerPrep Match Server API
//!
//! These tests verify the complete request/response cycle: profile pool
//! seeding, candidate selection, relationship actions, and the quota
//! economy.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use peerprep_match_server::{open_database, AppState, Config, Db};

// =============================================================================
// Test Helpers
// =============================================================================

/// Create a test configuration
fn test_config(base_daily_views: u32) -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0, // Random port
        database_path: "".to_string(),
        allowed_origins: vec!["http://localhost:5173".to_string()],
        base_daily_views,
        day_boundary_utc_offset_hours: 0,
        environment: "test".to_string(),
    }
}

/// Create a test database in a temporary directory
fn create_test_db(temp_dir: &TempDir) -> Db {
    open_database(temp_dir.path().join("test.db")).expect("Failed to create test database")
}

/// Create a test app router
fn create_test_app(db: Db, base_daily_views: u32) -> Router {
    use peerprep_match_server::routes::*;

    let state = AppState::new(db, test_config(base_daily_views));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/candidates", get(select_candidates))
        .route(
            "/api/relationship",
            post(act_on_candidate).get(relationship_status),
        )
        .route("/api/views", post(record_view))
        .route("/api/quota", get(quota_status))
        .route("/api/events/post", post(post_created))
        .route("/api/events/comment", post(comment_created))
        .route("/api/profiles", post(upsert_profile))
        .with_state(state)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn seed_matchable(app: &Router, users: &[&str]) {
    for user in users {
        let (status, _) = post_json(
            app,
            "/api/profiles",
            json!({"userId": user, "matchable": true}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}

fn candidates_of(body: &Value) -> Vec<String> {
    body["candidates"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir), 4);

    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert!(body["businessDay"].as_str().unwrap().len() == 10);
}

// =============================================================================
// Candidate selection
// =============================================================================

#[tokio::test]
async fn test_select_candidates_fresh_viewer() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir), 4);
    seed_matchable(&app, &["u1", "u2", "u3", "viewer"]).await;

    let (status, body) = get_json(&app, "/api/candidates?viewerId=viewer").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(candidates_of(&body), vec!["u1", "u2", "u3"]);
    assert!(body.get("exhaustedReason").is_none());
}

#[tokio::test]
async fn test_select_candidates_excludes_viewer_from_pool() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir), 4);
    seed_matchable(&app, &["viewer"]).await;

    let (status, body) = get_json(&app, "/api/candidates?viewerId=viewer").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exhaustedReason"], "no_candidates");
    assert!(candidates_of(&body).is_empty());
}

#[tokio::test]
async fn test_select_candidates_capped_by_remaining_views() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir), 2);
    seed_matchable(&app, &["u1", "u2", "u3", "u4", "viewer"]).await;

    let (_, body) = get_json(&app, "/api/candidates?viewerId=viewer").await;
    assert_eq!(candidates_of(&body).len(), 2);
}

#[tokio::test]
async fn test_select_candidates_invalid_viewer_id() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir), 4);

    let (status, _) = get_json(&app, "/api/candidates?viewerId=bad%2Fid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_viewed_candidate_excluded_until_pool_exhausted() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir), 10);
    seed_matchable(&app, &["u1", "u2", "viewer"]).await;

    // Render u1: round 1 now hides them
    let (status, body) = post_json(
        &app,
        "/api/views",
        json!({"viewerId": "viewer", "viewedId": "u1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recorded"], true);

    let (_, body) = get_json(&app, "/api/candidates?viewerId=viewer").await;
    assert_eq!(candidates_of(&body), vec!["u2"]);
}

#[tokio::test]
async fn test_daily_limit_exhaustion() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir), 1);
    seed_matchable(&app, &["u1", "u2", "viewer"]).await;

    post_json(
        &app,
        "/api/views",
        json!({"viewerId": "viewer", "viewedId": "u1"}),
    )
    .await;

    let (status, body) = get_json(&app, "/api/candidates?viewerId=viewer").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exhaustedReason"], "daily_limit");
}

#[tokio::test]
async fn test_view_recording_is_idempotent_per_day() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir), 4);
    seed_matchable(&app, &["u1", "viewer"]).await;

    let (_, body) = post_json(
        &app,
        "/api/views",
        json!({"viewerId": "viewer", "viewedId": "u1"}),
    )
    .await;
    assert_eq!(body["recorded"], true);

    let (_, body) = post_json(
        &app,
        "/api/views",
        json!({"viewerId": "viewer", "viewedId": "u1"}),
    )
    .await;
    assert_eq!(body["recorded"], false);

    // Only one view consumed
    let (_, body) = get_json(&app, "/api/quota?userId=viewer").await;
    assert_eq!(body["remainingViews"], 3);
}

// =============================================================================
// Relationships
// =============================================================================

#[tokio::test]
async fn test_like_creates_pending_then_mutual_accepts() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir), 4);
    seed_matchable(&app, &["u1", "u2"]).await;

    let (status, body) = post_json(
        &app,
        "/api/relationship",
        json!({"initiatorId": "u1", "targetId": "u2", "action": "like"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["lastActor"], "u1");

    // The mutual like forms the match; no separate accept action exists
    let (_, body) = post_json(
        &app,
        "/api/relationship",
        json!({"initiatorId": "u2", "targetId": "u1", "action": "like"}),
    )
    .await;
    assert_eq!(body["status"], "accepted");

    // Resolution is symmetric
    let (_, ab) = get_json(&app, "/api/relationship?userA=u1&userB=u2").await;
    let (_, ba) = get_json(&app, "/api/relationship?userA=u2&userB=u1").await;
    assert_eq!(ab["status"], "accepted");
    assert_eq!(ab, ba);
}

#[tokio::test]
async fn test_dislike_rejects() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir), 4);

    let (_, body) = post_json(
        &app,
        "/api/relationship",
        json!({"initiatorId": "u1", "targetId": "u2", "action": "dislike"}),
    )
    .await;
    assert_eq!(body["status"], "rejected");
}

#[tokio::test]
async fn test_cancel_withdraws_invitation() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir), 4);

    post_json(
        &app,
        "/api/relationship",
        json!({"initiatorId": "u1", "targetId": "u2", "action": "like"}),
    )
    .await;
    let (_, body) = post_json(
        &app,
        "/api/relationship",
        json!({"initiatorId": "u1", "targetId": "u2", "action": "cancel"}),
    )
    .await;
    assert_eq!(body["status"], "none");

    let (_, body) = get_json(&app, "/api/relationship?userA=u1&userB=u2").await;
    assert_eq!(body["status"], "none");
}

#[tokio::test]
async fn test_action_records_a_view() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir), 10);
    seed_matchable(&app, &["u1", "u2", "viewer"]).await;

    // Disliking u1 counts as having seen them today
    post_json(
        &app,
        "/api/relationship",
        json!({"initiatorId": "viewer", "targetId": "u1", "action": "dislike"}),
    )
    .await;

    let (_, body) = get_json(&app, "/api/candidates?viewerId=viewer").await;
    assert_eq!(candidates_of(&body), vec!["u2"]);

    let (_, body) = get_json(&app, "/api/quota?userId=viewer").await;
    assert_eq!(body["remainingViews"], 9);
}

#[tokio::test]
async fn test_inbound_pending_resurfaces_previously_viewed() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir), 10);
    seed_matchable(&app, &["u1", "u2", "u3", "viewer"]).await;

    // Viewer passed on u1 earlier today (view recorded, no action)
    post_json(
        &app,
        "/api/views",
        json!({"viewerId": "viewer", "viewedId": "u1"}),
    )
    .await;
    let (_, body) = get_json(&app, "/api/candidates?viewerId=viewer").await;
    assert_eq!(candidates_of(&body), vec!["u2", "u3"]);

    // u1 likes the viewer: the invitation beats novelty
    post_json(
        &app,
        "/api/relationship",
        json!({"initiatorId": "u1", "targetId": "viewer", "action": "like"}),
    )
    .await;
    let (_, body) = get_json(&app, "/api/candidates?viewerId=viewer").await;
    assert_eq!(candidates_of(&body), vec!["u1", "u2", "u3"]);
}

#[tokio::test]
async fn test_self_action_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir), 4);

    let (status, _) = post_json(
        &app,
        "/api/relationship",
        json!({"initiatorId": "u1", "targetId": "u1", "action": "like"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_action_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir), 4);

    let (status, _) = post_json(
        &app,
        "/api/relationship",
        json!({"initiatorId": "u1", "targetId": "u2", "action": "superlike"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Quota economy
// =============================================================================

#[tokio::test]
async fn test_quota_starts_at_base() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir), 4);

    let (status, body) = get_json(&app, "/api/quota?userId=u1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["remainingViews"], 4);
    assert_eq!(body["bonusBalance"], 0);
    assert_eq!(body["postsToday"], 0);
    assert_eq!(body["commentsToday"], 0);
}

#[tokio::test]
async fn test_first_post_grants_bonus_second_does_not() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir), 4);

    let (_, body) = post_json(&app, "/api/events/post", json!({"userId": "u1"})).await;
    assert_eq!(body["bonusBalance"], 2);
    assert_eq!(body["bonusEarnedToday"], 2);
    assert_eq!(body["remainingViews"], 6);

    let (_, body) = post_json(&app, "/api/events/post", json!({"userId": "u1"})).await;
    assert_eq!(body["bonusBalance"], 2);
    assert_eq!(body["postsToday"], 1);
}

#[tokio::test]
async fn test_comment_bonus_on_exact_third_comment() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir), 4);

    let long_comment = json!({"userId": "u1", "content": "this is long enough to count"});
    let (_, body) = post_json(&app, "/api/events/comment", long_comment.clone()).await;
    assert_eq!(body["bonusBalance"], 0);
    let (_, body) = post_json(&app, "/api/events/comment", long_comment.clone()).await;
    assert_eq!(body["bonusBalance"], 0);
    assert_eq!(body["commentsToday"], 2);

    let (_, body) = post_json(&app, "/api/events/comment", long_comment.clone()).await;
    assert_eq!(body["bonusBalance"], 1);
    assert_eq!(body["commentsToday"], 3);

    // A fourth comment never grants again
    let (_, body) = post_json(&app, "/api/events/comment", long_comment).await;
    assert_eq!(body["bonusBalance"], 1);
    assert_eq!(body["commentsToday"], 4);
}

#[tokio::test]
async fn test_short_comments_do_not_count() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir), 4);

    // 9 characters after trimming
    let (_, body) = post_json(
        &app,
        "/api/events/comment",
        json!({"userId": "u1", "content": "  too short  "}),
    )
    .await;
    assert_eq!(body["commentsToday"], 0);
}

#[tokio::test]
async fn test_bonus_balance_capped_at_six() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir), 4);

    // +2 post, then three comment batches would exceed the cap
    post_json(&app, "/api/events/post", json!({"userId": "u1"})).await;
    let long_comment = json!({"userId": "u1", "content": "this is long enough to count"});
    for _ in 0..6 {
        post_json(&app, "/api/events/comment", long_comment.clone()).await;
    }

    let (_, body) = get_json(&app, "/api/quota?userId=u1").await;
    let balance = body["bonusBalance"].as_u64().unwrap();
    assert!(balance <= 6);
    assert_eq!(balance, 3); // +2 post, +1 at the third comment
}

#[tokio::test]
async fn test_bonus_extends_candidate_allowance() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir), 1);
    seed_matchable(&app, &["u1", "u2", "u3", "viewer"]).await;

    // Base 1: one view exhausts the day...
    post_json(
        &app,
        "/api/views",
        json!({"viewerId": "viewer", "viewedId": "u1"}),
    )
    .await;
    let (_, body) = get_json(&app, "/api/candidates?viewerId=viewer").await;
    assert_eq!(body["exhaustedReason"], "daily_limit");

    // ...until a post earns bonus views
    post_json(&app, "/api/events/post", json!({"userId": "viewer"})).await;
    let (_, body) = get_json(&app, "/api/candidates?viewerId=viewer").await;
    assert_eq!(candidates_of(&body), vec!["u2", "u3"]);
}
