use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::error::Result;
use crate::quota::QuotaSnapshot;
use crate::routes::validation::require_valid_user_id;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct QuotaParams {
    #[serde(rename = "userId")]
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PostCreatedRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentCreatedRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub content: String,
}

/// Quota progress for the allowance display
pub async fn quota_status(
    State(state): State<AppState>,
    Query(params): Query<QuotaParams>,
) -> Result<Json<QuotaSnapshot>> {
    require_valid_user_id(&params.user_id)?;

    let engine = state.quota_engine();
    let user_id = params.user_id.clone();

    let snapshot = tokio::task::spawn_blocking(move || {
        let day = engine.day_key(Utc::now());
        engine.snapshot(&user_id, &day)
    })
    .await??;

    Ok(Json(snapshot))
}

/// Post-created event from the board
///
/// The day's first post earns bonus views (capped wallet); repeats are
/// counted but earn nothing.
pub async fn post_created(
    State(state): State<AppState>,
    Json(payload): Json<PostCreatedRequest>,
) -> Result<Json<QuotaSnapshot>> {
    require_valid_user_id(&payload.user_id)?;

    let engine = state.quota_engine();
    let user_id = payload.user_id.clone();

    let snapshot = tokio::task::spawn_blocking(move || {
        let now = Utc::now();
        let day = engine.day_key(now);
        engine.record_post(&user_id, &day, now.timestamp())?;
        engine.snapshot(&user_id, &day)
    })
    .await??;

    Ok(Json(snapshot))
}

/// Comment-created event from the board
///
/// Content is trimmed server-side; short comments never count toward the
/// bonus threshold.
pub async fn comment_created(
    State(state): State<AppState>,
    Json(payload): Json<CommentCreatedRequest>,
) -> Result<Json<QuotaSnapshot>> {
    require_valid_user_id(&payload.user_id)?;

    let engine = state.quota_engine();
    let user_id = payload.user_id.clone();
    let trimmed_len = payload.content.trim().chars().count();

    let snapshot = tokio::task::spawn_blocking(move || {
        let now = Utc::now();
        let day = engine.day_key(now);
        engine.record_comment(&user_id, &day, trimmed_len, now.timestamp())?;
        engine.snapshot(&user_id, &day)
    })
    .await??;

    Ok(Json(snapshot))
}
