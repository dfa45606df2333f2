use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::routes::validation::require_valid_user_id;
use crate::selector::{ExhaustedReason, Selection};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SelectParams {
    #[serde(rename = "viewerId")]
    pub viewer_id: String,
}

#[derive(Debug, Serialize)]
pub struct SelectResponse {
    pub candidates: Vec<String>,
    #[serde(rename = "exhaustedReason", skip_serializing_if = "Option::is_none")]
    pub exhausted_reason: Option<ExhaustedReason>,
}

/// Next candidates for the discovery feed
///
/// Exhaustion ("check back tomorrow" / "you've seen everyone") is a normal
/// 200 response with an `exhaustedReason`; only store failures and bad
/// input are errors. Selection performs no writes; the feed reports each
/// candidate it actually renders via `POST /api/views`.
pub async fn select_candidates(
    State(state): State<AppState>,
    Query(params): Query<SelectParams>,
) -> Result<Json<SelectResponse>> {
    require_valid_user_id(&params.viewer_id)?;

    let selector = state.candidate_selector();
    let viewer_id = params.viewer_id.clone();

    let selection =
        tokio::task::spawn_blocking(move || selector.select(&viewer_id, Utc::now())).await??;

    let response = match selection {
        Selection::Candidates(candidates) => {
            tracing::info!(
                "Selected {} candidates for viewer {}",
                candidates.len(),
                params.viewer_id
            );
            SelectResponse {
                candidates,
                exhausted_reason: None,
            }
        }
        Selection::Exhausted(reason) => SelectResponse {
            candidates: Vec::new(),
            exhausted_reason: Some(reason),
        },
    };

    Ok(Json(response))
}
