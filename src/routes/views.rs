use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::clock::BusinessCalendar;
use crate::db::tables;
use crate::error::Result;
use crate::ledger::views;
use crate::routes::validation::require_valid_pair;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RecordViewRequest {
    #[serde(rename = "viewerId")]
    pub viewer_id: String,
    #[serde(rename = "viewedId")]
    pub viewed_id: String,
}

#[derive(Debug, Serialize)]
pub struct RecordViewResponse {
    /// False when the candidate was already viewed today (idempotent)
    pub recorded: bool,
}

/// Record that a candidate was actually rendered to the viewer.
///
/// The feed calls this once per surfaced candidate; the view then counts
/// against the daily allowance. Safe to retry: at most one row exists per
/// (viewer, viewed, day).
pub async fn record_view(
    State(state): State<AppState>,
    Json(payload): Json<RecordViewRequest>,
) -> Result<Json<RecordViewResponse>> {
    require_valid_pair(&payload.viewer_id, &payload.viewed_id)?;

    let db = state.db.clone();
    let calendar =
        BusinessCalendar::from_utc_offset_hours(state.config.day_boundary_utc_offset_hours);
    let viewer_id = payload.viewer_id.clone();
    let viewed_id = payload.viewed_id.clone();

    let recorded = tokio::task::spawn_blocking(move || -> Result<bool> {
        let now = Utc::now();
        let day = calendar.day_key(now);

        let write_txn = db.begin_write()?;
        let recorded = {
            let mut table = write_txn.open_table(tables::VIEWS)?;
            views::record_view(&mut table, &viewer_id, &viewed_id, &day, now.timestamp())?
        };
        write_txn.commit()?;
        Ok(recorded)
    })
    .await??;

    if recorded {
        tracing::debug!(
            "View recorded: {} saw {}",
            payload.viewer_id,
            payload.viewed_id
        );
    }

    Ok(Json(RecordViewResponse { recorded }))
}
