use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::db::tables;
use crate::error::Result;
use crate::ledger::profiles;
use crate::routes::validation::require_valid_user_id;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UpsertProfileRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub matchable: bool,
}

#[derive(Debug, Serialize)]
pub struct UpsertProfileResponse {
    pub success: bool,
}

/// Upsert a profile directory entry
///
/// Called by the profile service when a profile becomes complete (or stops
/// being so). Flipping `matchable` off removes the user from every
/// viewer's candidate pool on the next selection.
pub async fn upsert_profile(
    State(state): State<AppState>,
    Json(payload): Json<UpsertProfileRequest>,
) -> Result<Json<UpsertProfileResponse>> {
    require_valid_user_id(&payload.user_id)?;

    let db = state.db.clone();
    let user_id = payload.user_id.clone();
    let matchable = payload.matchable;

    tokio::task::spawn_blocking(move || -> Result<()> {
        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(tables::PROFILES)?;
            profiles::set_matchable(&mut table, &user_id, matchable)?;
        }
        write_txn.commit()?;
        Ok(())
    })
    .await??;

    tracing::info!(
        "Profile {} marked matchable={}",
        payload.user_id,
        payload.matchable
    );

    Ok(Json(UpsertProfileResponse { success: true }))
}
