use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::clock::BusinessCalendar;
use crate::db::tables;
use crate::error::Result;
use crate::ledger::{relationships, views};
use crate::models::{EffectiveRelationship, EffectiveStatus};
use crate::resolver::{resolve_pair, status_after};
use crate::routes::validation::{parse_action, require_valid_pair, timestamp_to_rfc3339};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    #[serde(rename = "initiatorId")]
    pub initiator_id: String,
    #[serde(rename = "targetId")]
    pub target_id: String,
    pub action: String,
}

#[derive(Debug, Deserialize)]
pub struct ResolveParams {
    #[serde(rename = "userA")]
    pub user_a: String,
    #[serde(rename = "userB")]
    pub user_b: String,
}

#[derive(Debug, Serialize)]
pub struct RelationshipView {
    pub status: EffectiveStatus,
    #[serde(rename = "lastActionAt", skip_serializing_if = "Option::is_none")]
    pub last_action_at: Option<String>,
    #[serde(rename = "lastActor", skip_serializing_if = "Option::is_none")]
    pub last_actor: Option<String>,
}

impl From<EffectiveRelationship> for RelationshipView {
    fn from(rel: EffectiveRelationship) -> Self {
        Self {
            status: rel.status,
            last_action_at: rel.last_action_at.map(timestamp_to_rfc3339),
            last_actor: rel.last_actor,
        }
    }
}

/// Act on a candidate (like / dislike / cancel)
///
/// One write transaction appends the event (with its reverse-index row)
/// and upserts today's view row; the initiator has, by definition, seen
/// the target. Responds with the pair's new effective state.
pub async fn act_on_candidate(
    State(state): State<AppState>,
    Json(payload): Json<ActionRequest>,
) -> Result<Json<RelationshipView>> {
    require_valid_pair(&payload.initiator_id, &payload.target_id)?;
    let action = parse_action(&payload.action)?;

    let db = state.db.clone();
    let calendar =
        BusinessCalendar::from_utc_offset_hours(state.config.day_boundary_utc_offset_hours);
    let initiator_id = payload.initiator_id.clone();
    let target_id = payload.target_id.clone();

    let effective = tokio::task::spawn_blocking(move || -> Result<EffectiveRelationship> {
        let now = Utc::now();
        let day = calendar.day_key(now);
        let ts = now.timestamp();

        let write_txn = db.begin_write()?;
        let effective = {
            let mut meta = write_txn.open_table(tables::META)?;
            let mut events = write_txn.open_table(tables::RELATIONSHIP_EVENTS)?;
            let mut by_target = write_txn.open_table(tables::RELATIONSHIP_EVENTS_BY_TARGET)?;

            let inbound = relationships::latest_event(&events, &target_id, &initiator_id)?;
            let status = status_after(action, inbound.as_ref());
            let event = relationships::append_event(
                &mut meta,
                &mut events,
                &mut by_target,
                &initiator_id,
                &target_id,
                action,
                status,
                ts,
            )?;

            let mut view_table = write_txn.open_table(tables::VIEWS)?;
            views::record_view(&mut view_table, &initiator_id, &target_id, &day, ts)?;

            resolve_pair(Some(&event), inbound.as_ref())
        };
        write_txn.commit()?;
        Ok(effective)
    })
    .await??;

    tracing::info!(
        "User {} -> {} action {:?}: now {:?}",
        payload.initiator_id,
        payload.target_id,
        payload.action,
        effective.status
    );

    Ok(Json(effective.into()))
}

/// Effective relationship between two users
///
/// Pure read: collapses each direction's most recent event. Symmetric in
/// userA/userB.
pub async fn relationship_status(
    State(state): State<AppState>,
    Query(params): Query<ResolveParams>,
) -> Result<Json<RelationshipView>> {
    require_valid_pair(&params.user_a, &params.user_b)?;

    let db = state.db.clone();
    let user_a = params.user_a.clone();
    let user_b = params.user_b.clone();

    let effective = tokio::task::spawn_blocking(move || -> Result<EffectiveRelationship> {
        let read_txn = db.begin_read()?;
        let events = read_txn.open_table(tables::RELATIONSHIP_EVENTS)?;
        let a_to_b = relationships::latest_event(&events, &user_a, &user_b)?;
        let b_to_a = relationships::latest_event(&events, &user_b, &user_a)?;
        Ok(resolve_pair(a_to_b.as_ref(), b_to_a.as_ref()))
    })
    .await??;

    Ok(Json(effective.into()))
}
