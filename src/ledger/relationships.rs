use std::collections::HashSet;

use redb::{ReadableTable, Table};

use crate::db::{prefix_upper_bound, tables::REL_EVENT_SEQ};
use crate::error::Result;
use crate::models::{RelationshipAction, RelationshipEvent, RelationshipStatus};

/// Primary log key. The zero-padded sequence keeps events for a direction
/// in append order under lexicographic key ordering.
fn event_key(initiator_id: &str, target_id: &str, seq: u64) -> String {
    format!("{initiator_id}/{target_id}/{seq:020}")
}

fn target_key(target_id: &str, initiator_id: &str, seq: u64) -> String {
    format!("{target_id}/{initiator_id}/{seq:020}")
}

/// Allocate the next store-wide event sequence number.
///
/// Read-increment-write inside the caller's write transaction, so the
/// counter never hands out duplicates.
fn next_seq(meta: &mut Table<&'static str, u64>) -> Result<u64> {
    let next = meta.get(REL_EVENT_SEQ)?.map(|g| g.value()).unwrap_or(0) + 1;
    meta.insert(REL_EVENT_SEQ, next)?;
    Ok(next)
}

/// Append a relationship event to the log and its reverse index.
///
/// The log is append-only: no uniqueness on (initiator, target), no
/// updates, no deletes. History is the point.
#[allow(clippy::too_many_arguments)]
pub fn append_event(
    meta: &mut Table<&'static str, u64>,
    events: &mut Table<&'static str, &'static [u8]>,
    by_target: &mut Table<&'static str, &'static [u8]>,
    initiator_id: &str,
    target_id: &str,
    action: RelationshipAction,
    status: RelationshipStatus,
    now: i64,
) -> Result<RelationshipEvent> {
    let seq = next_seq(meta)?;
    let event = RelationshipEvent {
        initiator_id: initiator_id.to_string(),
        target_id: target_id.to_string(),
        action,
        status,
        created_at: now,
        seq,
    };

    let bytes = bincode::serialize(&event)?;
    events.insert(
        event_key(initiator_id, target_id, seq).as_str(),
        bytes.as_slice(),
    )?;
    by_target.insert(
        target_key(target_id, initiator_id, seq).as_str(),
        bytes.as_slice(),
    )?;

    Ok(event)
}

/// Most recent event in one direction, if any
pub fn latest_event(
    events: &impl ReadableTable<&'static str, &'static [u8]>,
    initiator_id: &str,
    target_id: &str,
) -> Result<Option<RelationshipEvent>> {
    let lower = format!("{initiator_id}/{target_id}/");
    let upper = prefix_upper_bound(&lower);
    let mut range = events.range(lower.as_str()..upper.as_str())?;
    match range.next_back() {
        Some(entry) => {
            let (_, value) = entry?;
            Ok(Some(bincode::deserialize(value.value())?))
        }
        None => Ok(None),
    }
}

/// Every user the given user has any relationship event with, in either
/// direction
pub fn counterparts(
    events: &impl ReadableTable<&'static str, &'static [u8]>,
    by_target: &impl ReadableTable<&'static str, &'static [u8]>,
    user_id: &str,
) -> Result<HashSet<String>> {
    let lower = format!("{user_id}/");
    let upper = prefix_upper_bound(&lower);

    let mut others = HashSet::new();
    // Outbound: keys are "user/target/seq"
    for entry in events.range(lower.as_str()..upper.as_str())? {
        let (key, _) = entry?;
        if let Some(target) = key.value().split('/').nth(1) {
            others.insert(target.to_string());
        }
    }
    // Inbound: reverse-index keys are "user/initiator/seq"
    for entry in by_target.range(lower.as_str()..upper.as_str())? {
        let (key, _) = entry?;
        if let Some(initiator) = key.value().split('/').nth(1) {
            others.insert(initiator.to_string());
        }
    }
    Ok(others)
}
