//! Candidate selection.
//!
//! Decides which profiles a viewer may review next. Read-only: the feed
//! records a view (and any like/dislike) separately, so a selection can be
//! retried or re-run without side effects.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::clock::BusinessCalendar;
use crate::db::{tables, Db};
use crate::error::Result;
use crate::ledger::{profiles, relationships, views};
use crate::models::EffectiveStatus;
use crate::quota::QuotaEngine;
use crate::resolver::{has_inbound_pending, resolve_pair};

/// Traversal phase of the candidate pool.
///
/// A viewer who has seen the entire pool at least once moves to the second
/// round, where previously-seen-but-not-matched candidates become eligible
/// again. The phase is derived, not stored: the pool growing can move a
/// viewer back to the first round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Round {
    First,
    Second,
}

/// Why selection produced no candidates. A normal terminal outcome, not an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustedReason {
    DailyLimit,
    NoCandidates,
}

/// Outcome of a selection request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Candidates(Vec<String>),
    Exhausted(ExhaustedReason),
}

#[derive(Clone)]
pub struct CandidateSelector {
    db: Db,
    calendar: BusinessCalendar,
    quota: QuotaEngine,
}

impl CandidateSelector {
    pub fn new(db: Db, calendar: BusinessCalendar, quota: QuotaEngine) -> Self {
        Self {
            db,
            calendar,
            quota,
        }
    }

    /// Select up to `remaining_views` candidates for the viewer.
    ///
    /// All ledger reads happen under one read transaction, so the exclusion
    /// set is always computed from a consistent snapshot. A store failure
    /// aborts the whole call rather than returning a partial set.
    /// Candidates are returned in ascending user-ID order.
    pub fn select(&self, viewer_id: &str, now: DateTime<Utc>) -> Result<Selection> {
        let day = self.calendar.day_key(now);

        let remaining = self.quota.remaining_views(viewer_id, &day)?;
        if remaining == 0 {
            tracing::debug!("Viewer {} exhausted daily limit on {}", viewer_id, day);
            return Ok(Selection::Exhausted(ExhaustedReason::DailyLimit));
        }

        let read_txn = self.db.begin_read()?;

        let profiles_table = read_txn.open_table(tables::PROFILES)?;
        let mut pool = profiles::matchable_users(&profiles_table)?;
        pool.remove(viewer_id);
        let total = pool.len();

        let views_table = read_txn.open_table(tables::VIEWS)?;
        let ever_viewed = views::distinct_viewed(&views_table, viewer_id)?;
        let viewed_today = views::viewed_on_day(&views_table, viewer_id, &day)?;

        let round = if ever_viewed.len() >= total {
            Round::Second
        } else {
            Round::First
        };

        let events = read_txn.open_table(tables::RELATIONSHIP_EVENTS)?;
        let by_target = read_txn.open_table(tables::RELATIONSHIP_EVENTS_BY_TARGET)?;
        let counterparts = relationships::counterparts(&events, &by_target, viewer_id)?;

        let excluded: HashSet<String> = match round {
            Round::Second => {
                // Only matched pairs stay hidden; everyone else is fair
                // game again, except candidates already surfaced today.
                let mut excluded = viewed_today;
                for other in &counterparts {
                    let outbound = relationships::latest_event(&events, viewer_id, other)?;
                    let inbound = relationships::latest_event(&events, other, viewer_id)?;
                    let effective = resolve_pair(outbound.as_ref(), inbound.as_ref());
                    if effective.status == EffectiveStatus::Accepted {
                        excluded.insert(other.clone());
                    }
                }
                excluded
            }
            Round::First => {
                // Novelty first: anyone ever viewed is excluded (today's
                // views are a subset of the all-time set). A counterpart
                // with an outstanding inbound like resurfaces immediately,
                // so the mutual-match opportunity beats novelty.
                let mut excluded = ever_viewed;
                for other in &counterparts {
                    let outbound = relationships::latest_event(&events, viewer_id, other)?;
                    let inbound = relationships::latest_event(&events, other, viewer_id)?;
                    if has_inbound_pending(outbound.as_ref(), inbound.as_ref()) {
                        excluded.remove(other);
                    }
                }
                excluded
            }
        };

        let mut candidates: Vec<String> = pool.difference(&excluded).cloned().collect();
        if candidates.is_empty() {
            tracing::debug!("No eligible candidates for viewer {} on {}", viewer_id, day);
            return Ok(Selection::Exhausted(ExhaustedReason::NoCandidates));
        }

        candidates.sort();
        candidates.truncate(remaining as usize);
        Ok(Selection::Candidates(candidates))
    }
}
