//! Relationship state resolution.
//!
//! The relationship log is append-only; "what is true right now" for a user
//! pair is derived here from the two directions' most recent events. Pure
//! functions over already-fetched events: no store access, no writes, same
//! inputs always give the same answer.

use crate::models::{
    EffectiveRelationship, EffectiveStatus, RelationshipAction, RelationshipEvent,
    RelationshipStatus,
};

/// What one direction of a pair currently contributes.
///
/// A `cancel` withdraws that direction's standing invitation, so a
/// direction whose latest action is cancel contributes nothing, exactly
/// like a direction with no events at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Standing {
    Nothing,
    Like,
    Dislike,
}

fn standing(event: Option<&RelationshipEvent>) -> Standing {
    match event.map(|e| e.action) {
        None | Some(RelationshipAction::Cancel) => Standing::Nothing,
        Some(RelationshipAction::Like) => Standing::Like,
        Some(RelationshipAction::Dislike) => Standing::Dislike,
    }
}

/// Later of the two most-recent events, by sequence number
fn most_recent<'a>(
    a: Option<&'a RelationshipEvent>,
    b: Option<&'a RelationshipEvent>,
) -> Option<&'a RelationshipEvent> {
    match (a, b) {
        (Some(x), Some(y)) => Some(if x.seq > y.seq { x } else { y }),
        (Some(x), None) => Some(x),
        (None, Some(y)) => Some(y),
        (None, None) => None,
    }
}

/// Collapse a pair's two most-recent directional events into one effective
/// state.
///
/// Two standing likes form a match (`Accepted`); there is no separate
/// "accept" action. A standing dislike on either side rejects the pair. A
/// single standing like is an outstanding invitation (`Pending`). Anything
/// else (no events, or only cancels) is `None`.
///
/// Symmetric in its arguments: swapping the directions swaps nothing.
pub fn resolve_pair(
    a_to_b: Option<&RelationshipEvent>,
    b_to_a: Option<&RelationshipEvent>,
) -> EffectiveRelationship {
    let last = most_recent(a_to_b, b_to_a);
    let status = match (standing(a_to_b), standing(b_to_a)) {
        (Standing::Like, Standing::Like) => EffectiveStatus::Accepted,
        (Standing::Dislike, _) | (_, Standing::Dislike) => EffectiveStatus::Rejected,
        (Standing::Like, Standing::Nothing) | (Standing::Nothing, Standing::Like) => {
            EffectiveStatus::Pending
        }
        (Standing::Nothing, Standing::Nothing) => EffectiveStatus::None,
    };

    EffectiveRelationship {
        status,
        last_action_at: last.map(|e| e.created_at),
        last_actor: last.map(|e| e.initiator_id.clone()),
    }
}

/// Does the counterpart hold the only standing like toward this user?
///
/// This is the round-1 exclusion exception: such a counterpart resurfaces
/// immediately even if previously viewed, so the mutual-match opportunity
/// is not buried behind novelty.
pub fn has_inbound_pending(
    outbound: Option<&RelationshipEvent>,
    inbound: Option<&RelationshipEvent>,
) -> bool {
    standing(inbound) == Standing::Like && standing(outbound) == Standing::Nothing
}

/// Status tag to record on a freshly appended event.
///
/// Advisory only: `resolve_pair` works from actions, not tags. A like
/// against a counterpart with a standing like is tagged `Accepted` (the
/// moment the match forms); a lone like is `Pending`; dislike and cancel
/// are tagged `Rejected`.
pub fn status_after(
    action: RelationshipAction,
    counterpart_latest: Option<&RelationshipEvent>,
) -> RelationshipStatus {
    match action {
        RelationshipAction::Like => {
            if standing(counterpart_latest) == Standing::Like {
                RelationshipStatus::Accepted
            } else {
                RelationshipStatus::Pending
            }
        }
        RelationshipAction::Dislike | RelationshipAction::Cancel => RelationshipStatus::Rejected,
    }
}
