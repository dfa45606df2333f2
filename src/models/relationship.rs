use serde::{Deserialize, Serialize};

/// Action a user can take on a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipAction {
    Like,
    Dislike,
    Cancel,
}

impl RelationshipAction {
    /// Parse a wire-format action name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "like" => Some(Self::Like),
            "dislike" => Some(Self::Dislike),
            "cancel" => Some(Self::Cancel),
            _ => None,
        }
    }
}

/// Status tag recorded on an event at append time
///
/// Advisory: the resolver derives the effective pair state from the action
/// history, not from these tags (see `resolver`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipStatus {
    Pending,
    Accepted,
    Rejected,
}

/// One entry in the append-only relationship log
///
/// Events are never mutated or deleted; a user changing their mind appends
/// a new event. `seq` is a store-wide monotone counter, so events are
/// totally ordered even when timestamps collide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipEvent {
    pub initiator_id: String,
    pub target_id: String,
    pub action: RelationshipAction,
    pub status: RelationshipStatus,
    /// When the action was taken (Unix timestamp)
    pub created_at: i64,
    pub seq: u64,
}

/// The single current state of an unordered user pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectiveStatus {
    None,
    Pending,
    Accepted,
    Rejected,
}

/// Derived relationship state between two users
///
/// Recomputed on every read from the two directions' most recent events;
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveRelationship {
    pub status: EffectiveStatus,
    /// Timestamp of the most recent event touching the pair, if any
    pub last_action_at: Option<i64>,
    /// Initiator of the most recent event touching the pair, if any
    pub last_actor: Option<String>,
}

impl EffectiveRelationship {
    pub fn none() -> Self {
        Self {
            status: EffectiveStatus::None,
            last_action_at: None,
            last_actor: None,
        }
    }
}
