use chrono::{DateTime, Utc};

use crate::constants::{ERR_INVALID_ACTION, ERR_INVALID_USER_ID, ERR_SELF_ACTION};
use crate::error::{AppError, Result};
use crate::models::{validate_user_id, RelationshipAction};

/// Convert Unix timestamp to RFC3339 string, defaulting to now if invalid
pub fn timestamp_to_rfc3339(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .unwrap_or_else(Utc::now)
        .to_rfc3339()
}

/// Reject malformed user IDs before they reach the ledgers
pub fn require_valid_user_id(id: &str) -> Result<()> {
    if !validate_user_id(id) {
        tracing::warn!("Rejected invalid user ID: {:?}", id);
        return Err(AppError::InvalidInput(ERR_INVALID_USER_ID.to_string()));
    }
    Ok(())
}

/// Validate both sides of a relationship action
pub fn require_valid_pair(initiator_id: &str, target_id: &str) -> Result<()> {
    require_valid_user_id(initiator_id)?;
    require_valid_user_id(target_id)?;
    if initiator_id == target_id {
        return Err(AppError::InvalidInput(ERR_SELF_ACTION.to_string()));
    }
    Ok(())
}

/// Parse a wire-format relationship action name
pub fn parse_action(action: &str) -> Result<RelationshipAction> {
    RelationshipAction::parse(action)
        .ok_or_else(|| AppError::InvalidInput(ERR_INVALID_ACTION.to_string()))
}
