use serde::{Deserialize, Serialize};

use crate::constants::MAX_USER_ID_CHARS;

/// Profile directory entry stored in redb
///
/// Only the matchable flag matters to candidate selection; everything else
/// about a profile lives in the external profile service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Whether the profile is complete enough to be surfaced as a candidate
    pub matchable: bool,
    /// When the entry was first written (Unix timestamp)
    pub created_at: i64,
}

/// Validate a user ID: 1-64 characters of [A-Za-z0-9_-].
///
/// The '/' character is reserved as the ledger key separator, so IDs are
/// restricted to a safe alphabet.
pub fn validate_user_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_USER_ID_CHARS
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
