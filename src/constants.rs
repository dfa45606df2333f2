/// Maximum bonus balance a user can hold (persistent cross-day wallet)
pub const BONUS_BALANCE_CAP: u32 = 6;

/// Bonus granted for the first post of a calendar day
pub const POST_BONUS: u32 = 2;

/// Bonus granted when the daily comment count crosses the threshold
pub const COMMENT_BONUS: u32 = 1;

/// Daily comment count at which the comment bonus is granted (exactly once)
pub const COMMENT_BONUS_THRESHOLD: u32 = 3;

/// Minimum trimmed comment length for a comment to count toward the bonus
pub const MIN_COUNTED_COMMENT_CHARS: usize = 10;

/// Maximum length of a user ID
pub const MAX_USER_ID_CHARS: usize = 64;

// =============================================================================
// Error Messages
// =============================================================================

/// Error message for invalid user ID format
pub const ERR_INVALID_USER_ID: &str = "User ID must be 1-64 characters of [A-Za-z0-9_-]";

/// Error message for a relationship action targeting oneself
pub const ERR_SELF_ACTION: &str = "Initiator and target must be distinct users";

/// Error message for an unknown relationship action
pub const ERR_INVALID_ACTION: &str = "Action must be one of: like, dislike, cancel";
