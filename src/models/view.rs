use serde::{Deserialize, Serialize};

/// A "viewer was shown this candidate on this day" event
///
/// Immutable once written; the ledger key ("viewer/day/viewed") guarantees
/// at most one row per (viewer, viewed, calendar day).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewRecord {
    pub viewer_id: String,
    pub viewed_id: String,
    /// Business calendar day ("YYYY-MM-DD") the view happened on
    pub calendar_day: String,
    /// When the view was recorded (Unix timestamp)
    pub created_at: i64,
}
