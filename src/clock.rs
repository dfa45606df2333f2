use chrono::{DateTime, FixedOffset, Utc};

/// Single source of truth for the business-day boundary.
///
/// Every daily counter (views consumed, posts, comments) is keyed on the
/// calendar day in one fixed reference time zone, never the caller's local
/// zone. Both the candidate selector and the quota engine derive their day
/// keys from the same `BusinessCalendar` so they can never disagree about
/// when a day rolls over.
#[derive(Debug, Clone, Copy)]
pub struct BusinessCalendar {
    offset: FixedOffset,
}

impl BusinessCalendar {
    /// Build a calendar from a whole-hour UTC offset (e.g. +9 for KST).
    ///
    /// Offsets outside ±23 hours are rejected by config validation before
    /// this is called, so construction cannot fail.
    pub fn from_utc_offset_hours(hours: i32) -> Self {
        let offset = FixedOffset::east_opt(hours * 3600)
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());
        Self { offset }
    }

    /// Calendar-day key ("YYYY-MM-DD") for an instant, in the reference zone.
    ///
    /// Day keys sort lexicographically in chronological order, which the
    /// quota ledger relies on to find a user's most recent prior record.
    pub fn day_key(&self, now: DateTime<Utc>) -> String {
        now.with_timezone(&self.offset).format("%Y-%m-%d").to_string()
    }
}
