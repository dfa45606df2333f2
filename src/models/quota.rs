use serde::{Deserialize, Serialize};

use crate::constants::{BONUS_BALANCE_CAP, COMMENT_BONUS, COMMENT_BONUS_THRESHOLD, POST_BONUS};

/// Per-user, per-calendar-day quota record
///
/// The "today" counters reset each day (a fresh record is created per day);
/// `bonus_balance` is a persistent wallet carried forward from the user's
/// most recent prior record and capped at `BONUS_BALANCE_CAP`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaRecord {
    pub user_id: String,
    /// Business calendar day ("YYYY-MM-DD") this record covers
    pub calendar_day: String,
    /// Whether the user has posted today (only the first post matters)
    pub posts_today: u32,
    /// Number of counted comments today (monotonically non-decreasing)
    pub comments_today: u32,
    /// Bonus earned today, for the progress display
    pub bonus_earned_today: u32,
    /// Persistent bonus wallet, always within [0, BONUS_BALANCE_CAP]
    pub bonus_balance: u32,
    /// Unix timestamp of the last update
    pub updated_at: i64,
}

impl QuotaRecord {
    /// Create a fresh record for a day, inheriting the bonus wallet
    pub fn new(user_id: &str, calendar_day: &str, inherited_balance: u32, now: i64) -> Self {
        Self {
            user_id: user_id.to_string(),
            calendar_day: calendar_day.to_string(),
            posts_today: 0,
            comments_today: 0,
            bonus_earned_today: 0,
            bonus_balance: inherited_balance.min(BONUS_BALANCE_CAP),
            updated_at: now,
        }
    }

    /// Register a post. Only the day's first post grants bonus.
    ///
    /// Returns the bonus amount granted (0 for repeat posts or at cap).
    pub fn apply_post(&mut self, now: i64) -> u32 {
        self.updated_at = now;
        if self.posts_today > 0 {
            return 0;
        }
        self.posts_today = 1;
        self.grant(POST_BONUS)
    }

    /// Register a counted comment (length filtering happens upstream).
    ///
    /// Grants bonus only on the exact crossing of the daily threshold;
    /// returns the amount granted.
    pub fn apply_comment(&mut self, now: i64) -> u32 {
        self.updated_at = now;
        self.comments_today += 1;
        if self.comments_today == COMMENT_BONUS_THRESHOLD {
            self.grant(COMMENT_BONUS)
        } else {
            0
        }
    }

    /// Add to the wallet, capped; no-op when already at cap.
    fn grant(&mut self, amount: u32) -> u32 {
        let balance = self.clamped_balance();
        if balance >= BONUS_BALANCE_CAP {
            return 0;
        }
        let granted = amount.min(BONUS_BALANCE_CAP - balance);
        self.bonus_balance = balance + granted;
        self.bonus_earned_today += granted;
        granted
    }

    /// The wallet balance, clamped to the cap.
    ///
    /// A stored balance above the cap means the ledger is corrupt; that is
    /// logged for operators and the capped value is used so end users never
    /// see the corruption.
    pub fn clamped_balance(&self) -> u32 {
        if self.bonus_balance > BONUS_BALANCE_CAP {
            tracing::error!(
                "Corrupt quota record for user {} on {}: bonus_balance {} exceeds cap {}",
                self.user_id,
                self.calendar_day,
                self.bonus_balance,
                BONUS_BALANCE_CAP
            );
            BONUS_BALANCE_CAP
        } else {
            self.bonus_balance
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(balance: u32) -> QuotaRecord {
        QuotaRecord::new("u1", "2024-03-15", balance, 1000000)
    }

    #[test]
    fn test_new_record_inherits_balance() {
        let r = record(4);
        assert_eq!(r.bonus_balance, 4);
        assert_eq!(r.posts_today, 0);
        assert_eq!(r.comments_today, 0);
        assert_eq!(r.bonus_earned_today, 0);
    }

    #[test]
    fn test_new_record_clamps_inherited_balance() {
        let r = record(99);
        assert_eq!(r.bonus_balance, BONUS_BALANCE_CAP);
    }

    #[test]
    fn test_first_post_grants_two() {
        let mut r = record(0);
        assert_eq!(r.apply_post(1000001), 2);
        assert_eq!(r.bonus_balance, 2);
        assert_eq!(r.bonus_earned_today, 2);
        assert_eq!(r.posts_today, 1);
    }

    #[test]
    fn test_second_post_grants_nothing() {
        // Starting balance 4: first post caps out at 6, second is a no-op
        let mut r = record(4);
        assert_eq!(r.apply_post(1000001), 2);
        assert_eq!(r.bonus_balance, 6);
        assert_eq!(r.apply_post(1000002), 0);
        assert_eq!(r.bonus_balance, 6);
        assert_eq!(r.posts_today, 1);
    }

    #[test]
    fn test_post_grant_partially_capped() {
        let mut r = record(5);
        assert_eq!(r.apply_post(1000001), 1);
        assert_eq!(r.bonus_balance, 6);
    }

    #[test]
    fn test_post_at_cap_grants_nothing() {
        let mut r = record(6);
        assert_eq!(r.apply_post(1000001), 0);
        assert_eq!(r.bonus_balance, 6);
        assert_eq!(r.bonus_earned_today, 0);
        // The post itself is still counted
        assert_eq!(r.posts_today, 1);
    }

    #[test]
    fn test_comment_grants_only_on_third() {
        let mut r = record(0);
        assert_eq!(r.apply_comment(1), 0);
        assert_eq!(r.apply_comment(2), 0);
        assert_eq!(r.bonus_balance, 0);
        assert_eq!(r.apply_comment(3), 1);
        assert_eq!(r.bonus_balance, 1);
        // Fourth and later comments never grant again
        assert_eq!(r.apply_comment(4), 0);
        assert_eq!(r.apply_comment(5), 0);
        assert_eq!(r.bonus_balance, 1);
        assert_eq!(r.comments_today, 5);
    }

    #[test]
    fn test_third_comment_at_balance_five_reaches_cap() {
        let mut r = record(5);
        r.apply_comment(1);
        r.apply_comment(2);
        assert_eq!(r.apply_comment(3), 1);
        assert_eq!(r.bonus_balance, 6);
        assert_eq!(r.apply_comment(4), 0);
        assert_eq!(r.bonus_balance, 6);
    }

    #[test]
    fn test_third_comment_at_cap_grants_nothing() {
        let mut r = record(6);
        r.apply_comment(1);
        r.apply_comment(2);
        assert_eq!(r.apply_comment(3), 0);
        assert_eq!(r.bonus_balance, 6);
        assert_eq!(r.comments_today, 3);
    }

    #[test]
    fn test_balance_never_exceeds_cap_under_mixed_sequences() {
        let mut r = record(3);
        for i in 0..20 {
            if i % 2 == 0 {
                r.apply_post(i);
            } else {
                r.apply_comment(i);
            }
            assert!(r.bonus_balance <= BONUS_BALANCE_CAP);
        }
    }

    #[test]
    fn test_clamped_balance_degrades_corrupt_record() {
        let mut r = record(0);
        r.bonus_balance = 40;
        assert_eq!(r.clamped_balance(), BONUS_BALANCE_CAP);
    }
}
