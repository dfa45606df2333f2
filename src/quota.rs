//! Daily quota engine.
//!
//! Owns the bonus side of the view allowance: lazy per-user-per-day record
//! creation with cross-day wallet inheritance, post/comment earn rules, and
//! the remaining-views computation. View consumption itself is tracked by
//! the view ledger (the feed records a view per surfaced candidate); this
//! engine only reads that count.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::clock::BusinessCalendar;
use crate::constants::MIN_COUNTED_COMMENT_CHARS;
use crate::db::{tables, Db};
use crate::error::Result;
use crate::ledger::{quotas, views};
use crate::models::QuotaRecord;

/// Full quota view for the progress display
#[derive(Debug, Clone, Serialize)]
pub struct QuotaSnapshot {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "calendarDay")]
    pub calendar_day: String,
    #[serde(rename = "remainingViews")]
    pub remaining_views: u32,
    #[serde(rename = "bonusBalance")]
    pub bonus_balance: u32,
    #[serde(rename = "bonusEarnedToday")]
    pub bonus_earned_today: u32,
    #[serde(rename = "postsToday")]
    pub posts_today: u32,
    #[serde(rename = "commentsToday")]
    pub comments_today: u32,
}

#[derive(Clone)]
pub struct QuotaEngine {
    db: Db,
    calendar: BusinessCalendar,
    base_daily_views: u32,
}

impl QuotaEngine {
    pub fn new(db: Db, calendar: BusinessCalendar, base_daily_views: u32) -> Self {
        Self {
            db,
            calendar,
            base_daily_views,
        }
    }

    /// Calendar-day key for an instant, in the shared business time zone
    pub fn day_key(&self, now: DateTime<Utc>) -> String {
        self.calendar.day_key(now)
    }

    /// Today's quota record, created if absent.
    ///
    /// The create happens inside a single write transaction; redb
    /// serializes writers, so a concurrent creator for the same (user,
    /// day) either wins the insert or reads the winner's record. A timed
    /// out or retried call is safe for the same reason.
    pub fn get_or_create_record(
        &self,
        user_id: &str,
        day: &str,
        now: i64,
    ) -> Result<QuotaRecord> {
        let write_txn = self.db.begin_write()?;
        let record = {
            let mut table = write_txn.open_table(tables::QUOTA_RECORDS)?;
            quotas::get_or_create(&mut table, user_id, day, now)?
        };
        write_txn.commit()?;
        Ok(record)
    }

    /// Register a post-created event.
    ///
    /// The first post of the day grants +2 bonus (capped); later posts are
    /// counted as no-ops. Counter update and grant commit together; if
    /// the transaction fails, neither is applied.
    pub fn record_post(&self, user_id: &str, day: &str, now: i64) -> Result<QuotaRecord> {
        let write_txn = self.db.begin_write()?;
        let record = {
            let mut table = write_txn.open_table(tables::QUOTA_RECORDS)?;
            let mut record = quotas::get_or_create(&mut table, user_id, day, now)?;
            let granted = record.apply_post(now);
            quotas::put(&mut table, &record)?;
            if granted > 0 {
                tracing::info!("Post bonus +{} for user {} on {}", granted, user_id, day);
            }
            record
        };
        write_txn.commit()?;
        Ok(record)
    }

    /// Register a comment-created event.
    ///
    /// Comments shorter than the minimum trimmed length do not count at
    /// all. The bonus is granted exactly when the daily count crosses the
    /// threshold, never again that day.
    pub fn record_comment(
        &self,
        user_id: &str,
        day: &str,
        trimmed_len: usize,
        now: i64,
    ) -> Result<QuotaRecord> {
        if trimmed_len < MIN_COUNTED_COMMENT_CHARS {
            tracing::debug!(
                "Ignoring short comment ({} chars) from user {}",
                trimmed_len,
                user_id
            );
            // Not a quota-relevant action: report state without creating
            // a record
            let read_txn = self.db.begin_read()?;
            let table = read_txn.open_table(tables::QUOTA_RECORDS)?;
            return match quotas::get(&table, user_id, day)? {
                Some(record) => Ok(record),
                None => {
                    let inherited = quotas::inherited_balance(&table, user_id, day)?;
                    Ok(QuotaRecord::new(user_id, day, inherited, now))
                }
            };
        }

        let write_txn = self.db.begin_write()?;
        let record = {
            let mut table = write_txn.open_table(tables::QUOTA_RECORDS)?;
            let mut record = quotas::get_or_create(&mut table, user_id, day, now)?;
            let granted = record.apply_comment(now);
            quotas::put(&mut table, &record)?;
            if granted > 0 {
                tracing::info!("Comment bonus +{} for user {} on {}", granted, user_id, day);
            }
            record
        };
        write_txn.commit()?;
        Ok(record)
    }

    /// Views the user may still consume today: base + wallet − consumed.
    ///
    /// Read-only: a day with no record yet uses the inherited wallet
    /// balance without creating anything.
    pub fn remaining_views(&self, user_id: &str, day: &str) -> Result<u32> {
        let read_txn = self.db.begin_read()?;

        let quota_table = read_txn.open_table(tables::QUOTA_RECORDS)?;
        let balance = match quotas::get(&quota_table, user_id, day)? {
            Some(record) => record.clamped_balance(),
            None => quotas::inherited_balance(&quota_table, user_id, day)?,
        };

        let views_table = read_txn.open_table(tables::VIEWS)?;
        let consumed = views::views_on_day(&views_table, user_id, day)?;

        Ok((self.base_daily_views + balance).saturating_sub(consumed))
    }

    /// Everything the quota display needs, in one read
    pub fn snapshot(&self, user_id: &str, day: &str) -> Result<QuotaSnapshot> {
        let read_txn = self.db.begin_read()?;

        let quota_table = read_txn.open_table(tables::QUOTA_RECORDS)?;
        let record = match quotas::get(&quota_table, user_id, day)? {
            Some(record) => record,
            None => {
                // No quota-relevant action yet today: synthesize the view
                let inherited = quotas::inherited_balance(&quota_table, user_id, day)?;
                QuotaRecord::new(user_id, day, inherited, 0)
            }
        };

        let views_table = read_txn.open_table(tables::VIEWS)?;
        let consumed = views::views_on_day(&views_table, user_id, day)?;
        let balance = record.clamped_balance();

        Ok(QuotaSnapshot {
            user_id: user_id.to_string(),
            calendar_day: day.to_string(),
            remaining_views: (self.base_daily_views + balance).saturating_sub(consumed),
            bonus_balance: balance,
            bonus_earned_today: record.bonus_earned_today,
            posts_today: record.posts_today,
            comments_today: record.comments_today,
        })
    }
}
