//! PeerPrep Match Server Library
//!
//! The matching core of the interview-practice platform: candidate
//! selection, relationship state resolution, and the daily view-quota
//! economy, backed by append-only redb ledgers.

pub mod clock;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod ledger;
pub mod models;
pub mod quota;
pub mod resolver;
pub mod routes;
pub mod selector;

pub use clock::BusinessCalendar;
pub use config::Config;
pub use db::{open_database, Db};
pub use error::{AppError, Result};
pub use quota::QuotaEngine;
pub use selector::CandidateSelector;

use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: Config,
}

impl AppState {
    /// Create a new AppState with the given database and configuration
    pub fn new(db: Arc<redb::Database>, config: Config) -> Self {
        Self { db, config }
    }

    /// The one business calendar both engines share
    pub fn calendar(&self) -> BusinessCalendar {
        BusinessCalendar::from_utc_offset_hours(self.config.day_boundary_utc_offset_hours)
    }

    /// Quota engine bound to this state's store and calendar
    pub fn quota_engine(&self) -> QuotaEngine {
        QuotaEngine::new(self.db.clone(), self.calendar(), self.config.base_daily_views)
    }

    /// Candidate selector bound to this state's store and calendar
    pub fn candidate_selector(&self) -> CandidateSelector {
        CandidateSelector::new(self.db.clone(), self.calendar(), self.quota_engine())
    }
}
