//! Synchronous access helpers for the redb-backed ledgers.
//!
//! Each submodule owns the key layout of one ledger. Callers open the
//! transaction (handlers wrap these in `spawn_blocking`); helpers never
//! begin or commit transactions themselves, so a multi-table operation can
//! stay atomic under one write transaction.

pub mod profiles;
pub mod quotas;
pub mod relationships;
pub mod views;
