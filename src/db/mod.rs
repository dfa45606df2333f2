pub mod tables;

use redb::{Database, Error as RedbError};
use std::path::Path;
use std::sync::Arc;

/// Database handle type (Arc-wrapped for sharing across handlers)
pub type Db = Arc<Database>;

/// Open or create the redb database at the given path
///
/// Creates all required tables on first run.
#[allow(clippy::result_large_err)]
pub fn open_database(path: impl AsRef<Path>) -> Result<Db, RedbError> {
    tracing::info!("Opening database at: {:?}", path.as_ref());

    // Create parent directory if it doesn't exist
    if let Some(parent) = path.as_ref().parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                tracing::error!("Failed to create database directory: {}", e);
                RedbError::Io(e)
            })?;
        }
    }

    let db = Database::create(path)?;

    // Initialize tables on first run
    let write_txn = db.begin_write()?;
    {
        // Create tables if they don't exist by opening them
        let _ = write_txn.open_table(tables::PROFILES)?;
        let _ = write_txn.open_table(tables::VIEWS)?;
        let _ = write_txn.open_table(tables::RELATIONSHIP_EVENTS)?;
        let _ = write_txn.open_table(tables::RELATIONSHIP_EVENTS_BY_TARGET)?;
        let _ = write_txn.open_table(tables::QUOTA_RECORDS)?;
        let _ = write_txn.open_table(tables::META)?;
    }
    write_txn.commit()?;

    tracing::info!("Database initialized successfully");

    Ok(Arc::new(db))
}

/// Upper bound for a prefix range over composite string keys.
///
/// Keys are "segment/segment/..." where segments never contain '/', so any
/// key starting with `prefix` sorts below `prefix` + U+10FFFF.
pub fn prefix_upper_bound(prefix: &str) -> String {
    format!("{prefix}\u{10FFFF}")
}
