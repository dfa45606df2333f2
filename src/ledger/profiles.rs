use std::collections::HashSet;

use chrono::Utc;
use redb::{ReadableTable, Table};

use crate::error::Result;
use crate::models::ProfileRecord;

/// Upsert a profile directory entry, preserving its creation time
pub fn set_matchable(
    table: &mut Table<&'static str, &'static [u8]>,
    user_id: &str,
    matchable: bool,
) -> Result<()> {
    let created_at = table
        .get(user_id)?
        .and_then(|g| bincode::deserialize::<ProfileRecord>(g.value()).ok())
        .map(|r| r.created_at)
        .unwrap_or_else(|| Utc::now().timestamp());

    let record = ProfileRecord {
        matchable,
        created_at,
    };
    let bytes = bincode::serialize(&record)?;
    table.insert(user_id, bytes.as_slice())?;
    Ok(())
}

/// All user IDs with a matchable profile
pub fn matchable_users(
    table: &impl ReadableTable<&'static str, &'static [u8]>,
) -> Result<HashSet<String>> {
    let mut users = HashSet::new();
    for entry in table.iter()? {
        let (key, value) = entry?;
        let record: ProfileRecord = bincode::deserialize(value.value())?;
        if record.matchable {
            users.insert(key.value().to_string());
        }
    }
    Ok(users)
}
