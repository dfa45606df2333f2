use redb::{ReadableTable, Table};

use crate::error::Result;
use crate::models::QuotaRecord;

fn quota_key(user_id: &str, day: &str) -> String {
    format!("{user_id}/{day}")
}

/// Today's quota record, if one exists
pub fn get(
    table: &impl ReadableTable<&'static str, &'static [u8]>,
    user_id: &str,
    day: &str,
) -> Result<Option<QuotaRecord>> {
    match table.get(quota_key(user_id, day).as_str())? {
        Some(value) => Ok(Some(bincode::deserialize(value.value())?)),
        None => Ok(None),
    }
}

/// Bonus balance carried into `day` from the user's most recent earlier
/// record, or 0 if the user has no history.
///
/// Day keys ("YYYY-MM-DD") sort lexicographically in date order, so the
/// last key below `user/day` is the newest prior record.
pub fn inherited_balance(
    table: &impl ReadableTable<&'static str, &'static [u8]>,
    user_id: &str,
    day: &str,
) -> Result<u32> {
    let lower = format!("{user_id}/");
    let upper = quota_key(user_id, day);
    let mut range = table.range(lower.as_str()..upper.as_str())?;
    match range.next_back() {
        Some(entry) => {
            let (_, value) = entry?;
            let record: QuotaRecord = bincode::deserialize(value.value())?;
            Ok(record.clamped_balance())
        }
        None => Ok(0),
    }
}

/// Fetch today's record, creating it if absent.
///
/// Runs inside the caller's write transaction; redb serializes write
/// transactions, so two concurrent first-of-the-day requests cannot both
/// insert. The later one finds the winner's record and proceeds with it.
pub fn get_or_create(
    table: &mut Table<&'static str, &'static [u8]>,
    user_id: &str,
    day: &str,
    now: i64,
) -> Result<QuotaRecord> {
    if let Some(existing) = get(table, user_id, day)? {
        return Ok(existing);
    }

    let inherited = inherited_balance(table, user_id, day)?;
    let record = QuotaRecord::new(user_id, day, inherited, now);
    put(table, &record)?;
    tracing::debug!(
        "Created quota record for user {} on {} with inherited balance {}",
        user_id,
        day,
        inherited
    );
    Ok(record)
}

/// Write a quota record back under its (user, day) key
pub fn put(table: &mut Table<&'static str, &'static [u8]>, record: &QuotaRecord) -> Result<()> {
    let key = quota_key(&record.user_id, &record.calendar_day);
    let bytes = bincode::serialize(record)?;
    table.insert(key.as_str(), bytes.as_slice())?;
    Ok(())
}
