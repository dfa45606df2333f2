use std::collections::HashSet;

use redb::{ReadableTable, Table};

use crate::db::prefix_upper_bound;
use crate::error::Result;
use crate::models::ViewRecord;

fn view_key(viewer_id: &str, day: &str, viewed_id: &str) -> String {
    format!("{viewer_id}/{day}/{viewed_id}")
}

/// Record that a candidate was surfaced to a viewer today.
///
/// Insert-if-absent: returns `true` if a new row was written, `false` if
/// the candidate was already viewed on this day. Existing rows are never
/// overwritten, so `created_at` keeps the first surfacing time.
pub fn record_view(
    table: &mut Table<&'static str, &'static [u8]>,
    viewer_id: &str,
    viewed_id: &str,
    day: &str,
    now: i64,
) -> Result<bool> {
    let key = view_key(viewer_id, day, viewed_id);
    if table.get(key.as_str())?.is_some() {
        return Ok(false);
    }

    let record = ViewRecord {
        viewer_id: viewer_id.to_string(),
        viewed_id: viewed_id.to_string(),
        calendar_day: day.to_string(),
        created_at: now,
    };
    let bytes = bincode::serialize(&record)?;
    table.insert(key.as_str(), bytes.as_slice())?;
    Ok(true)
}

/// Candidates the viewer was shown on a specific day
pub fn viewed_on_day(
    table: &impl ReadableTable<&'static str, &'static [u8]>,
    viewer_id: &str,
    day: &str,
) -> Result<HashSet<String>> {
    let lower = format!("{viewer_id}/{day}/");
    let upper = prefix_upper_bound(&lower);
    let mut viewed = HashSet::new();
    for entry in table.range(lower.as_str()..upper.as_str())? {
        let (_, value) = entry?;
        let record: ViewRecord = bincode::deserialize(value.value())?;
        viewed.insert(record.viewed_id);
    }
    Ok(viewed)
}

/// Every candidate the viewer has ever been shown, across all days
pub fn distinct_viewed(
    table: &impl ReadableTable<&'static str, &'static [u8]>,
    viewer_id: &str,
) -> Result<HashSet<String>> {
    let lower = format!("{viewer_id}/");
    let upper = prefix_upper_bound(&lower);
    let mut viewed = HashSet::new();
    for entry in table.range(lower.as_str()..upper.as_str())? {
        let (_, value) = entry?;
        let record: ViewRecord = bincode::deserialize(value.value())?;
        viewed.insert(record.viewed_id);
    }
    Ok(viewed)
}

/// Number of views consumed by the viewer on a specific day
pub fn views_on_day(
    table: &impl ReadableTable<&'static str, &'static [u8]>,
    viewer_id: &str,
    day: &str,
) -> Result<u32> {
    let lower = format!("{viewer_id}/{day}/");
    let upper = prefix_upper_bound(&lower);
    let mut count = 0;
    for entry in table.range(lower.as_str()..upper.as_str())? {
        entry?;
        count += 1;
    }
    Ok(count)
}
