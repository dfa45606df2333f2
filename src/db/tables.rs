use redb::TableDefinition;

/// Profile directory: user_id -> ProfileRecord (serialized)
///
/// Stand-in for the external profile service; only the matchable flag
/// matters to the selector.
pub const PROFILES: TableDefinition<&str, &[u8]> = TableDefinition::new("profiles");

/// View ledger: "viewer_id/calendar_day/viewed_id" -> ViewRecord (serialized)
///
/// The composite key enforces at most one row per (viewer, viewed, day).
/// Rows are never updated or deleted.
pub const VIEWS: TableDefinition<&str, &[u8]> = TableDefinition::new("views");

/// Relationship event log: "initiator_id/target_id/seq" -> RelationshipEvent
///
/// Append-only; the full action history between two users is retained.
pub const RELATIONSHIP_EVENTS: TableDefinition<&str, &[u8]> =
    TableDefinition::new("relationship_events");

/// Reverse index of the event log: "target_id/initiator_id/seq" -> RelationshipEvent
///
/// Lets us find everyone who has ever acted on a given user without a full
/// scan of the primary log.
pub const RELATIONSHIP_EVENTS_BY_TARGET: TableDefinition<&str, &[u8]> =
    TableDefinition::new("relationship_events_by_target");

/// Quota ledger: "user_id/calendar_day" -> QuotaRecord (serialized)
pub const QUOTA_RECORDS: TableDefinition<&str, &[u8]> = TableDefinition::new("quota_records");

/// Store metadata: counter name -> next value
pub const META: TableDefinition<&str, u64> = TableDefinition::new("meta");

/// Key in META for the relationship event sequence counter
pub const REL_EVENT_SEQ: &str = "relationship_event_seq";
