//! Database ID type definition.

/// The stable identifier the store assigns to a transaction record.
pub type RecordId = i64;

/// The identifier of an event label.
pub type EventId = i64;
