//! Change notifications published by the record store.

use crate::{
    database_id::RecordId, deposit::DepositAdjustment, event::EventLabel,
    record::TransactionRecord,
};

/// What happened to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

/// A single record change.
///
/// For [ChangeKind::Removed] the record holds the last known data.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub kind: ChangeKind,
    pub record: TransactionRecord,
}

impl Change {
    pub fn added(record: TransactionRecord) -> Self {
        Self {
            kind: ChangeKind::Added,
            record,
        }
    }

    pub fn modified(record: TransactionRecord) -> Self {
        Self {
            kind: ChangeKind::Modified,
            record,
        }
    }

    pub fn removed(record: TransactionRecord) -> Self {
        Self {
            kind: ChangeKind::Removed,
            record,
        }
    }

    pub fn id(&self) -> RecordId {
        self.record.id
    }
}

/// The changes from one store mutation together with the full record set after it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeBatch {
    pub changes: Vec<Change>,
    /// Every current record in the order the store created them.
    pub records: Vec<TransactionRecord>,
}

impl ChangeBatch {
    /// A batch that announces every record in `records` as added.
    pub fn initial(records: Vec<TransactionRecord>) -> Self {
        Self {
            changes: records.iter().cloned().map(Change::added).collect(),
            records,
        }
    }
}

/// A notification from the store's change feed.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    Records(ChangeBatch),
    Deposit(DepositAdjustment),
    Events(Vec<EventLabel>),
}
