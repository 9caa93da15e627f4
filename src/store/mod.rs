//! The record store: SQLite persistence plus a live change feed.

mod changes;
mod record_store;

pub use changes::{Change, ChangeBatch, ChangeKind, StoreEvent};
pub use record_store::{RecordStore, Subscription};
