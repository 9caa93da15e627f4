//! Implements a struct that holds the state of the REST server.

use std::time::Duration;

use rusqlite::Connection;

use crate::{Error, store::RecordStore, view::ViewSessions};

/// How long a deleted card plays its exit transition if not configured otherwise.
pub const DEFAULT_EXIT_TRANSITION: Duration = Duration::from_millis(300);

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The store that owns the transactions, events and deposit.
    pub store: RecordStore,

    /// The connected page sessions.
    pub sessions: ViewSessions,

    /// How long a deleted card plays its exit transition before it is removed.
    pub exit_transition: Duration,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, exit_transition: Duration) -> Result<Self, Error> {
        Ok(Self {
            store: RecordStore::new(db_connection)?,
            sessions: ViewSessions::default(),
            exit_transition,
        })
    }
}
