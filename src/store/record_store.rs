//! SQLite-backed record store that publishes every committed change.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::FromRef;
use rusqlite::{Connection, Transaction as SqlTransaction};
use tokio::sync::broadcast;

use crate::{
    AppState, Error,
    database_id::RecordId,
    db::initialize,
    deposit::{DepositAdjustment, get_deposit, set_deposit},
    event::{EventLabel, EventName, create_event, event_exists, get_all_events},
    record::{
        NewTransaction, TransactionRecord, delete_all_records, delete_record, get_all_records,
        insert_record, replace_record,
    },
    store::{Change, ChangeBatch, StoreEvent},
};

/// How many unread notifications a subscriber may fall behind before it lags.
const CHANGE_FEED_CAPACITY: usize = 64;

/// The store that owns all persisted state.
///
/// Mutations are serialised by the connection lock, and each one publishes
/// its notification while still holding the lock, so subscribers see
/// notifications in commit order and a snapshot taken by [RecordStore::subscribe]
/// never overlaps a notification on the feed.
#[derive(Debug, Clone)]
pub struct RecordStore {
    connection: Arc<Mutex<Connection>>,
    sender: broadcast::Sender<StoreEvent>,
}

/// The current state of the store plus a receiver for every later change.
#[derive(Debug)]
pub struct Subscription {
    /// Every current record, announced as added.
    pub records: ChangeBatch,
    pub deposit: DepositAdjustment,
    pub events: Vec<EventLabel>,
    pub receiver: broadcast::Receiver<StoreEvent>,
}

impl FromRef<AppState> for RecordStore {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl RecordStore {
    /// Create a store, adding the tables to the database if needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        initialize(&connection)?;

        let (sender, _) = broadcast::channel(CHANGE_FEED_CAPACITY);

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
            sender,
        })
    }

    /// Take a snapshot of the store and start listening for changes.
    pub fn subscribe(&self) -> Result<Subscription, Error> {
        let connection = self.lock()?;

        Ok(Subscription {
            records: ChangeBatch::initial(get_all_records(&connection)?),
            deposit: get_deposit(&connection)?,
            events: get_all_events(&connection)?,
            receiver: self.sender.subscribe(),
        })
    }

    /// All records in creation order.
    pub fn records(&self) -> Result<Vec<TransactionRecord>, Error> {
        get_all_records(&*self.lock()?)
    }

    /// All events in creation order.
    pub fn events(&self) -> Result<Vec<EventLabel>, Error> {
        get_all_events(&*self.lock()?)
    }

    pub fn deposit(&self) -> Result<DepositAdjustment, Error> {
        get_deposit(&*self.lock()?)
    }

    /// Add a transaction.
    ///
    /// # Errors
    ///
    /// Returns [Error::UnknownEvent] if the transaction's event has not been created.
    pub fn create_transaction(
        &self,
        transaction: NewTransaction,
    ) -> Result<TransactionRecord, Error> {
        let connection = self.lock()?;

        if !event_exists(&transaction.event, &connection)? {
            return Err(Error::UnknownEvent(transaction.event.to_string()));
        }

        let record = insert_record(transaction, &connection)?;
        self.publish_records(vec![Change::added(record.clone())], &connection)?;

        Ok(record)
    }

    /// Replace every field of an existing transaction.
    pub fn replace_transaction(
        &self,
        id: RecordId,
        transaction: NewTransaction,
    ) -> Result<TransactionRecord, Error> {
        let connection = self.lock()?;

        if !event_exists(&transaction.event, &connection)? {
            return Err(Error::UnknownEvent(transaction.event.to_string()));
        }

        let record = replace_record(id, transaction, &connection)?;
        self.publish_records(vec![Change::modified(record.clone())], &connection)?;

        Ok(record)
    }

    /// Delete a transaction and return the deleted record.
    pub fn delete_transaction(&self, id: RecordId) -> Result<TransactionRecord, Error> {
        let connection = self.lock()?;

        let record = delete_record(id, &connection)?;
        self.publish_records(vec![Change::removed(record.clone())], &connection)?;

        Ok(record)
    }

    /// Delete every transaction and reset the deposit adjustment to zero.
    ///
    /// Returns the number of deleted transactions.
    pub fn clear_all(&self) -> Result<usize, Error> {
        let connection = self.lock()?;

        let transaction =
            SqlTransaction::new_unchecked(&connection, rusqlite::TransactionBehavior::Immediate)?;
        let deleted = delete_all_records(&transaction)?;
        set_deposit(DepositAdjustment::default(), &transaction)?;
        transaction.commit()?;

        let deleted_count = deleted.len();
        self.publish(StoreEvent::Records(ChangeBatch {
            changes: deleted.into_iter().map(Change::removed).collect(),
            records: Vec::new(),
        }));
        self.publish(StoreEvent::Deposit(DepositAdjustment::default()));

        Ok(deleted_count)
    }

    /// Add `delta` to the deposit adjustment and return the new value.
    pub fn adjust_deposit(&self, delta: f64) -> Result<DepositAdjustment, Error> {
        let connection = self.lock()?;

        let deposit = get_deposit(&connection)?.accumulate(delta);
        set_deposit(deposit, &connection)?;
        self.publish(StoreEvent::Deposit(deposit));

        Ok(deposit)
    }

    /// Add an event.
    ///
    /// # Errors
    ///
    /// Returns [Error::DuplicateEventName] if the name is taken.
    pub fn create_event(&self, name: EventName) -> Result<EventLabel, Error> {
        let connection = self.lock()?;

        let event = create_event(name, &connection)?;
        self.publish(StoreEvent::Events(get_all_events(&connection)?));

        Ok(event)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }

    fn publish_records(&self, changes: Vec<Change>, connection: &Connection) -> Result<(), Error> {
        let records = get_all_records(connection)?;
        self.publish(StoreEvent::Records(ChangeBatch { changes, records }));

        Ok(())
    }

    fn publish(&self, event: StoreEvent) {
        // Sending only fails when nobody is subscribed, which is fine.
        if self.sender.send(event).is_err() {
            tracing::debug!("No view sessions are listening for store changes");
        }
    }
}
