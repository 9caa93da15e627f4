//! Database operations for event labels.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    event::{EventLabel, EventName},
};

/// Create an event and return it with its generated ID.
///
/// # Errors
///
/// Returns [Error::DuplicateEventName] if an event with the same name exists.
pub fn create_event(name: EventName, connection: &Connection) -> Result<EventLabel, Error> {
    connection
        .execute("INSERT INTO event_label (name) VALUES (?1);", (name.as_ref(),))
        .map_err(|error| match Error::from(error) {
            Error::DuplicateEventName(_) => Error::DuplicateEventName(name.to_string()),
            error => error,
        })?;

    let id = connection.last_insert_rowid();

    Ok(EventLabel { id, name })
}

/// Retrieve all events in the order they were created.
pub fn get_all_events(connection: &Connection) -> Result<Vec<EventLabel>, Error> {
    connection
        .prepare("SELECT id, name FROM event_label ORDER BY id ASC;")?
        .query_map([], map_row)?
        .map(|maybe_event| maybe_event.map_err(|error| error.into()))
        .collect()
}

/// Whether an event with exactly this name exists.
pub fn event_exists(name: &EventName, connection: &Connection) -> Result<bool, Error> {
    connection
        .prepare("SELECT EXISTS(SELECT 1 FROM event_label WHERE name = ?1);")?
        .query_row((name.as_ref(),), |row| row.get(0))
        .map_err(|error| error.into())
}

/// Initialize the event table.
pub fn create_event_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS event_label (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<EventLabel, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = EventName::new_unchecked(&raw_name);

    Ok(EventLabel { id, name })
}


#[cfg(test)]
mod event_query_tests {
    use rusqlite::Connection;

    use crate::{Error, event::EventName};

    use super::{create_event, create_event_table, event_exists, get_all_events};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_event_table(&connection).expect("Could not create event table");
        connection
    }

    #[test]
    fn create_event_succeeds() {
        let connection = get_test_connection();
        let name = EventName::new("Gala").unwrap();

        let event = create_event(name.clone(), &connection).expect("Could not create event");

        assert!(event.id > 0);
        assert_eq!(event.name, name);
    }

    #[test]
    fn duplicate_event_name_is_rejected() {
        let connection = get_test_connection();
        create_event(EventName::new_unchecked("Gala"), &connection).unwrap();

        let result = create_event(EventName::new_unchecked("Gala"), &connection);

        assert_eq!(result, Err(Error::DuplicateEventName("Gala".to_owned())));
    }

    #[test]
    fn get_all_events_in_creation_order() {
        let connection = get_test_connection();
        let gala = create_event(EventName::new_unchecked("Gala"), &connection).unwrap();
        let bake_sale = create_event(EventName::new_unchecked("Bake Sale"), &connection).unwrap();

        let events = get_all_events(&connection).unwrap();

        assert_eq!(events, vec![gala, bake_sale]);
    }

    #[test]
    fn event_exists_matches_exact_name() {
        let connection = get_test_connection();
        create_event(EventName::new_unchecked("Gala"), &connection).unwrap();

        assert_eq!(
            event_exists(&EventName::new_unchecked("Gala"), &connection),
            Ok(true)
        );
        assert_eq!(
            event_exists(&EventName::new_unchecked("Picnic"), &connection),
            Ok(false)
        );
    }
}
