//! Database operations for transaction records.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    database_id::RecordId,
    record::{Category, NewTransaction, TransactionRecord, domain::coerce_amount},
};

/// Insert a transaction and return it with its generated ID.
pub fn insert_record(
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<TransactionRecord, Error> {
    connection.execute(
        "INSERT INTO record (event, date, amount, category, description)
        VALUES (?1, ?2, ?3, ?4, ?5);",
        (
            transaction.event.as_ref(),
            transaction.date.to_string(),
            transaction.amount,
            transaction.category.as_str(),
            &transaction.description,
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(transaction.into_record(id))
}

/// Overwrite every field of an existing record.
pub fn replace_record(
    id: RecordId,
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<TransactionRecord, Error> {
    let rows_affected = connection.execute(
        "UPDATE record
        SET event = ?1, date = ?2, amount = ?3, category = ?4, description = ?5
        WHERE id = ?6",
        (
            transaction.event.as_ref(),
            transaction.date.to_string(),
            transaction.amount,
            transaction.category.as_str(),
            &transaction.description,
            id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    Ok(transaction.into_record(id))
}

/// Retrieve a single record by ID.
pub fn get_record(id: RecordId, connection: &Connection) -> Result<TransactionRecord, Error> {
    connection
        .prepare(
            "SELECT id, event, date, amount, category, description FROM record WHERE id = :id;",
        )?
        .query_row(&[(":id", &id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all records in the order they were created.
pub fn get_all_records(connection: &Connection) -> Result<Vec<TransactionRecord>, Error> {
    connection
        .prepare("SELECT id, event, date, amount, category, description FROM record ORDER BY id ASC;")?
        .query_map([], map_row)?
        .map(|maybe_record| maybe_record.map_err(|error| error.into()))
        .collect()
}

/// Delete a record by ID and return what was deleted.
pub fn delete_record(id: RecordId, connection: &Connection) -> Result<TransactionRecord, Error> {
    let record = match get_record(id, connection) {
        Ok(record) => record,
        Err(Error::NotFound) => return Err(Error::DeleteMissingTransaction),
        Err(error) => return Err(error),
    };

    connection.execute("DELETE FROM record WHERE id = ?1", [id])?;

    Ok(record)
}

/// Delete every record and return what was deleted.
pub fn delete_all_records(connection: &Connection) -> Result<Vec<TransactionRecord>, Error> {
    let records = get_all_records(connection)?;
    connection.execute("DELETE FROM record", ())?;

    Ok(records)
}

/// Initialize the record table.
///
/// `amount` is declared without a type so that whatever was stored is read
/// back as-is and coerced by [coerce_amount].
pub fn create_record_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS record (
            id INTEGER PRIMARY KEY,
            event TEXT NOT NULL DEFAULT '',
            date TEXT NOT NULL DEFAULT '',
            amount,
            category TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT ''
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<TransactionRecord, rusqlite::Error> {
    let category: String = row.get(4)?;

    Ok(TransactionRecord {
        id: row.get(0)?,
        event: row.get(1)?,
        date: row.get(2)?,
        amount: coerce_amount(row.get_ref(3)?),
        category: Category::from(category),
        description: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        event::EventName,
        record::{Category, NewTransaction, RecordDate},
    };

    use super::{
        create_record_table, delete_all_records, delete_record, get_all_records, get_record,
        insert_record, replace_record,
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_record_table(&connection).expect("Could not create record table");
        connection
    }

    fn new_transaction(amount: f64, category: Category) -> NewTransaction {
        NewTransaction {
            event: EventName::new_unchecked("Gala"),
            date: RecordDate::from(date!(2025 - 03 - 14)),
            amount,
            category,
            description: "Tickets".to_owned(),
        }
    }

    #[test]
    fn insert_and_get_record() {
        let connection = get_test_connection();

        let inserted = insert_record(new_transaction(100.0, Category::Door), &connection)
            .expect("Could not insert record");

        assert!(inserted.id > 0);
        assert_eq!(inserted.date, "03/14/2025");
        assert_eq!(get_record(inserted.id, &connection), Ok(inserted));
    }

    #[test]
    fn get_all_records_in_creation_order() {
        let connection = get_test_connection();
        let first = insert_record(new_transaction(100.0, Category::Door), &connection).unwrap();
        let second =
            insert_record(new_transaction(-40.0, Category::FoodAndBev), &connection).unwrap();

        let records = get_all_records(&connection).unwrap();

        assert_eq!(records, vec![first, second]);
    }

    #[test]
    fn replace_overwrites_all_fields() {
        let connection = get_test_connection();
        let original = insert_record(new_transaction(100.0, Category::Door), &connection).unwrap();

        let mut replacement = new_transaction(-12.5, Category::Decor);
        replacement.description = "Balloons".to_owned();
        let replaced = replace_record(original.id, replacement, &connection).unwrap();

        let got = get_record(original.id, &connection).unwrap();
        assert_eq!(got, replaced);
        assert_eq!(got.amount, -12.5);
        assert_eq!(got.category, Category::Decor);
        assert_eq!(got.description, "Balloons");
    }

    #[test]
    fn replace_missing_record_fails() {
        let connection = get_test_connection();

        let result = replace_record(42, new_transaction(1.0, Category::Other), &connection);

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
    }

    #[test]
    fn delete_returns_deleted_record() {
        let connection = get_test_connection();
        let record = insert_record(new_transaction(100.0, Category::Door), &connection).unwrap();

        let deleted = delete_record(record.id, &connection);

        assert_eq!(deleted, Ok(record.clone()));
        assert_eq!(get_record(record.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_record_fails() {
        let connection = get_test_connection();

        assert_eq!(
            delete_record(7, &connection),
            Err(Error::DeleteMissingTransaction)
        );
    }

    #[test]
    fn delete_all_empties_table() {
        let connection = get_test_connection();
        insert_record(new_transaction(100.0, Category::Door), &connection).unwrap();
        insert_record(new_transaction(-40.0, Category::FoodAndBev), &connection).unwrap();

        let deleted = delete_all_records(&connection).unwrap();

        assert_eq!(deleted.len(), 2);
        assert!(get_all_records(&connection).unwrap().is_empty());
    }

    #[test]
    fn malformed_stored_values_are_tolerated() {
        let connection = get_test_connection();
        connection
            .execute(
                "INSERT INTO record (event, date, amount, category, description)
                VALUES ('Gala', 'someday', 'lots', 'Raffle', '')",
                (),
            )
            .unwrap();

        let records = get_all_records(&connection).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount, 0.0);
        assert_eq!(records[0].date, "someday");
        assert_eq!(records[0].category, Category::Custom("Raffle".to_owned()));
    }
}
