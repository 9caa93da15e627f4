//! Core transaction record types.

use rusqlite::types::ValueRef;
use serde::Serialize;

use crate::{
    database_id::RecordId,
    event::EventName,
    record::{Category, RecordDate},
};

/// A transaction as it is stored, i.e. an amount of money earned or spent at an event.
///
/// Records are read back from the store without validation, so `date` is the
/// raw stored text and `amount` has already been coerced to a number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    /// The ID the store assigned to the record.
    pub id: RecordId,
    /// The name of the event the transaction belongs to.
    pub event: String,
    /// The date text, normally `MM/DD/YYYY`.
    pub date: String,
    /// Positive for income, negative for expenses.
    pub amount: f64,
    pub category: Category,
    pub description: String,
}

/// A validated transaction ready to be written to the store.
///
/// Also used to replace an existing record, since records are only ever
/// updated as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub event: EventName,
    pub date: RecordDate,
    pub amount: f64,
    pub category: Category,
    pub description: String,
}

impl NewTransaction {
    /// Attach the store-assigned ID.
    pub fn into_record(self, id: RecordId) -> TransactionRecord {
        TransactionRecord {
            id,
            event: self.event.to_string(),
            date: self.date.to_string(),
            amount: self.amount,
            category: self.category,
            description: self.description,
        }
    }
}

/// Convert a stored amount to a number.
///
/// Anything that is not a finite number, or text holding one, counts as zero.
pub fn coerce_amount(value: ValueRef<'_>) -> f64 {
    let amount = match value {
        ValueRef::Integer(integer) => integer as f64,
        ValueRef::Real(real) => real,
        ValueRef::Text(text) => std::str::from_utf8(text)
            .ok()
            .and_then(|text| text.trim().parse::<f64>().ok())
            .unwrap_or(0.0),
        ValueRef::Null | ValueRef::Blob(_) => 0.0,
    };

    if amount.is_finite() { amount } else { 0.0 }
}

#[cfg(test)]
mod coerce_amount_tests {
    use rusqlite::types::ValueRef;

    use super::coerce_amount;

    #[test]
    fn numbers_pass_through() {
        assert_eq!(coerce_amount(ValueRef::Integer(12)), 12.0);
        assert_eq!(coerce_amount(ValueRef::Real(-40.5)), -40.5);
    }

    #[test]
    fn numeric_text_is_parsed() {
        assert_eq!(coerce_amount(ValueRef::Text(b" 19.99 ")), 19.99);
    }

    #[test]
    fn non_numeric_values_are_zero() {
        assert_eq!(coerce_amount(ValueRef::Text(b"twenty")), 0.0);
        assert_eq!(coerce_amount(ValueRef::Text(b"NaN")), 0.0);
        assert_eq!(coerce_amount(ValueRef::Real(f64::INFINITY)), 0.0);
        assert_eq!(coerce_amount(ValueRef::Null), 0.0);
        assert_eq!(coerce_amount(ValueRef::Blob(&[1, 2, 3])), 0.0);
    }
}
