//! Form data for creating and replacing transactions.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    event::EventName,
    record::{Category, NewTransaction, RecordDate},
};

/// The raw fields submitted by the add-transaction form.
///
/// Missing fields are read as empty so that they are reported by [TransactionForm::validate].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionForm {
    pub event: String,
    pub date: String,
    pub amount: String,
    pub category: String,
    pub description: String,
}

impl TransactionForm {
    /// Check every field and build the transaction to submit to the store.
    ///
    /// Whether the event exists is checked by the store.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: an empty required field, a date that
    /// is not `MM/DD/YYYY`, a non-numeric amount or an unknown category.
    pub fn validate(&self) -> Result<NewTransaction, Error> {
        let event = EventName::new(&self.event).map_err(|_| Error::EmptyField("Event"))?;

        let date = self.date.trim();
        if date.is_empty() {
            return Err(Error::EmptyField("Date"));
        }
        let date = RecordDate::parse(date)?;

        let amount = parse_amount(&self.amount)?;

        if self.category.trim().is_empty() {
            return Err(Error::EmptyField("Category"));
        }
        let category = Category::fixed(&self.category)?;

        let description = self.description.trim();
        if description.is_empty() {
            return Err(Error::EmptyField("Description"));
        }

        Ok(NewTransaction {
            event,
            date,
            amount,
            category,
            description: description.to_owned(),
        })
    }
}

/// Parse a signed decimal amount, e.g. from the amount input or the deposit prompt.
///
/// # Errors
///
/// Returns [Error::InvalidAmount] for empty, non-numeric or non-finite text.
pub fn parse_amount(text: &str) -> Result<f64, Error> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| Error::InvalidAmount(text.to_owned()))
}
