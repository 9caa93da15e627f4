//! The deposit adjustment: a manually entered amount added to the displayed total.

use std::ops::Add;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxPrompt;
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;

use crate::{
    Error, alert::Alert, html::format_currency, record::parse_amount, store::RecordStore,
};

/// The accumulated deposit adjustment.
///
/// Independent of the transaction records. It only changes by adding a
/// delta, or by being reset when all data is cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize)]
pub struct DepositAdjustment(f64);

impl DepositAdjustment {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// The adjustment after adding `delta` to it.
    pub fn accumulate(self, delta: f64) -> Self {
        Self(self.0 + delta)
    }
}

impl Add<DepositAdjustment> for f64 {
    type Output = f64;

    fn add(self, deposit: DepositAdjustment) -> Self::Output {
        self + deposit.0
    }
}

/// Add the signed amount typed into the deposit prompt to the deposit adjustment.
///
/// The displayed total is refreshed by the store's change notification.
pub async fn adjust_deposit_endpoint(
    State(store): State<RecordStore>,
    HxPrompt(prompt): HxPrompt,
) -> Response {
    let Some(prompt) = prompt else {
        return StatusCode::NO_CONTENT.into_response();
    };

    let delta = match parse_amount(&prompt) {
        Ok(delta) => delta,
        Err(error) => return error.into_alert_response(),
    };

    match store.adjust_deposit(delta) {
        Ok(deposit) => {
            tracing::info!("Adjusted deposit by {delta}, now {}", deposit.value());
            let details = format!(
                "Added {} to the deposit, which is now {}.",
                format_currency(delta),
                format_currency(deposit.value())
            );
            Alert::success("Deposit updated", &details)
                .into_html()
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not adjust the deposit: {error}");
            error.into_alert_response()
        }
    }
}

/// Get the current deposit adjustment, zero if it has never been set.
pub fn get_deposit(connection: &Connection) -> Result<DepositAdjustment, Error> {
    let value: Option<f64> = connection
        .query_row("SELECT value FROM deposit WHERE id = 1", [], |row| row.get(0))
        .optional()?;

    Ok(DepositAdjustment(value.unwrap_or_default()))
}

/// Overwrite the singleton deposit document.
pub fn set_deposit(deposit: DepositAdjustment, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO deposit (id, value) VALUES (1, ?1)
        ON CONFLICT(id) DO UPDATE SET value = excluded.value",
        (deposit.0,),
    )?;

    Ok(())
}

/// Initialize the deposit table, which holds at most one row.
pub fn create_deposit_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS deposit (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            value REAL NOT NULL
        );",
    )?;

    Ok(())
}
