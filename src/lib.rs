//! Budget Board is a web app for tracking the income and expenses of events.
//!
//! Transactions are logged against named events and categories. Every open
//! page keeps a live view of the data: the server runs a view-model for each
//! page session and streams HTML patches to the browser whenever the record
//! store reports a change.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod database_id;
mod db;
mod deposit;
mod endpoints;
mod event;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod record;
mod routing;
mod store;
mod view;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use database_id::RecordId;
pub use db::initialize as initialize_db;
pub use deposit::DepositAdjustment;
pub use event::{EventLabel, EventName};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use record::{Category, NewTransaction, RecordDate, TransactionRecord};
pub use routing::build_router;
pub use store::{Change, ChangeBatch, ChangeKind, RecordStore, StoreEvent, Subscription};
pub use view::{
    CategoryTotals, ChartMode, ChartSeries, SortDirection, SortField, ViewCapabilities,
    ViewController, aggregate, sort_records,
};

use crate::{
    alert::Alert, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response, view::SessionId,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The date text was not a real calendar date in the form MM/DD/YYYY.
    #[error("\"{0}\" is not a valid date, use the format MM/DD/YYYY")]
    InvalidDate(String),

    /// The amount text could not be parsed as a finite number.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// A required form field was left empty.
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    /// The category is not one of the categories offered by the form.
    #[error("\"{0}\" is not a known category")]
    UnknownCategory(String),

    /// The transaction refers to an event that has not been created.
    #[error("the event \"{0}\" does not exist")]
    UnknownEvent(String),

    /// An empty string was used to create an event name.
    #[error("Event name cannot be empty")]
    EmptyEventName,

    /// The event name already exists in the database.
    #[error("the event \"{0}\" already exists")]
    DuplicateEventName(String),

    /// The chart mode string did not match any of the six chart modes.
    #[error("\"{0}\" is not a chart mode")]
    InvalidChartMode(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A command was sent to a view session that is not connected.
    #[error("the view session {0} is not connected")]
    SessionNotFound(SessionId),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to replace a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("event_label.name") =>
            {
                Error::DuplicateEventName(String::new())
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Render the error as an alert fragment for the page's alert container.
    fn into_alert_response(self) -> Response {
        let details;
        let (status_code, alert) = match self {
            Error::InvalidDate(_)
            | Error::InvalidAmount(_)
            | Error::EmptyField(_)
            | Error::UnknownCategory(_)
            | Error::UnknownEvent(_)
            | Error::EmptyEventName
            | Error::InvalidChartMode(_) => (
                StatusCode::BAD_REQUEST,
                Alert::error("Invalid input", {
                    details = self.to_string();
                    &details
                }),
            ),
            Error::DuplicateEventName(ref name) => (
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Event already exists",
                    {
                        details = format!(
                            "The event \"{name}\" already exists. Choose a different name."
                        );
                        &details
                    },
                ),
            ),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Could not delete transaction",
                    "The transaction could not be found. \
                    It may have already been deleted from another page.",
                ),
            ),
            Error::UpdateMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Could not update transaction",
                    "The transaction could not be found.",
                ),
            ),
            Error::SessionNotFound(_) => (
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Live view disconnected",
                    "This page lost its connection to the server. Refresh the page and try again.",
                ),
            ),
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::error(
                        "Something went wrong",
                        "An unexpected error occurred, check the server logs for more details.",
                    ),
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
