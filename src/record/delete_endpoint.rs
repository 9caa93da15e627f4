use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{database_id::RecordId, store::RecordStore};

/// A route handler for deleting a transaction.
///
/// Responds with an empty body on success. The card begins its exit
/// transition when the store's change notification reaches the page.
pub async fn delete_transaction_endpoint(
    State(store): State<RecordStore>,
    Path(transaction_id): Path<RecordId>,
) -> Response {
    match store.delete_transaction(transaction_id) {
        Ok(record) => {
            tracing::info!("Deleted transaction {}", record.id);
            StatusCode::OK.into_response()
        }
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}
