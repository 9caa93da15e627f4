use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;

use crate::{alert::Alert, database_id::RecordId, record::TransactionForm, store::RecordStore};

/// A route handler for replacing every field of a transaction, responds with an alert.
///
/// The card and table row are updated by the store's change notification.
pub async fn replace_transaction_endpoint(
    State(store): State<RecordStore>,
    Path(transaction_id): Path<RecordId>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let transaction = match form.validate() {
        Ok(transaction) => transaction,
        Err(error) => return error.into_alert_response(),
    };

    match store.replace_transaction(transaction_id, transaction) {
        Ok(record) => {
            tracing::info!("Replaced transaction {}", record.id);
            Alert::success("Transaction updated", "The transaction has been saved.")
                .into_html()
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not replace transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}
