use axum::{
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{alert::Alert, store::RecordStore};

/// A route handler for deleting every transaction and resetting the deposit, responds with an alert.
pub async fn clear_all_endpoint(State(store): State<RecordStore>) -> Response {
    match store.clear_all() {
        Ok(deleted_count) => {
            tracing::info!("Cleared {deleted_count} transactions and reset the deposit");
            let details = match deleted_count {
                1 => "Deleted 1 transaction and reset the deposit.".to_owned(),
                count => format!("Deleted {count} transactions and reset the deposit."),
            };

            Alert::success("Cleared all data", &details)
                .into_html()
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not clear all transactions: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, routing::delete};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        deposit::DepositAdjustment,
        endpoints,
        event::EventName,
        record::{Category, NewTransaction, RecordDate},
        store::RecordStore,
    };

    use super::clear_all_endpoint;

    #[tokio::test]
    async fn clears_transactions_and_deposit() {
        let store = RecordStore::new(Connection::open_in_memory().unwrap()).unwrap();
        store
            .create_event(EventName::new_unchecked("Gala"))
            .unwrap();
        for amount in [100.0, -40.0] {
            store
                .create_transaction(NewTransaction {
                    event: EventName::new_unchecked("Gala"),
                    date: RecordDate::from(date!(2025 - 03 - 14)),
                    amount,
                    category: Category::Other,
                    description: "Test".to_owned(),
                })
                .unwrap();
        }
        store.adjust_deposit(25.0).unwrap();
        let app = Router::new()
            .route(endpoints::TRANSACTIONS_API, delete(clear_all_endpoint))
            .with_state(store.clone());
        let server = TestServer::try_new(app).unwrap();

        let response = server.delete(endpoints::TRANSACTIONS_API).await;

        response.assert_status_ok();
        assert!(response.text().contains("Deleted 2 transactions"));
        assert!(store.records().unwrap().is_empty());
        assert_eq!(store.deposit(), Ok(DepositAdjustment::default()));
        // Events are kept.
        assert_eq!(store.events().unwrap().len(), 1);
    }
}
