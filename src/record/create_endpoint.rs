//! The add-transaction form and the endpoint it submits to.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use maud::{Markup, html};

use crate::{
    Error, endpoints,
    event::EventLabel,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, loading_spinner},
    record::{Category, TransactionForm},
    store::RecordStore,
};

/// The element ID of the add-transaction form, which replaces itself after each submission.
pub const TRANSACTION_FORM_ID: &str = "transaction-form";
/// The element ID of the event selector, refreshed whenever an event is added.
pub const EVENT_SELECT_ID: &str = "event-select";

/// Render the add-transaction form prefilled with `form`.
///
/// `error` is shown below the fields when the previous submission was rejected.
pub fn transaction_form_view(
    events: &[EventLabel],
    form: &TransactionForm,
    error: Option<&str>,
) -> Markup {
    let spinner = loading_spinner();

    html! {
        form
            id=(TRANSACTION_FORM_ID)
            hx-post=(endpoints::TRANSACTIONS_API)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4"
        {
            h2 class="text-xl font-bold" { "New Transaction" }

            div
            {
                label for=(EVENT_SELECT_ID) class=(FORM_LABEL_STYLE) { "Event" }

                div class="flex gap-2"
                {
                    select
                        name="event"
                        id=(EVENT_SELECT_ID)
                        required
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        (event_options(events, &form.event))
                    }

                    button
                        type="button"
                        hx-post=(endpoints::EVENTS_API)
                        hx-prompt="Name of the new event"
                        hx-target="#alert-container"
                        hx-target-error="#alert-container"
                        class="px-3 text-sm whitespace-nowrap rounded border border-gray-300 dark:border-gray-600"
                    {
                        "Add event"
                    }
                }
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    name="date"
                    id="date"
                    type="text"
                    placeholder="MM/DD/YYYY"
                    pattern="[0-9]{2}/[0-9]{2}/[0-9]{4}"
                    required
                    value=(form.date)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                // w-full needed to ensure input takes the full width when prefilled with a value
                div class="input-wrapper w-full"
                {
                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        placeholder="0.00"
                        required
                        value=(form.amount)
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                select
                    name="category"
                    id="category"
                    required
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    (category_options(&form.category))
                }
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    name="description"
                    id="description"
                    type="text"
                    placeholder="Description"
                    required
                    value=(form.description)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if let Some(error) = error {
                p class="text-red-500 text-base" { (error) }
            }

            button type="submit" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="inline htmx-indicator" { (spinner) }
                " Add Transaction"
            }
        }
    }
}

/// The options of the event selector with `selected` preselected.
pub fn event_options(events: &[EventLabel], selected: &str) -> Markup {
    html! {
        @if events.is_empty() {
            option value="" disabled selected { "Add an event first" }
        } @else {
            option value="" disabled selected[selected.is_empty()] { "Select an event" }

            @for event in events {
                @let name = event.name.as_ref();
                option value=(name) selected[name == selected] { (name) }
            }
        }
    }
}

/// The options of the category selector with `selected` preselected.
pub fn category_options(selected: &str) -> Markup {
    html! {
        option value="" disabled selected[selected.is_empty()] { "Select a category" }

        @for category in Category::FIXED {
            @let name = category.as_str();
            option value=(name) selected[name == selected] { (name) }
        }
    }
}

/// Validate the submitted form and add the transaction to the store.
///
/// Responds with the form for the next transaction, keeping the event and
/// date, or with the submitted form and the reason it was rejected. The new
/// transaction reaches the page through the store's change notification.
pub async fn create_transaction_endpoint(
    State(store): State<RecordStore>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let events = match store.events() {
        Ok(events) => events,
        Err(error) => {
            tracing::error!("Could not get events for the transaction form: {error}");
            return error.into_alert_response();
        }
    };

    let transaction = match form.validate() {
        Ok(transaction) => transaction,
        Err(error) => {
            return transaction_form_view(&events, &form, Some(&error.to_string())).into_response();
        }
    };

    match store.create_transaction(transaction) {
        Ok(record) => {
            tracing::info!("Created transaction {} for {:?}", record.id, record.event);
            let next_form = TransactionForm {
                event: form.event,
                date: form.date,
                ..Default::default()
            };

            transaction_form_view(&events, &next_form, None).into_response()
        }
        Err(error @ Error::UnknownEvent(_)) => {
            transaction_form_view(&events, &form, Some(&error.to_string())).into_response()
        }
        Err(error) => {
            tracing::error!("Could not create transaction: {error}");
            error.into_alert_response()
        }
    }
}


#[cfg(test)]
mod endpoint_tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{
        endpoints,
        event::EventName,
        record::{Category, TransactionForm},
        store::RecordStore,
    };

    use super::create_transaction_endpoint;

    fn get_test_server() -> (TestServer, RecordStore) {
        let store = RecordStore::new(Connection::open_in_memory().unwrap()).unwrap();
        store
            .create_event(EventName::new_unchecked("Gala"))
            .unwrap();
        let app = Router::new()
            .route(endpoints::TRANSACTIONS_API, post(create_transaction_endpoint))
            .with_state(store.clone());

        (TestServer::try_new(app).unwrap(), store)
    }

    fn valid_form() -> TransactionForm {
        TransactionForm {
            event: "Gala".to_owned(),
            date: "03/14/2025".to_owned(),
            amount: "100".to_owned(),
            category: "Door".to_owned(),
            description: "Tickets".to_owned(),
        }
    }

    fn error_text(html: &Html) -> Option<String> {
        html.select(&Selector::parse("form p").unwrap())
            .next()
            .map(|p| p.text().collect::<String>().trim().to_owned())
    }

    #[tokio::test]
    async fn creates_transaction_and_returns_fresh_form() {
        let (server, store) = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .form(&valid_form())
            .await;

        response.assert_status_ok();
        let records = store.records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount, 100.0);
        assert_eq!(records[0].category, Category::Door);

        let html = Html::parse_fragment(&response.text());
        assert_eq!(error_text(&html), None);
        let amount = html
            .select(&Selector::parse("input[name=amount]").unwrap())
            .next()
            .unwrap();
        assert_eq!(amount.value().attr("value"), Some(""));
        let date = html
            .select(&Selector::parse("input[name=date]").unwrap())
            .next()
            .unwrap();
        assert_eq!(date.value().attr("value"), Some("03/14/2025"));
    }

    #[tokio::test]
    async fn invalid_date_is_reported_without_store_call() {
        let (server, store) = get_test_server();
        let form = TransactionForm {
            date: "14/03/2025".to_owned(),
            ..valid_form()
        };

        let response = server.post(endpoints::TRANSACTIONS_API).form(&form).await;

        response.assert_status_ok();
        let html = Html::parse_fragment(&response.text());
        assert_eq!(
            error_text(&html).as_deref(),
            Some("\"14/03/2025\" is not a valid date, use the format MM/DD/YYYY")
        );
        assert!(store.records().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_event_is_reported() {
        let (server, store) = get_test_server();
        let form = TransactionForm {
            event: "Picnic".to_owned(),
            ..valid_form()
        };

        let response = server.post(endpoints::TRANSACTIONS_API).form(&form).await;

        let html = Html::parse_fragment(&response.text());
        assert_eq!(
            error_text(&html).as_deref(),
            Some("the event \"Picnic\" does not exist")
        );
        assert!(store.records().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_fields_are_reported() {
        let (server, store) = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .form(&[("event", "Gala")])
            .await;

        assert_ne!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let html = Html::parse_fragment(&response.text());
        assert_eq!(error_text(&html).as_deref(), Some("Date cannot be empty"));
        assert!(store.records().unwrap().is_empty());
    }
}
