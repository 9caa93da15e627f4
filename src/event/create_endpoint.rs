//! The endpoint for adding an event from the add-event prompt.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxPrompt;

use crate::{Error, alert::Alert, event::EventName, store::RecordStore};

/// Create an event named by the text the user typed into the `hx-prompt` dialog.
///
/// The event selector is refreshed by the store's change notification, not by this response.
pub async fn create_event_endpoint(
    State(store): State<RecordStore>,
    HxPrompt(prompt): HxPrompt,
) -> Response {
    let Some(prompt) = prompt else {
        // The user dismissed the prompt.
        return StatusCode::NO_CONTENT.into_response();
    };

    let name = match EventName::new(&prompt) {
        Ok(name) => name,
        Err(error) => return error.into_alert_response(),
    };

    match store.create_event(name) {
        Ok(event) => {
            tracing::info!("Created event {:?}", event.name.as_ref());
            let details = format!("\"{}\" can now be chosen for transactions.", event.name);
            (StatusCode::CREATED, Alert::success("Event created", &details).into_html())
                .into_response()
        }
        Err(error) => {
            if !matches!(error, Error::DuplicateEventName(_)) {
                tracing::error!("An unexpected error occurred while creating an event: {error}");
            }

            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{event::EventName, store::RecordStore};

    use super::create_event_endpoint;

    fn get_test_server() -> (TestServer, RecordStore) {
        let store = RecordStore::new(Connection::open_in_memory().unwrap())
            .expect("Could not create store");
        let app = Router::new()
            .route("/api/events", post(create_event_endpoint))
            .with_state(store.clone());

        (
            TestServer::try_new(app).expect("Could not create test server."),
            store,
        )
    }

    #[tokio::test]
    async fn creates_event_from_prompt() {
        let (server, store) = get_test_server();

        let response = server
            .post("/api/events")
            .add_header("HX-Prompt", "Spring Gala")
            .await;

        response.assert_status(StatusCode::CREATED);
        let events = store.events().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, EventName::new_unchecked("Spring Gala"));
    }

    #[tokio::test]
    async fn rejects_duplicate_event() {
        let (server, store) = get_test_server();
        store.create_event(EventName::new_unchecked("Gala")).unwrap();

        let response = server
            .post("/api/events")
            .add_header("HX-Prompt", "Gala")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.text().contains("already exists"));
        assert_eq!(store.events().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejects_blank_event_name() {
        let (server, store) = get_test_server();

        let response = server
            .post("/api/events")
            .add_header("HX-Prompt", "   ")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(store.events().unwrap().is_empty());
    }

    #[tokio::test]
    async fn cancelled_prompt_does_nothing() {
        let (server, store) = get_test_server();

        let response = server.post("/api/events").await;

        response.assert_status(StatusCode::NO_CONTENT);
        assert!(store.events().unwrap().is_empty());
    }
}
