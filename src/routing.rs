//! Application router configuration with the page, live view and API route definitions.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    deposit::adjust_deposit_endpoint,
    endpoints,
    event::create_event_endpoint,
    not_found::get_404_not_found,
    record::{
        clear_all_endpoint, create_transaction_endpoint, delete_transaction_endpoint,
        replace_transaction_endpoint,
    },
    view::{
        get_chart_page, get_manage_page, get_read_only_page, select_chart_mode_endpoint,
        sort_endpoint, view_events_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::MANAGE_VIEW, get(get_manage_page))
        .route(endpoints::READ_ONLY_VIEW, get(get_read_only_page))
        .route(endpoints::CHART_VIEW, get(get_chart_page));

    let view_routes = Router::new()
        .route(endpoints::VIEW_EVENTS, get(view_events_endpoint))
        .route(endpoints::VIEW_CHART_MODE, post(select_chart_mode_endpoint))
        .route(endpoints::VIEW_SORT, post(sort_endpoint));

    let api_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS_API,
            post(create_transaction_endpoint).delete(clear_all_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            put(replace_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(endpoints::EVENTS_API, post(create_event_endpoint))
        .route(endpoints::DEPOSITS_API, post(adjust_deposit_endpoint));

    page_routes
        .merge(view_routes)
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the manage page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::MANAGE_VIEW)
}

#[cfg(test)]
mod root_route_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{endpoints, routing::get_index_page};

    #[tokio::test]
    async fn root_redirects_to_manage_page() {
        let response = get_index_page().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::MANAGE_VIEW);
    }
}
