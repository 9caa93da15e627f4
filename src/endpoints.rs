//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}', use [format_endpoint].

use std::fmt::Display;

/// The root route which redirects to the manage page.
pub const ROOT: &str = "/";
/// The page with the form, animated cards, the table and the chart.
pub const MANAGE_VIEW: &str = "/manage";
/// The read-only page with a sortable table and the chart.
pub const READ_ONLY_VIEW: &str = "/view";
/// The page with only the chart and totals.
pub const CHART_VIEW: &str = "/chart";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The server-sent event stream that drives a page session.
pub const VIEW_EVENTS: &str = "/api/views/{session_id}/events";
/// The route for selecting the chart mode of a page session.
pub const VIEW_CHART_MODE: &str = "/api/views/{session_id}/chart-mode";
/// The route for sorting the cards and table of a page session.
pub const VIEW_SORT: &str = "/api/views/{session_id}/sort";
/// The route to access transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to create events.
pub const EVENTS_API: &str = "/api/events";
/// The route to adjust the deposit.
pub const DEPOSITS_API: &str = "/api/deposits";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter starts with a left brace and ends with the next right brace,
/// e.g. '{session_id}' in '/api/views/{session_id}/sort'. Only the first
/// parameter is replaced.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: impl Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |offset| param_start + offset + 1);

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
