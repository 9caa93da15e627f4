//! The live views of the transaction data.
//!
//! A [ViewController] holds the state of one page and turns store changes and
//! user commands into updates, which are rendered as htmx out-of-band swaps
//! and streamed to the page by its session.

mod aggregation;
mod chart;
mod controller;
mod pages;
mod render;
mod render_diff;
mod session;
mod sorting;

pub use aggregation::{CategoryTotals, ChartMode, ChartSeries, aggregate};
pub use controller::{
    ViewCapabilities, ViewController, ViewInput, ViewState, ViewUpdate, ViewVariant,
};
pub use pages::{get_chart_page, get_manage_page, get_read_only_page};
pub use render_diff::{Patch, RenderDiffer, diff_record_sets};
pub use session::{
    SessionId, ViewCommand, ViewSessionState, ViewSessions, select_chart_mode_endpoint,
    sort_endpoint, start_session, view_events_endpoint,
};
pub use sorting::{ActiveSort, SortDirection, SortField, SortRequest, SortToggles, sort_records};
