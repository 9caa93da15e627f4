//! The manage, read-only and chart pages.
//!
//! Each page is rendered with its live regions empty and connects to its own
//! view session, whose first patch fills them in.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, base, dollar_input_styles,
    },
    navigation::NavBar,
    record::{TransactionForm, transaction_form_view},
    view::{
        aggregation::{ChartMode, ChartSeries},
        chart::{chart_script, chart_view},
        controller::{ViewCapabilities, ViewVariant},
        render::{
            CARD_ORDER_ID, CARDS_ID, CATEGORY_TOTALS_ID, SORT_STATUS_ID, TABLE_BODY_ID, TOTAL_ID,
            card_order_script,
        },
        session::{PATCH_EVENT, SessionId, ViewSessionState},
        sorting::{SortDirection, SortField},
    },
};

const ECHARTS_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// The page for adding, editing and deleting transactions.
pub async fn get_manage_page(State(state): State<ViewSessionState>) -> Response {
    live_page(&state, ViewVariant::Manage)
}

/// A read-only page with static cards and a sortable table of every transaction.
pub async fn get_read_only_page(State(state): State<ViewSessionState>) -> Response {
    live_page(&state, ViewVariant::ReadOnly)
}

/// A page with only the chart and the totals.
pub async fn get_chart_page(State(state): State<ViewSessionState>) -> Response {
    live_page(&state, ViewVariant::ChartOnly)
}

fn live_page(state: &ViewSessionState, variant: ViewVariant) -> Response {
    let capabilities = variant.capabilities();
    let session_id = state.sessions.allocate();

    let form = if capabilities.has_form {
        match state.store.events() {
            Ok(events) => Some(transaction_form_view(
                &events,
                &TransactionForm::default(),
                None,
            )),
            Err(error) => {
                tracing::error!("Could not get events for the manage page: {error}");
                return error.into_response();
            }
        }
    } else {
        None
    };

    let (title, endpoint) = match variant {
        ViewVariant::Manage => ("Manage", endpoints::MANAGE_VIEW),
        ViewVariant::ReadOnly => ("Transactions", endpoints::READ_ONLY_VIEW),
        ViewVariant::ChartOnly => ("Chart", endpoints::CHART_VIEW),
    };
    let events_url = format!(
        "{}?variant={variant}",
        format_endpoint(endpoints::VIEW_EVENTS, session_id)
    );
    let sort_url = format_endpoint(endpoints::VIEW_SORT, session_id);

    let content = html! {
        (NavBar::new(endpoint).into_html())

        main
            class=(PAGE_CONTAINER_STYLE)
            hx-ext="sse"
            sse-connect=(events_url)
            data-session-id=(session_id)
        {
            // Patches only contain out-of-band swaps.
            div class="hidden" sse-swap=(PATCH_EVENT) hx-swap="none" {}

            div class="w-full max-w-5xl space-y-6"
            {
                (summary_view(capabilities))

                @if let Some(form) = form {
                    section class="max-w-md" { (form) }
                }

                (chart_section(session_id))

                @if capabilities.has_sort {
                    (sort_controls(capabilities, &sort_url))
                }

                @if capabilities.has_cards {
                    section
                    {
                        h2 class="text-xl font-bold mb-2" { "Transactions" }
                        div id=(CARDS_ID) class="grid grid-cols-1 md:grid-cols-2 gap-4" {}
                        div id=(CARD_ORDER_ID) class="hidden" {}
                    }
                }

                @if capabilities.has_table {
                    (table_view(capabilities, &sort_url))
                }
            }
        }
    };

    let mut head_elements = vec![
        HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
        chart_script(),
        dollar_input_styles(),
    ];
    if capabilities.has_cards {
        head_elements.push(card_order_script());
    }

    base(title, &head_elements, &content).into_response()
}

fn summary_view(capabilities: ViewCapabilities) -> Markup {
    html! {
        section class="flex flex-col gap-4 md:flex-row md:items-start md:justify-between"
        {
            div
            {
                h2 class="text-xl font-bold" { "Total" }

                @if capabilities.has_form {
                    button
                        type="button"
                        title="Right-click to adjust the deposit"
                        class="text-3xl font-bold"
                        hx-post=(endpoints::DEPOSITS_API)
                        hx-prompt="Amount to add to the deposit"
                        hx-trigger="contextmenu"
                        oncontextmenu="event.preventDefault()"
                        hx-target="#alert-container"
                        hx-target-error="#alert-container"
                    {
                        span id=(TOTAL_ID) { "$0.00" }
                    }
                } @else {
                    p class="text-3xl font-bold" { span id=(TOTAL_ID) { "$0.00" } }
                }

                @if capabilities.has_form {
                    div class="flex gap-2 mt-2"
                    {
                        button
                            type="button"
                            class=(BUTTON_SECONDARY_STYLE)
                            hx-post=(endpoints::DEPOSITS_API)
                            hx-prompt="Amount to add to the deposit"
                            hx-target="#alert-container"
                            hx-target-error="#alert-container"
                        {
                            "Adjust deposit"
                        }

                        button
                            type="button"
                            class=(BUTTON_SECONDARY_STYLE)
                            hx-delete=(endpoints::TRANSACTIONS_API)
                            hx-confirm="Delete every transaction and reset the deposit?"
                            hx-target="#alert-container"
                            hx-target-error="#alert-container"
                        {
                            "Clear all"
                        }
                    }
                }
            }

            div class="md:w-72"
            {
                h2 class="text-xl font-bold mb-2" { "By category" }
                ul id=(CATEGORY_TOTALS_ID) class="w-full space-y-1" {}
            }
        }
    }
}

fn chart_section(session_id: SessionId) -> Markup {
    let default_mode = ChartMode::default();

    html! {
        section class="w-full space-y-2"
        {
            label for="chart-mode" class=(FORM_LABEL_STYLE) { "Chart" }

            select
                id="chart-mode"
                name="mode"
                class=(FORM_TEXT_INPUT_STYLE)
                hx-post=(format_endpoint(endpoints::VIEW_CHART_MODE, session_id))
                hx-trigger="change"
                hx-swap="none"
                hx-target-error="#alert-container"
            {
                @for mode in ChartMode::ALL {
                    option value=(mode.as_str()) selected[mode == default_mode] { (mode.label()) }
                }
            }

            (chart_view(default_mode, &ChartSeries::default()))
        }
    }
}

fn sort_controls(capabilities: ViewCapabilities, sort_url: &str) -> Markup {
    html! {
        section class="flex flex-wrap items-end gap-4"
        {
            // Views without the form pick the direction explicitly.
            @if !capabilities.has_form {
                form
                    hx-post=(sort_url)
                    hx-trigger="change"
                    hx-swap="none"
                    hx-target-error="#alert-container"
                    class="flex gap-2"
                {
                    select name="field" aria-label="Sort by" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for field in SortField::ALL {
                            option value=(field.as_str()) { (field.label()) }
                        }
                    }

                    select name="direction" aria-label="Direction" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for direction in [SortDirection::Ascending, SortDirection::Descending] {
                            option value=(direction.as_str()) { (direction.as_str()) }
                        }
                    }
                }
            }

            p id=(SORT_STATUS_ID) class="text-sm text-gray-500" { "Newest first" }
        }
    }
}

fn sort_button(field: SortField, sort_url: &str) -> Markup {
    html! {
        button
            type="button"
            name="field"
            value=(field.as_str())
            class="uppercase underline"
            hx-post=(sort_url)
            hx-swap="none"
            hx-target-error="#alert-container"
        {
            (field.label())
        }
    }
}

fn table_view(capabilities: ViewCapabilities, sort_url: &str) -> Markup {
    let header = |field: SortField| {
        if capabilities.has_sort {
            sort_button(field, sort_url)
        } else {
            html!((field.label()))
        }
    };

    html! {
        section class="relative overflow-x-auto shadow-md rounded"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { (header(SortField::Date)) }
                        th scope="col" class=(TABLE_CELL_STYLE) { (header(SortField::Event)) }
                        th scope="col" class=(TABLE_CELL_STYLE) { (header(SortField::Category)) }
                        th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } {
                            (header(SortField::Amount))
                        }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                    }
                }

                tbody id=(TABLE_BODY_ID) {}
            }
        }
    }
}
