//! HTML for the live parts of a page.
//!
//! The page skeleton renders each region empty, then every [ViewUpdate] is
//! rendered as a set of out-of-band swaps that htmx applies by element ID.

use maud::{Markup, PreEscaped, html};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    endpoints::{self, format_endpoint},
    event::EventLabel,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, HeadElement, TABLE_CELL_STYLE, TABLE_ROW_STYLE, format_currency,
    },
    record::{EVENT_SELECT_ID, TransactionRecord, category_options, event_options},
    view::{
        aggregation::CategoryTotals,
        chart::chart_options_element,
        controller::{ViewCapabilities, ViewUpdate},
        render_diff::Patch,
        sorting::ActiveSort,
    },
};

pub const CARDS_ID: &str = "cards";
/// The hidden element holding the display order of the cards.
pub const CARD_ORDER_ID: &str = "card-order";
pub const TABLE_BODY_ID: &str = "table-body";
pub const CATEGORY_TOTALS_ID: &str = "category-totals";
pub const TOTAL_ID: &str = "total";
pub const SORT_STATUS_ID: &str = "sort-status";

/// Descriptions longer than this many characters are cut short on cards.
const CARD_DESCRIPTION_LIMIT: usize = 80;

/// How a card is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CardStyle {
    Plain,
    Enter,
    Changed,
    Exit,
}

impl CardStyle {
    fn class(self) -> Option<&'static str> {
        match self {
            CardStyle::Plain => None,
            CardStyle::Enter => Some("card-enter"),
            CardStyle::Changed => Some("card-changed"),
            CardStyle::Exit => Some("card-exit"),
        }
    }
}

/// Render every changed region of `update` as out-of-band swaps.
pub fn render_update(
    update: &ViewUpdate,
    capabilities: ViewCapabilities,
    events: &[EventLabel],
) -> Markup {
    let editable = capabilities.has_form;

    html! {
        @for patch in &update.cards {
            (render_patch(patch, editable, events))
        }

        @if let Some(records) = &update.table {
            template {
                tbody id=(TABLE_BODY_ID) hx-swap-oob="true" {
                    (table_rows(records))
                }
            }
        }

        @if let Some((mode, series)) = &update.chart {
            (chart_options_element(*mode, series, true))
        }

        @if let Some(totals) = &update.category_totals {
            ul id=(CATEGORY_TOTALS_ID) hx-swap-oob="true" class="w-full space-y-1" {
                (category_total_items(totals))
            }
        }

        @if let Some(total) = update.total {
            span id=(TOTAL_ID) hx-swap-oob="true" { (format_currency(total)) }
        }

        @if let Some(sort) = update.sort {
            p id=(SORT_STATUS_ID) hx-swap-oob="true" class="text-sm text-gray-500" {
                (sort_status(sort))
            }
        }

        @if editable {
            @if let Some(events) = &update.events {
                select id=(EVENT_SELECT_ID) hx-swap-oob="innerHTML" {
                    (event_options(events, ""))
                }
            }
        }
    }
}

fn render_patch(patch: &Patch, editable: bool, events: &[EventLabel]) -> Markup {
    match patch {
        Patch::Reset { records } => html! {
            div id=(CARDS_ID) hx-swap-oob="innerHTML" {
                @for record in records {
                    (card(record, CardStyle::Plain, editable, events, false))
                }
            }
        },
        Patch::Reorder { ids } => {
            let order = ids
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");

            html! {
                div id=(CARD_ORDER_ID) hx-swap-oob="innerHTML" {
                    span data-order=(order) {}
                }
            }
        }
        Patch::Insert { record, animate } => {
            let style = if *animate {
                CardStyle::Enter
            } else {
                CardStyle::Plain
            };

            html! {
                div hx-swap-oob={ "afterbegin:#" (CARDS_ID) } {
                    (card(record, style, editable, events, false))
                }
            }
        }
        Patch::Replace {
            record,
            changed_cue,
        } => {
            let style = if *changed_cue {
                CardStyle::Changed
            } else {
                CardStyle::Plain
            };

            card(record, style, editable, events, true)
        }
        Patch::BeginExit { record } => card(record, CardStyle::Exit, editable, events, true),
        Patch::Remove { id } => html! {
            div id=(card_id(*id)) hx-swap-oob="delete" {}
        },
    }
}

fn card_id(id: i64) -> String {
    format!("card-{id}")
}

/// Moves the cards into the last order sent by the server.
///
/// Only the CSS order of each card changes, so cards that are mid-animation
/// keep animating.
pub fn card_order_script() -> HeadElement {
    let script = format!(
        r##"document.addEventListener('DOMContentLoaded', function() {{
            const applyOrder = () => {{
                const element = document.querySelector("#{CARD_ORDER_ID} [data-order]");
                if (!element) return;

                element.dataset.order.split(",").forEach((id, index) => {{
                    const card = document.getElementById("card-" + id);
                    if (card) card.style.order = index + 1;
                }});
            }};

            document.body.addEventListener('htmx:sseMessage', applyOrder);
        }});"##
    );

    HeadElement::ScriptSource(PreEscaped(script))
}

/// Shorten `text` to `limit` characters, counting grapheme clusters.
fn truncate(text: &str, limit: usize) -> String {
    let mut graphemes = text.graphemes(true);
    let head: String = graphemes.by_ref().take(limit).collect();

    if graphemes.next().is_some() {
        format!("{}…", head.trim_end())
    } else {
        head
    }
}

fn amount_class(amount: f64) -> &'static str {
    if amount < 0.0 {
        "font-semibold text-red-600 dark:text-red-400"
    } else {
        "font-semibold text-green-600 dark:text-green-400"
    }
}

/// A record card, which replaces the card with the same ID when `out_of_band` is set.
fn card(
    record: &TransactionRecord,
    style: CardStyle,
    editable: bool,
    events: &[EventLabel],
    out_of_band: bool,
) -> Markup {
    let class = match style.class() {
        Some(animation) => format!("{CARD_STYLE} {animation}"),
        None => CARD_STYLE.to_owned(),
    };
    let show_controls = editable && style != CardStyle::Exit;

    html! {
        article
            id=(card_id(record.id))
            class=(class)
            data-record-id=(record.id)
            hx-swap-oob=[out_of_band.then_some("true")]
        {
            div class="flex justify-between gap-4"
            {
                div
                {
                    h3 class="font-semibold" { (record.event) }
                    p class="text-sm text-gray-500" { (record.date) " · " (record.category) }
                }

                span class=(amount_class(record.amount)) { (format_currency(record.amount)) }
            }

            @if !record.description.is_empty() {
                p class="mt-2 text-sm" title=(record.description) {
                    (truncate(&record.description, CARD_DESCRIPTION_LIMIT))
                }
            }

            @if show_controls {
                (card_controls(record, events))
            }
        }
    }
}

fn card_controls(record: &TransactionRecord, events: &[EventLabel]) -> Markup {
    let endpoint = format_endpoint(endpoints::TRANSACTION, record.id);
    let field_id = |name: &str| format!("{name}-{}", record.id);

    html! {
        div class="flex gap-4 mt-2 text-sm"
        {
            button
                type="button"
                class=(BUTTON_DELETE_STYLE)
                hx-delete=(endpoint)
                hx-confirm="Delete this transaction?"
                hx-swap="none"
                hx-target-error="#alert-container"
            {
                "Delete"
            }
        }

        details class="mt-2 text-sm"
        {
            summary class="cursor-pointer text-emerald-700 dark:text-emerald-400" { "Edit" }

            form
                hx-put=(endpoint)
                hx-target="#alert-container"
                hx-target-error="#alert-container"
                class="mt-2 space-y-2"
            {
                label for=(field_id("event")) class=(FORM_LABEL_STYLE) { "Event" }
                select name="event" id=(field_id("event")) class=(FORM_TEXT_INPUT_STYLE) {
                    (event_options(events, &record.event))
                }

                label for=(field_id("date")) class=(FORM_LABEL_STYLE) { "Date" }
                input
                    name="date"
                    id=(field_id("date"))
                    type="text"
                    value=(record.date)
                    class=(FORM_TEXT_INPUT_STYLE);

                label for=(field_id("amount")) class=(FORM_LABEL_STYLE) { "Amount" }
                input
                    name="amount"
                    id=(field_id("amount"))
                    type="number"
                    step="0.01"
                    value=(record.amount)
                    class=(FORM_TEXT_INPUT_STYLE);

                label for=(field_id("category")) class=(FORM_LABEL_STYLE) { "Category" }
                select name="category" id=(field_id("category")) class=(FORM_TEXT_INPUT_STYLE) {
                    (category_options(record.category.as_str()))
                }

                label for=(field_id("description")) class=(FORM_LABEL_STYLE) { "Description" }
                input
                    name="description"
                    id=(field_id("description"))
                    type="text"
                    value=(record.description)
                    class=(FORM_TEXT_INPUT_STYLE);

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save" }
            }
        }
    }
}

/// The rows of the records table, in the order given.
pub fn table_rows(records: &[TransactionRecord]) -> Markup {
    html! {
        @for record in records {
            tr class=(TABLE_ROW_STYLE) data-record-id=(record.id)
            {
                td class=(TABLE_CELL_STYLE) { (record.date) }
                td class=(TABLE_CELL_STYLE) { (record.event) }
                td class=(TABLE_CELL_STYLE) { (record.category) }
                td class={ (TABLE_CELL_STYLE) " text-right " (amount_class(record.amount)) } {
                    (format_currency(record.amount))
                }
                td class=(TABLE_CELL_STYLE) { (record.description) }
            }
        }
    }
}

pub fn category_total_items(totals: &CategoryTotals) -> Markup {
    html! {
        @for (category, total) in totals.iter() {
            li class="flex justify-between gap-4" data-category=(category)
            {
                span { (category) }
                span class=(amount_class(total)) { (format_currency(total)) }
            }
        }
    }
}

pub fn sort_status(sort: ActiveSort) -> String {
    format!("Sorted by {} ({})", sort.field.label(), sort.direction.as_str())
}
