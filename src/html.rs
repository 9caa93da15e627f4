//! Shared page layout, styles and formatting helpers.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

// Buttons
pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 rounded text-white \
    bg-emerald-600 hover:enabled:bg-emerald-700 disabled:bg-emerald-800 \
    dark:bg-emerald-500 hover:enabled:dark:bg-emerald-600";

pub const BUTTON_SECONDARY_STYLE: &str = "px-4 py-2 text-sm font-medium rounded \
    border border-gray-300 bg-white text-gray-900 hover:bg-gray-100 \
    dark:border-gray-600 dark:bg-gray-800 dark:text-gray-200 dark:hover:bg-gray-700";

pub const BUTTON_DELETE_STYLE: &str = "text-sm text-red-600 underline \
    hover:text-red-500 dark:text-red-400 cursor-pointer";

// Forms
pub const FORM_LABEL_STYLE: &str = "block mb-1 text-sm font-medium";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2 rounded text-sm \
    border border-gray-300 bg-gray-50 text-gray-900 \
    focus:border-emerald-600 focus:ring-emerald-600 \
    dark:border-gray-600 dark:bg-gray-700 dark:text-white";

// Tables
pub const TABLE_HEADER_STYLE: &str = "text-xs uppercase text-gray-700 \
    bg-gray-100 dark:bg-gray-700 dark:text-gray-300";
pub const TABLE_ROW_STYLE: &str = "border-b bg-white dark:border-gray-700 dark:bg-gray-800";
pub const TABLE_CELL_STYLE: &str = "px-4 py-3";

pub const CARD_STYLE: &str = "p-4 rounded-lg shadow bg-white \
    dark:bg-gray-800 dark:border dark:border-gray-700";

pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-4 py-6 mx-auto text-gray-900 dark:text-white";

/// An extra element for the page's `head`.
pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
    /// JavaScript source code.
    ScriptSource(PreEscaped<String>),
    Style(PreEscaped<String>),
}

/// The loading indicator and the card transitions.
///
/// The exit transition should not outlast the server's exit delay, after
/// which the card is deleted from the page.
const PAGE_STYLES: &str = r#"
    #indicator.htmx-indicator {
        display: none;
    }

    #indicator.htmx-request .htmx-indicator {
        display: inline;
    }

    #indicator.htmx-request.htmx-indicator {
        display: inline;
    }

    @keyframes card-enter {
        from { opacity: 0; transform: translateY(-0.5rem); }
        to { opacity: 1; transform: none; }
    }

    @keyframes card-changed {
        0% { box-shadow: 0 0 0 0 rgba(59, 130, 246, 0.8); }
        100% { box-shadow: 0 0 0 0.75rem rgba(59, 130, 246, 0); }
    }

    @keyframes card-exit {
        from { opacity: 1; transform: none; }
        to { opacity: 0; transform: translateX(1rem); }
    }

    .card-enter { animation: card-enter 300ms ease-out; }
    .card-changed { animation: card-changed 600ms ease-out; }
    .card-exit { animation: card-exit 300ms ease-in forwards; pointer-events: none; }

    .echarts-tooltip {
        z-index: 30 !important;
    }
"#;

pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Budget Board" }

                script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                script src="https://cdn.jsdelivr.net/npm/htmx.org@2.0.8/dist/htmx.min.js" {}
                script src="https://cdn.jsdelivr.net/npm/htmx-ext-response-targets@2.0.4" {}
                script src="https://cdn.jsdelivr.net/npm/htmx-ext-sse@2.2.3" {}

                style { (PreEscaped(PAGE_STYLES)) }

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptSource(text) => script { (text) }
                        HeadElement::ScriptLink(path) => script src=(path) {}
                        HeadElement::Style(text) => style { (text) }
                    }
                }
            }

            body
                hx-ext="response-targets"
                class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900 pb-[calc(5rem+env(safe-area-inset-bottom))] lg:pb-0"
            {
                (content)

                // Alert container for alert fragments and out-of-band swaps
                div
                    id="alert-container"
                    class="w-full max-w-md px-4"
                    style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                {}
            }
        }
    }
}

/// A full page explaining that a request could not be served.
pub fn error_view(title: &str, status: &str, description: &str, fix: &str) -> Markup {
    let content = html!(
        section class="mx-auto max-w-screen-sm px-4 py-16 text-center text-gray-900 dark:text-white"
        {
            h1 class="mb-4 text-7xl font-extrabold text-emerald-600 dark:text-emerald-500"
            {
                (status)
            }
            p class="mb-2 text-3xl font-bold" { (description) }
            p class="mb-6 text-xl" { (fix) }
            a
                href="/"
                class="inline-flex rounded px-5 py-2.5 text-sm font-medium text-white
                    bg-emerald-600 hover:bg-emerald-700"
            {
                "Back to the board"
            }
        }
    );

    base(title, &[], &content)
}

/// Shown inside a submit button while its request is in flight.
pub fn loading_spinner() -> Markup {
    html! {
        span
            aria-hidden="true"
            role="status"
            class="inline-block w-4 h-4 me-2 align-middle rounded-full
                border-2 border-white/40 border-t-white animate-spin"
        {}
    }
}

/// Returns the CSS styles for adding a dollar sign prefix to number inputs.
pub fn dollar_input_styles() -> HeadElement {
    HeadElement::Style(PreEscaped(
        r#"
        .input-wrapper {
            position: relative;
            display: inline-block;
        }
        .input-wrapper input[type="number"] {
            padding-left: 1.4rem;
        }
        .input-wrapper::before {
            content: '$';
            position: absolute;
            left: 0.6rem;
            top: 50%;
            transform: translateY(-50%);
            pointer-events: none;
        }
        "#
        .to_owned(),
    ))
}

/// Format `number` as dollars and cents, e.g. "$1,234.50" or "-$12.00".
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();
    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let (formatter, prefix) = if number < 0.0 {
        (NEGATIVE_FMT.get_or_init(|| currency_formatter("-$")), "-$")
    } else {
        (POSITIVE_FMT.get_or_init(|| currency_formatter("$")), "$")
    };

    if number == 0.0 {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        return "$0.00".to_owned();
    }

    let Some(formatter) = formatter else {
        return format!("{prefix}{:.2}", number.abs());
    };

    let mut formatted_string = formatter.fmt_string(number.abs());

    // numfmt omits trailing zeros, e.g. "12.30" is rendered as "12.3".
    match formatted_string.split_once('.') {
        Some((_, cents)) => {
            for _ in cents.len()..2 {
                formatted_string.push('0');
            }
        }
        None => formatted_string.push_str(".00"),
    }

    formatted_string
}

fn currency_formatter(prefix: &str) -> Option<Formatter> {
    match Formatter::currency(prefix) {
        Ok(formatter) => Some(formatter.precision(Precision::Decimals(2))),
        Err(error) => {
            tracing::error!("Could not create the currency formatter for {prefix:?}: {error}");
            None
        }
    }
}
