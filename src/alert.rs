//! Alert system for displaying success and error messages to users.
//!
//! Alerts are swapped into the `#alert-container` element that every page
//! renders at the bottom of the body.

use maud::{Markup, html};

/// Alert message types for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertType {
    Success,
    Error,
}

/// An alert message with optional details.
#[derive(Debug, Clone)]
pub struct Alert<'a> {
    pub alert_type: AlertType,
    pub message: &'a str,
    pub details: &'a str,
}

impl<'a> Alert<'a> {
    /// Create a new success alert
    pub fn success(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Success,
            message,
            details,
        }
    }

    /// Create a new error alert
    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Error,
            message,
            details,
        }
    }

    pub fn into_html(self) -> Markup {
        let style = match self.alert_type {
            AlertType::Success => {
                "p-4 mb-4 text-sm text-green-800 rounded-lg bg-green-50 \
                dark:bg-gray-800 dark:text-green-400"
            }
            AlertType::Error => {
                "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
                dark:bg-gray-800 dark:text-red-400"
            }
        };

        html!(
            div
                class=(style)
                role="alert"
                data-alert-type=(match self.alert_type {
                    AlertType::Success => "success",
                    AlertType::Error => "error",
                })
            {
                span class="font-medium" { (self.message) }

                @if !self.details.is_empty() {
                    " " (self.details)
                }

                button
                    type="button"
                    class="ms-2 font-semibold underline"
                    onclick="this.parentElement.remove()"
                {
                    "Dismiss"
                }
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn error_alert_contains_message_and_details() {
        let markup = Alert::error("Could not save", "Try again later.").into_html();
        let html = Html::parse_fragment(&markup.into_string());

        let alert = html
            .select(&Selector::parse("div[role=alert]").unwrap())
            .next()
            .expect("No alert found");
        let text = alert.text().collect::<String>();

        assert_eq!(alert.value().attr("data-alert-type"), Some("error"));
        assert!(text.contains("Could not save"));
        assert!(text.contains("Try again later."));
    }

    #[test]
    fn success_alert_without_details() {
        let markup = Alert::success("Saved", "").into_html();
        let html = Html::parse_fragment(&markup.into_string());

        let alert = html
            .select(&Selector::parse("div[role=alert]").unwrap())
            .next()
            .expect("No alert found");

        assert_eq!(alert.value().attr("data-alert-type"), Some("success"));
    }
}
