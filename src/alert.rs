//! Alert system for displaying success, warning and error messages to users.

use maud::{Markup, html};

const ALERT_BASE_STYLE: &str = "p-4 mb-4 rounded-lg border";
const ALERT_SUCCESS_STYLE: &str = "text-green-800 bg-green-50 border-green-300 \
    dark:bg-gray-800 dark:text-green-400 dark:border-green-800";
const ALERT_WARNING_STYLE: &str = "text-yellow-800 bg-yellow-50 border-yellow-300 \
    dark:bg-gray-800 dark:text-yellow-300 dark:border-yellow-800";
const ALERT_ERROR_STYLE: &str = "text-red-800 bg-red-50 border-red-300 \
    dark:bg-gray-800 dark:text-red-400 dark:border-red-800";

/// A message shown to the user after an action completes.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    Success { message: String, details: String },
    Warning { message: String, details: String },
    Error { message: String, details: String },
    ErrorSimple { message: String },
}

impl Alert {
    /// The alert level as used in the `data-level` attribute.
    pub fn level(&self) -> &'static str {
        match self {
            Alert::Success { .. } => "success",
            Alert::Warning { .. } => "warning",
            Alert::Error { .. } | Alert::ErrorSimple { .. } => "error",
        }
    }

    pub fn into_html(self) -> Markup {
        let level = self.level();
        let (style, message, details) = match self {
            Alert::Success { message, details } => (ALERT_SUCCESS_STYLE, message, details),
            Alert::Warning { message, details } => (ALERT_WARNING_STYLE, message, details),
            Alert::Error { message, details } => (ALERT_ERROR_STYLE, message, details),
            Alert::ErrorSimple { message } => (ALERT_ERROR_STYLE, message, String::new()),
        };

        html! {
            div
                role="alert"
                data-level=(level)
                class={(ALERT_BASE_STYLE) " " (style)}
            {
                p class="text-sm font-medium" { (message) }

                @if !details.is_empty() {
                    p class="mt-1 text-sm opacity-80" { (details) }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::Alert;

    fn render(alert: Alert) -> Html {
        Html::parse_fragment(&alert.into_html().into_string())
    }

    #[test]
    fn renders_message_and_details() {
        let html = render(Alert::Success {
            message: "Saved!".to_owned(),
            details: "3 rows".to_owned(),
        });

        let message = html
            .select(&Selector::parse("p.text-sm.font-medium").unwrap())
            .next()
            .expect("No alert message found");
        let details = html
            .select(&Selector::parse("p.mt-1.text-sm.opacity-80").unwrap())
            .next()
            .expect("No alert details found");

        assert_eq!(message.text().collect::<String>(), "Saved!");
        assert_eq!(details.text().collect::<String>(), "3 rows");
    }

    #[test]
    fn omits_empty_details() {
        let html = render(Alert::ErrorSimple {
            message: "Nope".to_owned(),
        });

        let details = html
            .select(&Selector::parse("p.mt-1").unwrap())
            .next();

        assert!(details.is_none());
    }

    #[test]
    fn level_attribute_matches_variant() {
        let html = render(Alert::Warning {
            message: "Careful".to_owned(),
            details: String::new(),
        });

        let alert = html
            .select(&Selector::parse("div[role=alert]").unwrap())
            .next()
            .expect("No alert found");

        assert_eq!(alert.value().attr("data-level"), Some("warning"));
    }
}
