use scraper::{Html, Selector};

/// The text content of an alert rendered in an HTML fragment.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AlertText {
    pub level: String,
    pub message: String,
    pub details: String,
}

/// Get every alert in `html` in document order.
pub(crate) fn get_alerts(html: &Html) -> Vec<AlertText> {
    let alert_selector = Selector::parse("div[role=alert]").unwrap();
    let message_selector = Selector::parse("p.text-sm.font-medium").unwrap();
    let details_selector = Selector::parse("p.mt-1.text-sm.opacity-80").unwrap();

    html.select(&alert_selector)
        .map(|alert| {
            let text_of = |selector: &Selector| {
                alert
                    .select(selector)
                    .next()
                    .map(|element| element.text().collect::<String>().trim().to_owned())
                    .unwrap_or_default()
            };

            AlertText {
                level: alert.value().attr("data-level").unwrap_or_default().to_owned(),
                message: text_of(&message_selector),
                details: text_of(&details_selector),
            }
        })
        .collect()
}
