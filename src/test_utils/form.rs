use scraper::{ElementRef, Html, Selector};

#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    must_get_element(html, "form")
}

#[track_caller]
pub(crate) fn must_get_element<'a>(html: &'a Html, selector: &str) -> ElementRef<'a> {
    html.select(&Selector::parse(selector).unwrap())
        .next()
        .unwrap_or_else(|| panic!("No element found matching {selector:?}"))
}

#[track_caller]
pub(crate) fn assert_hx_endpoint(element: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    let hx_attribute = element
        .value()
        .attr(attribute)
        .unwrap_or_else(|| panic!("{attribute} attribute missing"));

    assert_eq!(
        hx_attribute, endpoint,
        "want element with attribute {attribute}=\"{endpoint}\", got {hx_attribute:?}"
    );
}
