//! The home page with the upload form and the monthly summary button.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, ECHARTS_SCRIPT, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, HeadElement, PAGE_CONTAINER_STYLE, base, loading_spinner,
    },
};

fn upload_form_view() -> Markup {
    let upload_route = endpoints::UPLOAD;
    let spinner = loading_spinner();

    html! {
        form
            hx-post=(upload_route)
            enctype="multipart/form-data"
            hx-disabled-elt="#files, #submit-button"
            hx-indicator="#upload-indicator"
            hx-target="#upload-results"
            hx-target-error="#upload-results"
            hx-swap="innerHTML"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="files" class=(FORM_LABEL_STYLE)
                {
                    "Choose CSV file(s) to upload"
                }

                input
                    id="files"
                    type="file"
                    name="files"
                    accept=".csv,text/csv"
                    multiple
                    required
                    class=(FORM_TEXT_INPUT_STYLE);

                p class="mt-2 text-sm"
                {
                    "Only the date, amount, merchant and category columns are saved."
                }
            }

            button
                type="submit"
                id="submit-button"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="upload-indicator" { (spinner) }
                " Upload"
            }
        }
    }
}

fn summary_button_view() -> Markup {
    let summary_route = endpoints::MONTHLY_SUMMARY;

    html! {
        button
            type="button"
            id="summary-button"
            hx-get=(summary_route)
            hx-target="#summary"
            hx-target-error="#summary"
            hx-swap="innerHTML"
            hx-indicator="#summary-indicator"
            class=(BUTTON_SECONDARY_STYLE)
        {
            span class="inline htmx-indicator" id="summary-indicator" { (loading_spinner()) }
            " Show Monthly Summary"
        }
    }
}

fn home_view() -> Markup {
    let content = html! {
        div class={(PAGE_CONTAINER_STYLE) " max-w-screen-lg"}
        {
            h1 class="text-2xl font-bold mb-6" { "Financial CSV Tracker" }

            section id="upload" class="w-full mb-8"
            {
                (upload_form_view())

                div id="upload-results" class="w-full mt-6" {}
            }

            section class="w-full"
            {
                (summary_button_view())

                div id="summary" class="w-full mt-4" {}
            }
        }
    };

    let scripts = [HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned())];

    base("Financial CSV Tracker", &scripts, &content)
}

/// Route handler for the home page.
pub async fn get_home_page() -> Response {
    home_view().into_response()
}
