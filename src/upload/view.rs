//! HTML for the results of an upload.

use std::time::Duration;

use maud::{Markup, html};

use crate::{
    Error,
    alert::Alert,
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_count},
    upload::projection::ProjectedBatch,
};

/// What happened to a single uploaded file.
#[derive(Debug)]
pub enum FileOutcome {
    /// The file was appended to the transactions table.
    Saved {
        preview: ProjectedBatch,
        row_count: usize,
        duration: Duration,
    },
    /// The file did not have any transaction columns and was skipped.
    NoRelevantColumns,
    /// The file could not be read as a CSV.
    Rejected(Error),
    /// The file was read but could not be saved.
    SaveFailed {
        preview: ProjectedBatch,
        error: Error,
    },
}

/// The outcome of an uploaded file along with its name.
#[derive(Debug)]
pub struct FileResult {
    pub file_name: String,
    pub outcome: FileOutcome,
}

impl FileResult {
    fn alert(&self) -> Alert {
        let file_name = &self.file_name;

        match &self.outcome {
            FileOutcome::Saved {
                row_count,
                duration,
                ..
            } => Alert::Success {
                message: format!("{file_name} saved to database!"),
                details: format!(
                    "Saved {} rows in {}ms.",
                    format_count(*row_count),
                    duration.as_millis()
                ),
            },
            FileOutcome::NoRelevantColumns => Alert::Warning {
                message: format!("No relevant columns found in {file_name}"),
                details: "Files need at least one of the columns date, amount, merchant or \
                    category."
                    .to_owned(),
            },
            FileOutcome::Rejected(error) => Alert::Error {
                message: format!("Could not read {file_name}"),
                details: error.to_string(),
            },
            FileOutcome::SaveFailed { error, .. } => Alert::ErrorSimple {
                message: format!("Error saving {file_name}: {error}"),
            },
        }
    }

    fn preview(&self) -> Option<&ProjectedBatch> {
        match &self.outcome {
            FileOutcome::Saved { preview, .. } | FileOutcome::SaveFailed { preview, .. } => {
                Some(preview)
            }
            FileOutcome::NoRelevantColumns | FileOutcome::Rejected(_) => None,
        }
    }
}

/// Renders a table with the columns and rows of `batch`.
fn preview_table(batch: &ProjectedBatch) -> Markup {
    html! {
        div class="overflow-x-auto rounded-lg shadow mb-4"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        @for column in batch.columns() {
                            th scope="col" class=(TABLE_CELL_STYLE) { (column.name()) }
                        }
                    }
                }

                tbody
                {
                    @for row in batch.rows() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            @for cell in row {
                                td class=(TABLE_CELL_STYLE) { (cell.as_deref().unwrap_or_default()) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn file_result_view(result: &FileResult) -> Markup {
    let alert = result.alert().into_html();

    html! {
        section class="w-full mb-6" data-file-name=(result.file_name)
        {
            @if let Some(preview) = result.preview() {
                h3 class="text-lg font-semibold mb-2" { "Preview of " (result.file_name) }

                (preview_table(preview))
            }

            (alert)
        }
    }
}

/// Renders one result section per uploaded file, in upload order.
///
/// `request_error` is shown after the files if the upload could not be read
/// to the end.
pub fn upload_results_view(results: &[FileResult], request_error: Option<Error>) -> Markup {
    html! {
        div id="upload-result-list" class="w-full"
        {
            @for result in results {
                (file_result_view(result))
            }

            @if let Some(error) = request_error {
                (error.into_alert().into_html())
            }
        }
    }
}
