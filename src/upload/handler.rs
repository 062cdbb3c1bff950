use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use axum::{
    extract::{FromRef, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    upload::{
        batch::parse_csv,
        projection::project_columns,
        view::{FileOutcome, FileResult, upload_results_view},
        writer::append_batch,
    },
};

/// The state needed for uploading transactions.
#[derive(Debug, Clone)]
pub struct UploadState {
    /// The database connection holding the transactions table.
    pub db_connection: Arc<Mutex<Connection>>,
    /// How many rows of each file to show in its preview.
    pub preview_row_count: usize,
}

impl FromRef<AppState> for UploadState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            preview_row_count: state.preview_row_count,
        }
    }
}

/// Route handler for uploading CSV files of transactions.
///
/// Every file is parsed, trimmed to the transaction columns and appended to
/// the transactions table on its own. A file that cannot be read or saved
/// gets an error message and the remaining files are still processed.
///
/// If the multipart body itself is malformed, the files read so far are
/// still listed, followed by an error, and the status is 400.
pub async fn upload_files(State(state): State<UploadState>, mut multipart: Multipart) -> Response {
    let mut results = Vec::new();
    let mut request_error = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(error) => {
                tracing::error!("Could not read multipart form field: {error}");
                request_error = Some(Error::MultipartError(error.body_text()));
                break;
            }
        };

        let file_name = field.file_name().unwrap_or("unnamed file").to_owned();

        if !is_csv(field.content_type(), field.file_name()) {
            tracing::warn!("Rejected upload '{file_name}': not a CSV file");
            results.push(FileResult {
                file_name,
                outcome: FileOutcome::Rejected(Error::NotCSV),
            });
            continue;
        }

        let data = match field.bytes().await {
            Ok(data) => data,
            Err(error) => {
                tracing::error!("Could not read data from multipart form field: {error}");
                request_error = Some(Error::MultipartError(error.body_text()));
                break;
            }
        };

        tracing::debug!("Received file '{file_name}' that is {} bytes", data.len());

        let outcome = match std::str::from_utf8(&data) {
            Ok(text) => ingest_file(&file_name, text, &state),
            Err(_) => {
                tracing::warn!("Rejected upload '{file_name}': not valid UTF-8");
                FileOutcome::Rejected(Error::InvalidCSV(
                    "the file is not valid UTF-8 text".to_owned(),
                ))
            }
        };

        results.push(FileResult { file_name, outcome });
    }

    let status_code = if request_error.is_some() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };

    (status_code, upload_results_view(&results, request_error)).into_response()
}

/// Whether an uploaded file looks like a CSV file, either by its content type
/// or by its file extension.
fn is_csv(content_type: Option<&str>, file_name: Option<&str>) -> bool {
    let has_csv_content_type = content_type
        .and_then(|content_type| content_type.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("text/csv"));

    let has_csv_extension = file_name.is_some_and(|name| {
        name.rsplit_once('.')
            .is_some_and(|(_, extension)| extension.eq_ignore_ascii_case("csv"))
    });

    has_csv_content_type || has_csv_extension
}

/// Parse, project and save a single file.
fn ingest_file(file_name: &str, text: &str, state: &UploadState) -> FileOutcome {
    let start_time = Instant::now();

    let batch = match parse_csv(file_name, text) {
        Ok(batch) => batch,
        Err(error) => {
            tracing::warn!("Could not parse '{file_name}': {error}");
            return FileOutcome::Rejected(error);
        }
    };

    let projected = match project_columns(batch) {
        Ok(projected) => projected,
        Err(Error::EmptyProjection) => {
            tracing::warn!("No relevant columns found in '{file_name}', skipping");
            return FileOutcome::NoRelevantColumns;
        }
        Err(error) => return FileOutcome::Rejected(error),
    };

    let preview = projected.head(state.preview_row_count);

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return FileOutcome::SaveFailed {
                preview,
                error: Error::DatabaseLockError,
            };
        }
    };

    match append_batch(&projected, &connection) {
        Ok(row_count) => {
            let duration = start_time.elapsed();
            tracing::info!(
                "Saved {row_count} rows from '{file_name}' in {}ms",
                duration.as_millis()
            );
            FileOutcome::Saved {
                preview,
                row_count,
                duration,
            }
        }
        Err(error) => {
            tracing::error!("Error saving '{file_name}': {error}");
            FileOutcome::SaveFailed { preview, error }
        }
    }
}
