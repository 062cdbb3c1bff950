//! CSV Tracker is a small web app for collecting credit card statements and
//! summarising spending by month.
//!
//! Uploaded CSV files are trimmed down to the columns the app knows about
//! (`date`, `amount`, `merchant` and `category`) and appended to a SQLite
//! table called `transactions`. The monthly summary groups that table by
//! calendar month and renders the totals as a bar chart.
//!
//! This library provides the HTTP routes, which directly serve HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod db;
mod endpoints;
mod home_page;
mod html;
mod internal_server_error;
mod logging;
mod not_found;
mod routing;
mod summary;
mod upload;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::{DatabaseLocation, DatabaseUrlError, open_connection, parse_database_url};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

use crate::alert::Alert;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The multipart form could not be parsed as a list of files.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// An uploaded file was not a CSV file.
    #[error("File type must be CSV")]
    NotCSV,

    /// The CSV had issues that prevented it from being parsed.
    #[error("Could not parse the CSV file: {0}")]
    InvalidCSV(String),

    /// None of the transaction columns (`date`, `amount`, `merchant`,
    /// `category`) were found in an uploaded file.
    ///
    /// Files with no relevant columns are skipped rather than saved.
    #[error("no relevant columns found")]
    EmptyProjection,

    /// The transactions table is missing columns needed for the monthly summary.
    ///
    /// Holds the names of the missing columns.
    #[error("the transactions table is missing the column(s): {}", .0.join(", "))]
    MissingReportColumns(Vec<&'static str>),

    /// A value in the `date` column could not be converted to a calendar date.
    #[error("could not parse \"{0}\" as a date")]
    InvalidDate(String),

    /// A value in the `amount` column could not be converted to a number.
    #[error("could not parse \"{0}\" as an amount")]
    InvalidAmount(String),

    /// An unhandled/unexpected SQL error.
    #[error("{0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::debug!("SQL error: {value}");
        Error::SqlError(value)
    }
}

impl Error {
    /// Convert the error into an alert message suitable for an HTML fragment.
    fn into_alert(self) -> Alert {
        match self {
            Error::NotCSV => Alert::ErrorSimple {
                message: "File type must be CSV.".to_owned(),
            },
            Error::MultipartError(details) => Alert::Error {
                message: "Could not read the uploaded files".to_owned(),
                details,
            },
            Error::InvalidCSV(details) => Alert::Error {
                message: "Could not parse the CSV file".to_owned(),
                details,
            },
            Error::EmptyProjection => Alert::Warning {
                message: "No relevant columns found".to_owned(),
                details: "Files need at least one of the columns date, amount, merchant or \
                    category."
                    .to_owned(),
            },
            Error::MissingReportColumns(_) => Alert::Warning {
                message: "No 'date' and 'amount' columns found for summary.".to_owned(),
                details: String::new(),
            },
            Error::DatabaseLockError => Alert::Error {
                message: "Something went wrong".to_owned(),
                details: "Could not access the database, check the server logs for more details."
                    .to_owned(),
            },
            error @ (Error::InvalidDate(_) | Error::InvalidAmount(_) | Error::SqlError(_)) => {
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details: error.to_string(),
                }
            }
        }
    }

    fn into_alert_response(self) -> Response {
        let status_code = match self {
            Error::MultipartError(_) | Error::NotCSV | Error::InvalidCSV(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::EmptyProjection | Error::MissingReportColumns(_) => StatusCode::OK,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status_code, self.into_alert().into_html()).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::http::StatusCode;

    use crate::{Error, alert::Alert};

    #[test]
    fn missing_columns_is_a_warning() {
        let alert = Error::MissingReportColumns(vec!["amount"]).into_alert();

        assert!(matches!(alert, Alert::Warning { .. }));
    }

    #[test]
    fn missing_columns_message_lists_columns() {
        let error = Error::MissingReportColumns(vec!["date", "amount"]);

        assert_eq!(
            error.to_string(),
            "the transactions table is missing the column(s): date, amount"
        );
    }

    #[test]
    fn sql_error_alert_includes_cause() {
        let alert = Error::SqlError(rusqlite::Error::InvalidQuery).into_alert();

        match alert {
            Alert::Error { details, .. } => assert!(!details.is_empty()),
            other => panic!("want error alert, got {other:?}"),
        }
    }

    #[test]
    fn bad_upload_is_bad_request() {
        let response = Error::MultipartError("boom".to_owned()).into_alert_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn lock_error_is_internal_server_error() {
        let response = Error::DatabaseLockError.into_alert_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
