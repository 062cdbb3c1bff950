//! Implements a struct that holds the state of the web server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

/// The number of rows shown in the preview of each uploaded file.
pub const DEFAULT_PREVIEW_ROW_COUNT: usize = 5;

/// The state of the web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection holding the `transactions` table.
    pub db_connection: Arc<Mutex<Connection>>,

    /// How many rows of each uploaded file to show in its preview.
    pub preview_row_count: usize,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// The `transactions` table is not created here, it is created when the
    /// first file is uploaded using the columns of that file.
    pub fn new(db_connection: Connection) -> Self {
        Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            preview_row_count: DEFAULT_PREVIEW_ROW_COUNT,
        }
    }

    /// Set how many rows of each uploaded file to show in its preview.
    pub fn with_preview_row_count(mut self, preview_row_count: usize) -> Self {
        self.preview_row_count = preview_row_count;
        self
    }
}
