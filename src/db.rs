//! Opening the application database and helpers for inspecting its schema.

use std::path::PathBuf;

use rusqlite::Connection;

/// The name of the table that uploaded transactions are appended to.
pub const TRANSACTIONS_TABLE: &str = "transactions";

/// Where the SQLite database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// A private, in-memory database that is lost when the server stops.
    Memory,
    /// A database file on disk, created if it does not exist.
    File(PathBuf),
}

/// The errors that may occur while opening the application database.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseUrlError {
    /// No database location was given.
    #[error("the database URL is empty")]
    Empty,

    /// The URL names a database engine other than SQLite.
    #[error("unsupported database URL scheme \"{0}\", expected a file path or sqlite://<path>")]
    UnsupportedScheme(String),

    /// SQLite could not open the database.
    #[error("could not open the database: {0}")]
    Open(#[from] rusqlite::Error),
}

/// Parse a database URL into a [DatabaseLocation].
///
/// Accepts `:memory:`, `sqlite::memory:`, `sqlite://<path>`, `sqlite:<path>`
/// or a plain file path.
///
/// # Errors
/// Returns an error if `url` is empty or uses a scheme other than `sqlite`.
pub fn parse_database_url(url: &str) -> Result<DatabaseLocation, DatabaseUrlError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(DatabaseUrlError::Empty);
    }

    let path = match url.split_once("://") {
        Some(("sqlite", path)) => path,
        Some((scheme, _)) => return Err(DatabaseUrlError::UnsupportedScheme(scheme.to_owned())),
        None => url.strip_prefix("sqlite:").unwrap_or(url),
    };

    match path {
        "" => Err(DatabaseUrlError::Empty),
        ":memory:" => Ok(DatabaseLocation::Memory),
        path => Ok(DatabaseLocation::File(PathBuf::from(path))),
    }
}

/// Open a connection to the database at `url`.
///
/// # Errors
/// Returns an error if `url` is invalid or if SQLite cannot open the database.
pub fn open_connection(url: &str) -> Result<Connection, DatabaseUrlError> {
    let connection = match parse_database_url(url)? {
        DatabaseLocation::Memory => Connection::open_in_memory()?,
        DatabaseLocation::File(path) => Connection::open(path)?,
    };

    Ok(connection)
}

/// Whether the table `name` exists in the database.
pub fn table_exists(name: &str, connection: &Connection) -> Result<bool, rusqlite::Error> {
    connection
        .prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1")?
        .exists([name])
}
