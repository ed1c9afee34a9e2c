//! Error types for record mapping and statement execution.

use thiserror::Error;

/// Error type any driver can report through [`Error::Driver`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for data-access operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A key-based operation found zero or several key columns.
    #[error("Key for table {table} isn't defined (expected exactly one key column, found {found})")]
    KeyConfiguration { table: String, found: usize },

    /// The driver rejected the statement. Holds the driver's own error.
    #[error("Driver error: {0}")]
    Driver(#[source] BoxError),

    /// A statement was issued on a connection that is not open.
    #[error("Connection is not open")]
    ConnectionClosed,

    /// A record was asked for a column its field mapping does not know.
    #[error("Column {column} is not mapped by record for table {table}")]
    UnknownColumn { table: String, column: String },

    /// A result row has no column with the requested name.
    #[error("Column {0} not found in result set")]
    ColumnNotFound(String),

    /// A named parameter has no matching placeholder in the statement text.
    #[error("Parameter {0} has no matching placeholder")]
    UnknownParameter(String),

    /// A placeholder in the statement text has no parameter bound to it.
    #[error("Placeholder {0} has no bound parameter")]
    UnboundParameter(String),

    /// A value could not be converted to the requested Rust type.
    #[error("Cannot convert {found} to {expected}")]
    Conversion {
        expected: &'static str,
        found: &'static str,
    },

    /// The driver does not support the requested feature.
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl Error {
    /// Wrap a driver-specific error
    pub fn driver(err: impl Into<BoxError>) -> Self {
        Error::Driver(err.into())
    }

    /// Create an UnknownColumn error
    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Error::UnknownColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Whether the statement itself could not run: the driver rejected it,
    /// the connection was closed, or its placeholders and parameters disagree.
    pub fn is_execution(&self) -> bool {
        matches!(
            self,
            Error::Driver(_)
                | Error::ConnectionClosed
                | Error::UnknownParameter(_)
                | Error::UnboundParameter(_)
        )
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Driver(Box::new(err))
    }
}

/// Result type alias for data-access operations.
pub type Result<T> = std::result::Result<T, Error>;
