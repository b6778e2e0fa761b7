//! Error types for the MySQL shop store.

use thiserror::Error;

/// Errors that can occur while provisioning or writing the shop schema.
#[derive(Error, Debug)]
pub enum MySQLShopError {
    /// MySQL connection or query error.
    #[error("MySQL error: {0}")]
    MySQL(#[from] mysql_async::Error),

    /// Database name is not a plain identifier.
    #[error("Invalid database name '{0}': only ASCII letters, digits and '_' are allowed")]
    InvalidDatabaseName(String),

    /// A stored price could not be parsed back into a decimal.
    #[error("Invalid price '{value}' for item {id}: {reason}")]
    InvalidPrice {
        id: u64,
        value: String,
        reason: String,
    },
}
