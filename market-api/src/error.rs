use thiserror::Error;

/// Errors raised by a table sink.
#[derive(Error, Debug)]
pub enum TableError {
    /// A table with this name is already hosted.
    #[error("Table '{0}' already exists")]
    AlreadyExists(String),

    /// No table is hosted under this name.
    #[error("Table '{0}' not found")]
    UnknownTable(String),

    /// A row does not match the table schema.
    #[error("Row {index} does not match schema of '{table}': {reason}")]
    SchemaMismatch {
        table: String,
        index: usize,
        reason: String,
    },

    /// A value serialized to something other than a JSON object.
    #[error("Expected a JSON object, got {0}")]
    NotAnObject(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A specialized Result type for table operations.
pub type Result<T> = std::result::Result<T, TableError>;
