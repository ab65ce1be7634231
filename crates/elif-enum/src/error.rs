//! Error types for enum catalog management
//!
//! Every failure surfaces to the immediate caller. Sanitization and argument
//! errors are raised before any SQL is built; database errors are passed
//! through untouched and never retried, since DDL is not idempotent.

/// Result type alias for enum operations
pub type EnumResult<T> = Result<T, EnumError>;

/// Error types for enum catalog operations
#[derive(Debug, thiserror::Error)]
pub enum EnumError {
    /// A type name or value failed the identifier grammar
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Conflicting or malformed options
    #[error("Argument error: {0}")]
    Argument(String),

    /// The underlying statement failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The connected server cannot run the requested operation
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// A recorded command has no safe inverse
    #[error("Irreversible migration: {0}")]
    Irreversible(String),

    /// An enum type (or the column that should reference one) is unknown
    #[error("Unknown enum: {0}")]
    UnknownEnum(String),

    /// A value is not a member of the enum type it was cast to
    #[error("'{value}' is not a valid {enum_type}")]
    InvalidValue { value: String, enum_type: String },

    /// A persisted command log could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing a schema dump failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl EnumError {
    /// Whether the error was raised locally, before any statement reached the database
    pub fn is_local(&self) -> bool {
        !matches!(self, EnumError::Database(_))
    }
}
