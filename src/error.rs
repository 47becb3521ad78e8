//! Error types for the dosewatch library.

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for dosewatch operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A write was rejected before reaching the store.
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// An operation referenced a row that does not exist.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// A dose time-of-day string was not `HH:MM` within 00-23:00-59.
    #[error("invalid time '{0}': expected HH:MM (24-hour)")]
    InvalidTimeFormat(String),

    /// A schedule carried a timezone that is not a known IANA zone id.
    #[error("unknown timezone '{0}'")]
    UnknownTimezone(String),

    /// The platform reminder layer rejected an arm/cancel call.
    /// Never rolls back the data write that triggered it.
    #[error("reminder dispatch failed for '{reminder_id}': {message}")]
    Dispatch {
        reminder_id: String,
        message: String,
    },

    /// SQLite error
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}
