use crate::domain::account::UserId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuoteError>;

#[derive(Error, Debug)]
pub enum QuoteError {
    /// User-correctable problem with a request field.
    #[error("Invalid input for `{field}`: {reason}")]
    InvalidInput { field: String, reason: String },
    /// The request names a rate the admin never configured.
    #[error("Missing rate configuration for `{field}`")]
    MissingRateConfiguration { field: String },
    #[error("Unsupported calculation type `{0}`")]
    UnsupportedCalculationType(String),
    #[error("No credits available for user {0}")]
    CreditsExhausted(UserId),
    #[error("Active subscription required for user {0}")]
    SubscriptionRequired(UserId),
    #[error("Account not found for user {0}")]
    AccountNotFound(UserId),
    #[error("Invalid rate configuration `{field}`: {reason}")]
    InvalidRateConfiguration { field: String, reason: String },
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("Storage error: {0}")]
    StorageError(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

impl QuoteError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn missing_rate(field: impl Into<String>) -> Self {
        Self::MissingRateConfiguration {
            field: field.into(),
        }
    }

    pub fn invalid_rate(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRateConfiguration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The offending field, for errors that carry one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidInput { field, .. }
            | Self::MissingRateConfiguration { field }
            | Self::InvalidRateConfiguration { field, .. } => Some(field),
            _ => None,
        }
    }
}
