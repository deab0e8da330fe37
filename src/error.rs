use reqwest::StatusCode;
use thiserror::Error;

use crate::validation::FieldErrors;

/// Coarse classification used by screens to decide how a failure is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    RequestFailure,
    SessionExpired,
    Usage,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Request failed with status {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Request failed: {0}")]
    RequestFailure(String),

    #[error("Session expired")]
    SessionExpired,

    #[error("HTTP error")]
    Http(#[from] reqwest::Error),

    #[error("Variant index {index} out of bounds for {len} variants")]
    VariantIndexOutOfBounds { index: usize, len: usize },

    #[error("File {name} is {size} bytes, limit is {limit}")]
    UploadTooLarge {
        name: String,
        size: usize,
        limit: usize,
    },

    #[error("A save is already in flight")]
    SaveInFlight,

    #[error("No entity selected")]
    NoSelection,

    #[error("No edit buffer to save")]
    NothingToSave,

    #[error("Token store error")]
    TokenStore(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Status { .. } | AppError::RequestFailure(_) | AppError::Http(_) => {
                ErrorKind::RequestFailure
            }
            AppError::SessionExpired => ErrorKind::SessionExpired,
            AppError::VariantIndexOutOfBounds { .. }
            | AppError::UploadTooLarge { .. }
            | AppError::SaveInFlight
            | AppError::NoSelection
            | AppError::NothingToSave
            | AppError::TokenStore(_)
            | AppError::Config(_) => ErrorKind::Usage,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::RequestFailure | ErrorKind::SessionExpired
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
