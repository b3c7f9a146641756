use anyhow::Error;
use thiserror::Error;

/// Error surfaced by command handlers. Validation problems carry a
/// user-facing message; everything else wraps the underlying cause.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(#[from] Error),
}

impl AppError {
    pub fn message(text: impl Into<String>) -> Self {
        AppError::Message(text.into())
    }
}

impl From<AppError> for String {
    fn from(err: AppError) -> Self {
        format!("{err:#}")
    }
}
