use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("completion service error: {summary}")]
    CompletionService { summary: String, detail: String },
    #[error("clipboard error: {0}")]
    Clipboard(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AppError {
    pub fn completion(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::CompletionService {
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    /// Full diagnostic text, shown only when debugging is enabled.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::CompletionService { detail, .. } if !detail.is_empty() => Some(detail),
            _ => None,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
