//! Diary-specific error types

use crate::retry::IsRetryable;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiaryError {
    #[error("Publisher throttled the request (status {status})")]
    Throttled { status: u16 },

    #[error("Index query still failing after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<DiaryError>,
    },

    #[error("Failed to parse index response for {start}..{end}: {source}")]
    ApiResponseError {
        start: NaiveDate,
        end: NaiveDate,
        #[source]
        source: serde_json::Error,
    },

    #[error("Edition '{0}' is not a numeric edition id")]
    InvalidEdition(String),

    #[error("Document for edition {edition} unavailable (status {status})")]
    DocumentUnavailable { edition: String, status: u16 },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Date {date} is after today ({today})")]
    FutureDate { date: NaiveDate, today: NaiveDate },

    #[error("Got {editions} editions but {paths} target paths")]
    LengthMismatch { editions: usize, paths: usize },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<anyhow::Error> for DiaryError {
    fn from(err: anyhow::Error) -> Self {
        DiaryError::Config(err.to_string())
    }
}

impl IsRetryable for DiaryError {
    fn is_retryable(&self) -> bool {
        match self {
            DiaryError::Throttled { .. } => true,
            DiaryError::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
