// src/error.rs
//! Error kinds shared by the calculators and the feed clients.

use thiserror::Error;

/// Calculator failures. The `Display` text doubles as the placeholder a UI shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("Invalid input")]
    InvalidInput,

    #[error("Frequency cannot be zero")]
    DivisionByZero,
}

/// Remote fetch failures. Inside multi-query aggregation these are logged
/// and skipped; only `NoResults` escapes the aggregation boundary.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("network failure: {0}")]
    NetworkFailure(String),

    #[error("HTTP {status}")]
    HttpError { status: u16 },

    #[error("parse failure: {0}")]
    ParseFailure(String),

    #[error("no results")]
    NoResults,

    #[error("Please enter search terms")]
    EmptyQuery,
}

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => FeedError::HttpError {
                status: status.as_u16(),
            },
            None if e.is_decode() => FeedError::ParseFailure(e.to_string()),
            None => FeedError::NetworkFailure(e.to_string()),
        }
    }
}

pub type FeedResult<T> = std::result::Result<T, FeedError>;
