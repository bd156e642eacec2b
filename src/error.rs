use chrono::NaiveDate;
use thiserror::Error;

/// Network-level failure talking to an upstream host.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
    #[error("http status {status} for {url}")]
    Status { status: u16, url: String },
}

impl TransportError {
    pub fn request(url: &str, err: impl std::fmt::Display) -> Self {
        Self::Request {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

/// Upstream payload did not have the expected shape.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("invalid selector `{0}`")]
    Selector(String),
}

/// Failure of one adapter fetch. The collector degrades it to an empty unit.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug, Error)]
pub enum VenueLookupError {
    #[error("fixture has no detail page reference")]
    MissingReference,
    #[error("no event id in detail reference `{0}`")]
    NoEventId(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("venue not present in response")]
    NotFound,
}

/// Errors that abort a whole collection run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CollectError {
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}
