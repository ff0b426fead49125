use thiserror::Error;

use crate::config::ConfigError;

/// Errors returned by gateway operations.
///
/// These only describe calls that could not be completed. A remote answer
/// that is merely negative (unknown id, illegal transition) is an
/// [`crate::Outcome::Rejected`], never an error.
#[derive(Debug, Error)]
pub enum McPaymentError {
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] ValidationError),

    #[error("http error: {0}")]
    Http(String),

    #[error("authentication rejected by gateway (status {status})")]
    Authentication { status: u16 },

    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("response decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response is missing the subscription data")]
    MissingData,

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl McPaymentError {
    /// True when the request was rejected locally, before any network call.
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, McPaymentError::InvalidRequest(_))
    }
}

/// Reasons a request payload fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("start_time '{0}' is not an RFC 3339 timestamp")]
    StartTimeFormat(String),

    #[error("start_time '{start_time}' is in the past")]
    StartTimeInPast { start_time: String },
}
