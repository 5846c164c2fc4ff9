//! Shared error types for the services crate.

use thiserror::Error;

use game_core::model::{GuessError, SessionError};

/// Startup configuration failures. These are fatal.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("HUGGINGFACE_API_KEY is missing; set it in the environment")]
    MissingApiKey,
    #[error("invalid value for {key}: {raw:?}")]
    InvalidValue { key: &'static str, raw: String },
    #[error("could not build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Errors emitted by a `SimilarityOracle`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OracleError {
    #[error("similarity service request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("similarity service returned status {status}: {detail}")]
    HttpStatus {
        status: reqwest::StatusCode,
        detail: String,
    },
    #[error("similarity service returned an unexpected response: {0}")]
    Malformed(String),
}

impl OracleError {
    /// Failures worth another try: transport errors, 429 and 5xx.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            OracleError::Transport(_) => true,
            OracleError::HttpStatus { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            OracleError::Malformed(_) => false,
        }
    }

    /// The service could not be reached or refused the request.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, OracleError::Transport(_) | OracleError::HttpStatus { .. })
    }
}

/// Errors emitted by `GameService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GameError {
    #[error(transparent)]
    InvalidGuess(#[from] GuessError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Oracle(#[from] OracleError),
    #[error("no guess is waiting to be scored")]
    NothingPending,
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn status(status: StatusCode) -> OracleError {
        OracleError::HttpStatus {
            status,
            detail: String::new(),
        }
    }

    #[test]
    fn transient_statuses() {
        assert!(status(StatusCode::SERVICE_UNAVAILABLE).is_transient());
        assert!(status(StatusCode::TOO_MANY_REQUESTS).is_transient());
        assert!(!status(StatusCode::UNAUTHORIZED).is_transient());
        assert!(!OracleError::Malformed("[]".into()).is_transient());
    }

    #[test]
    fn malformed_is_not_unavailable() {
        assert!(status(StatusCode::BAD_GATEWAY).is_unavailable());
        assert!(!OracleError::Malformed("{}".into()).is_unavailable());
    }
}
