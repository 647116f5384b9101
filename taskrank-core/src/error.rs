//! Request-level failures.
//!
//! Per-record problems during member aggregation are not errors; see
//! [`crate::stats::SkipReason`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scoring::ScoringError;

#[derive(Debug, Error)]
pub enum RankError {
    /// Malformed or missing task fields. Rejects the whole batch.
    #[error("{0}")]
    InvalidInput(String),

    #[error("scoring failed: {0}")]
    Scoring(#[from] ScoringError),

    /// The member store could not be reached or returned an unusable document.
    #[error("member store unavailable: {0}")]
    UpstreamUnavailable(String),
}

pub type Result<T> = std::result::Result<T, RankError>;

impl RankError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::UpstreamUnavailable(msg.into())
    }

    /// HTTP-style status a transport layer would answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::Scoring(_) | Self::UpstreamUnavailable(_) => 500,
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload {
            error: self.to_string(),
        }
    }
}

/// Wire shape of a failed request: `{ "error": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_maps_to_400_and_keeps_message_verbatim() {
        let err = RankError::invalid("Invalid deadline format");
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_payload().error, "Invalid deadline format");
    }

    #[test]
    fn scoring_and_upstream_map_to_500() {
        let scoring: RankError = ScoringError::NonFinite(f64::NAN).into();
        assert_eq!(scoring.status_code(), 500);
        assert_eq!(RankError::upstream("timeout").status_code(), 500);
        assert!(
            RankError::upstream("timeout")
                .to_payload()
                .error
                .contains("timeout")
        );
    }
}
