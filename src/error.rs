//! Error types for the rugby prediction engine

use thiserror::Error;

use crate::cli::types::{MatchId, RoundId, UserId};


pub type Result<T> = std::result::Result<T, PredictorError>;

#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Invalid value: {reason}")]
    InvalidToken { reason: String },

    #[error("{operation}: round {round} match {match_id} {reason}")]
    UnknownReference {
        operation: &'static str,
        round: RoundId,
        match_id: MatchId,
        reason: String,
    },

    #[error("{operation} requires administrator permissions")]
    Unauthorized { operation: &'static str },

    #[error("No recorded score for user {user}")]
    NotFound { user: UserId },

    #[error("User ID not provided and {env_var} environment variable not set")]
    MissingUserId { env_var: String },

    #[error("Failed to parse identifier: {0}")]
    InvalidId(#[from] std::num::ParseIntError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl PredictorError {
    /// Shorthand for a catalog row that does not fit the upload schema.
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        PredictorError::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    /// Shorthand for a single command-line or stored token that fails to parse.
    pub fn invalid_token(reason: impl Into<String>) -> Self {
        PredictorError::InvalidToken {
            reason: reason.into(),
        }
    }
}
