//! Outcome tokens: a winning team or the draw.

use crate::error::{PredictorError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Literal token users and admins type for a drawn match.
pub const DRAW_TOKEN: &str = "draw";

/// Predicted or actual outcome of a match.
///
/// Team names compare case-sensitively. The draw token is recognised in any
/// ASCII case so `Draw` and `DRAW` both parse to [`Outcome::Draw`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The named team wins.
    Winner(String),
    Draw,
}

impl Outcome {
    pub fn winner(team: impl Into<String>) -> Self {
        Outcome::Winner(team.into())
    }

    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }

    /// Token form used for display and storage.
    pub fn as_token(&self) -> &str {
        match self {
            Outcome::Winner(team) => team,
            Outcome::Draw => DRAW_TOKEN,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_token())
    }
}

impl FromStr for Outcome {
    type Err = PredictorError;

    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim();
        if token.is_empty() {
            return Err(PredictorError::invalid_token("outcome must not be empty"));
        }
        if token.eq_ignore_ascii_case(DRAW_TOKEN) {
            Ok(Outcome::Draw)
        } else {
            Ok(Outcome::Winner(token.to_string()))
        }
    }
}
