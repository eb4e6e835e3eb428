//! Rugby Prediction League Library
//!
//! Tracks a community's predictions of match outcomes and try-scorers across
//! the rounds of a tournament, scores them against administrator-published
//! results and keeps a ranked leaderboard.
//!
//! ## Scoring
//!
//! - **Correct draw**: 4 points
//! - **Correct winner**: 1 point
//! - **Try-scorers**: 1 point for each predicted scorer who actually scored,
//!   whether or not the outcome was right
//!
//! ## Quick Start
//!
//! ```rust
//! use rugby_predictor::engine::{Authorization, MatchRecord, PredictionEngine};
//! use rugby_predictor::{MatchId, Outcome, RoundId, UserId};
//!
//! # fn example() -> rugby_predictor::Result<()> {
//! let engine = PredictionEngine::default();
//! engine.load_round(
//!     Authorization::Admin,
//!     RoundId::new(1),
//!     vec![MatchRecord {
//!         match_id: "A".to_string(),
//!         team1: "Lions".to_string(),
//!         team2: "Tigers".to_string(),
//!         scorers1: vec!["Al".to_string(), "Bo".to_string()],
//!         scorers2: vec!["Cy".to_string(), "Di".to_string()],
//!     }],
//! )?;
//!
//! let user = UserId::new(1);
//! engine.submit_prediction(user, RoundId::new(1), MatchId::new("A"), Outcome::winner("Lions"), "Al", "Cy")?;
//! engine.submit_result(Authorization::Admin, RoundId::new(1), MatchId::new("A"), Outcome::winner("Lions"), "Al", "Di")?;
//!
//! assert_eq!(engine.rank_of(user)?.points, 2);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Environment Configuration
//!
//! ```bash
//! export RUGBY_PREDICTOR_USER=123456789      # caller when --user is omitted
//! export RUGBY_PREDICTOR_ADMINS=111,222      # users allowed to upload and submit results
//! export RUGBY_PREDICTOR_DB=/path/to/predictions.db
//! ```

pub mod cli;
pub mod commands;
pub mod core;
pub mod engine;
pub mod error;
pub mod storage;

// Re-export commonly used types
pub use cli::types::{MatchId, Outcome, RoundId, UserId};
pub use engine::{EngineConfig, PredictionEngine};
pub use error::{PredictorError, Result};

pub const USER_ID_ENV_VAR: &str = "RUGBY_PREDICTOR_USER";
pub const ADMINS_ENV_VAR: &str = "RUGBY_PREDICTOR_ADMINS";
pub const DB_PATH_ENV_VAR: &str = "RUGBY_PREDICTOR_DB";
