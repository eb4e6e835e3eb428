//! Type-safe wrappers for rounds, matches, users and outcomes.

pub mod ids;
pub mod outcome;


pub use ids::{MatchId, RoundId, UserId};
pub use outcome::{Outcome, DRAW_TOKEN};
