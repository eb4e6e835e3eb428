//! CLI argument definitions and parsing.

pub mod types;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use types::{MatchId, Outcome, RoundId, UserId};

/// Arguments accepted by every command
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Caller's user ID (or set `RUGBY_PREDICTOR_USER` env var).
    #[clap(long, short, global = true)]
    pub user: Option<UserId>,

    /// Database file (or set `RUGBY_PREDICTOR_DB` env var).
    #[clap(long, global = true)]
    pub db: Option<PathBuf>,

    /// Reject predictions and results that do not match the uploaded catalog.
    #[clap(long, global = true)]
    pub strict: bool,

    /// Log engine activity to stderr.
    #[clap(long, short, global = true)]
    pub verbose: bool,

    /// Output results as JSON instead of text lines.
    #[clap(long, global = true)]
    pub json: bool,
}

/// A match outcome plus up to two try-scorers, shared by picks and results
#[derive(Debug, Args)]
pub struct MatchCall {
    /// Round number.
    pub round: RoundId,

    /// Match identifier within the round.
    pub match_id: MatchId,

    /// Winning team name, or `draw`.
    pub outcome: Outcome,

    /// First try-scorer.
    pub scorer1: Option<String>,

    /// Second try-scorer.
    pub scorer2: Option<String>,
}

impl MatchCall {
    pub fn scorers(&self) -> (&str, &str) {
        (
            self.scorer1.as_deref().unwrap_or(""),
            self.scorer2.as_deref().unwrap_or(""),
        )
    }
}

#[derive(Debug, Parser)]
#[clap(name = "rugby-predictor", about = "Rugby match and try-scorer prediction league")]
pub struct Predictor {
    #[clap(flatten)]
    pub global: GlobalArgs,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload match data and eligible try-scorers from a CSV file (admin only).
    ///
    /// Expects a header row followed by
    /// `round,match,team1,team2,scorers1,scorers2` rows, scorer lists
    /// separated by `;`. Nothing is stored unless every row is valid.
    UploadCatalog {
        /// Path to the CSV file.
        file: PathBuf,
    },

    /// List the matches uploaded for a round.
    Matches {
        /// Round number.
        round: RoundId,
    },

    /// Submit or replace a prediction.
    Predict {
        #[clap(flatten)]
        call: MatchCall,
    },

    /// Record a match result and rescore its round (admin only).
    SubmitResult {
        #[clap(flatten)]
        call: MatchCall,
    },

    /// Recompute scores for one round, or every round (admin only).
    Rescore {
        /// Round number; all rounds when omitted.
        round: Option<RoundId>,
    },

    /// Show the top of the leaderboard.
    Leaderboard {
        /// Number of entries to show (default 10).
        #[clap(long, short)]
        top: Option<usize>,
    },

    /// Show the caller's rank and points.
    MyRank,

    /// Remove all matches, predictions, results and scores (admin only).
    Reset,
}
