//! Prediction scoring and ranking engine
//!
//! The engine owns five state containers, each behind its own lock:
//! - `catalog`: matches and eligible try-scorers per round
//! - `predictions`: one pick per user, round and match
//! - `results`: one authoritative result per round and match
//! - `scores`: per-round subtotals for every recorded user
//! - `leaderboard`: the ranked snapshot served to queries
//!
//! Locks are always acquired in that order. A rescoring pass holds the
//! prediction and result read locks together with the scores write lock,
//! then publishes a fresh leaderboard before any of them is released.

pub mod catalog;
pub mod leaderboard;
pub mod predictions;
pub mod results;
pub mod scoring;

#[cfg(test)]
mod tests;

use std::{
    collections::BTreeMap,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    cli::types::{MatchId, Outcome, RoundId, UserId},
    error::{PredictorError, Result},
};

pub use catalog::{parse_catalog_csv, CatalogRow, Match, MatchCatalog, MatchRecord, TeamSheet};
pub use leaderboard::{Leaderboard, Standing};
pub use predictions::{scorer_set, Prediction, PredictionStore};
pub use results::{MatchResult, ResultStore};
pub use scoring::{score_prediction, MatchScore, Points, Scoreboard};

/// Engine behaviour knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Reject predictions and results for matches missing from the catalog,
    /// or whose outcome names neither team, instead of only flagging them.
    pub strict_catalog: bool,
    /// Entries shown by a default leaderboard query.
    pub leaderboard_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strict_catalog: false,
            leaderboard_size: 10,
        }
    }
}

/// Caller authorization as decided by the command gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Admin,
    Member,
}

impl Authorization {
    pub fn from_flag(is_admin: bool) -> Self {
        if is_admin {
            Authorization::Admin
        } else {
            Authorization::Member
        }
    }

    /// Fail with [`PredictorError::Unauthorized`] unless this is an admin.
    pub fn require_admin(self, operation: &'static str) -> Result<()> {
        match self {
            Authorization::Admin => Ok(()),
            Authorization::Member => {
                warn!(operation, "rejected privileged operation");
                Err(PredictorError::Unauthorized { operation })
            }
        }
    }
}

/// How a submission relates to the match catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogCheck {
    Listed,
    /// The round or match has not been uploaded.
    UnlistedMatch,
    /// The match exists but the outcome names neither of its teams.
    UnlistedOutcome,
}

/// A stored submission together with its catalog check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt<T> {
    pub record: T,
    pub catalog: CatalogCheck,
}

/// Summary of one rescoring pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundScoring {
    pub round: RoundId,
    pub matches_scored: usize,
    /// Round subtotal per user with at least one scored pick.
    pub awarded: BTreeMap<UserId, Points>,
}

/// Engine state as kept by storage.
///
/// `subtotals` holds the outcome of the last scoring pass of each round, so a
/// restored engine ranks users exactly as it did before it was saved.
#[derive(Debug, Clone, Default)]
pub struct EngineInputs {
    pub matches: Vec<(RoundId, Match)>,
    pub predictions: Vec<Prediction>,
    pub results: Vec<MatchResult>,
    pub subtotals: BTreeMap<RoundId, BTreeMap<UserId, Points>>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

pub struct PredictionEngine {
    config: EngineConfig,
    catalog: RwLock<MatchCatalog>,
    predictions: RwLock<PredictionStore>,
    results: RwLock<ResultStore>,
    scores: RwLock<Scoreboard>,
    leaderboard: RwLock<Arc<Leaderboard>>,
}

impl Default for PredictionEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl PredictionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            catalog: RwLock::new(MatchCatalog::new()),
            predictions: RwLock::new(PredictionStore::new()),
            results: RwLock::new(ResultStore::new()),
            scores: RwLock::new(Scoreboard::new()),
            leaderboard: RwLock::new(Arc::new(Leaderboard::default())),
        }
    }

    /// Rebuild an engine from stored state.
    ///
    /// Scores come from the stored subtotals, not from a fresh scoring pass:
    /// picks submitted after the last pass of their round stay unscored until
    /// that round is rescored.
    pub fn restore(config: EngineConfig, inputs: EngineInputs) -> Self {
        let engine = Self::new(config);
        {
            let mut catalog = write(&engine.catalog);
            for (round, game) in inputs.matches {
                catalog.insert(round, game);
            }
        }
        {
            let mut predictions = write(&engine.predictions);
            for prediction in inputs.predictions {
                predictions.insert(prediction);
            }
        }
        {
            let mut results = write(&engine.results);
            for result in inputs.results {
                results.insert(result);
            }
        }
        {
            let mut scores = write(&engine.scores);
            for (round, subtotals) in inputs.subtotals {
                scores.replace_round(round, subtotals);
            }
            *write(&engine.leaderboard) = Arc::new(Leaderboard::rebuild(&scores.totals()));
        }
        engine
    }

    /// Drop every match, prediction, result and score. Admin only.
    pub fn reset(&self, auth: Authorization) -> Result<()> {
        auth.require_admin("reset")?;
        let mut catalog = write(&self.catalog);
        let mut predictions = write(&self.predictions);
        let mut results = write(&self.results);
        let mut scores = write(&self.scores);

        *catalog = MatchCatalog::new();
        *predictions = PredictionStore::new();
        *results = ResultStore::new();
        *scores = Scoreboard::new();
        *write(&self.leaderboard) = Arc::new(Leaderboard::default());
        info!("reset all engine state");
        Ok(())
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Replace the matches of `round` named in `records`. Admin only.
    ///
    /// Every record is validated first; on any failure the catalog is
    /// unchanged.
    pub fn load_round(
        &self,
        auth: Authorization,
        round: RoundId,
        records: Vec<MatchRecord>,
    ) -> Result<usize> {
        auth.require_admin("load-round")?;
        let count = write(&self.catalog).load_round(round, records)?;
        info!(round = %round, matches = count, "loaded round into catalog");
        Ok(count)
    }

    /// Load a whole upload, possibly spanning several rounds. Admin only.
    ///
    /// All-or-nothing: any invalid row leaves the catalog untouched. Returns
    /// the number of matches written per round.
    pub fn load_catalog(
        &self,
        auth: Authorization,
        rows: Vec<CatalogRow>,
    ) -> Result<BTreeMap<RoundId, usize>> {
        auth.require_admin("upload-catalog")?;
        for row in &rows {
            row.record.validate(row.line)?;
        }

        let mut by_round: BTreeMap<RoundId, Vec<MatchRecord>> = BTreeMap::new();
        for row in rows {
            by_round.entry(row.round).or_default().push(row.record);
        }

        let mut catalog = write(&self.catalog);
        let mut loaded = BTreeMap::new();
        for (round, records) in by_round {
            let count = catalog.load_round(round, records)?;
            info!(round = %round, matches = count, "loaded round into catalog");
            loaded.insert(round, count);
        }
        Ok(loaded)
    }

    /// Matches of a round in match-id order.
    pub fn matches(&self, round: RoundId) -> Vec<Match> {
        read(&self.catalog)
            .matches(round)
            .into_iter()
            .cloned()
            .collect()
    }

    fn check_catalog(
        &self,
        operation: &'static str,
        round: RoundId,
        match_id: &MatchId,
        outcome: &Outcome,
    ) -> Result<CatalogCheck> {
        let check = match read(&self.catalog).get(round, match_id) {
            None => CatalogCheck::UnlistedMatch,
            Some(game) if !game.admits(outcome) => CatalogCheck::UnlistedOutcome,
            Some(_) => CatalogCheck::Listed,
        };

        if check == CatalogCheck::Listed {
            return Ok(check);
        }

        let reason = match check {
            CatalogCheck::UnlistedOutcome => format!("has no team named `{}`", outcome),
            _ => "is not in the match catalog".to_string(),
        };
        if self.config.strict_catalog {
            return Err(PredictorError::UnknownReference {
                operation,
                round,
                match_id: match_id.clone(),
                reason,
            });
        }
        warn!(operation, round = %round, match_id = %match_id, "{}", reason);
        Ok(check)
    }

    /// Store a user's pick, replacing any earlier pick for the same match.
    ///
    /// Scores are not touched; the pick counts from the next rescoring pass
    /// of its round.
    pub fn submit_prediction(
        &self,
        user: UserId,
        round: RoundId,
        match_id: MatchId,
        outcome: Outcome,
        scorer1: &str,
        scorer2: &str,
    ) -> Result<Receipt<Prediction>> {
        let catalog = self.check_catalog("predict", round, &match_id, &outcome)?;
        let prediction = Prediction {
            user,
            round,
            match_id,
            outcome,
            scorers: scorer_set(scorer1, scorer2),
        };

        let replaced = write(&self.predictions).insert(prediction.clone());
        debug!(
            user = %user,
            round = %round,
            match_id = %prediction.match_id,
            outcome = %prediction.outcome,
            replaced = replaced.is_some(),
            "stored prediction"
        );

        Ok(Receipt {
            record: prediction,
            catalog,
        })
    }

    pub fn prediction(&self, user: UserId, round: RoundId, match_id: &MatchId) -> Option<Prediction> {
        read(&self.predictions).get(user, round, match_id).cloned()
    }

    pub fn predictions_for(&self, user: UserId) -> Vec<Prediction> {
        read(&self.predictions)
            .for_user(user)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Store or correct a match result and rescore its round. Admin only.
    pub fn submit_result(
        &self,
        auth: Authorization,
        round: RoundId,
        match_id: MatchId,
        outcome: Outcome,
        scorer1: &str,
        scorer2: &str,
    ) -> Result<(Receipt<MatchResult>, RoundScoring)> {
        auth.require_admin("submit-result")?;
        let catalog = self.check_catalog("submit-result", round, &match_id, &outcome)?;
        let result = MatchResult {
            round,
            match_id,
            outcome,
            scorers: scorer_set(scorer1, scorer2),
        };

        let corrected = write(&self.results).insert(result.clone());
        info!(
            round = %round,
            match_id = %result.match_id,
            outcome = %result.outcome,
            corrected = corrected.is_some(),
            "stored result"
        );

        let scoring = self.rescore_round(round);
        Ok((
            Receipt {
                record: result,
                catalog,
            },
            scoring,
        ))
    }

    pub fn result(&self, round: RoundId, match_id: &MatchId) -> Option<MatchResult> {
        read(&self.results).get(round, match_id).cloned()
    }

    /// Recompute every user's subtotal for `round` from the current
    /// predictions and results, replace the round's previous subtotals and
    /// rebuild the leaderboard. Running it repeatedly is harmless.
    pub fn rescore_round(&self, round: RoundId) -> RoundScoring {
        let predictions = read(&self.predictions);
        let results = read(&self.results);
        let mut scores = write(&self.scores);

        let round_results = results.round(round);
        let awarded: BTreeMap<UserId, Points> = match (predictions.round(round), round_results) {
            (Some(by_user), Some(round_results)) => by_user
                .par_iter()
                .filter_map(|(user, picks)| {
                    scoring::score_user_round(picks, round_results).map(|points| (*user, points))
                })
                .collect(),
            _ => BTreeMap::new(),
        };

        scores.replace_round(round, awarded.clone());
        let leaderboard = Leaderboard::rebuild(&scores.totals());
        *write(&self.leaderboard) = Arc::new(leaderboard);

        let matches_scored = round_results.map(BTreeMap::len).unwrap_or(0);
        info!(
            round = %round,
            matches = matches_scored,
            users = awarded.len(),
            "rescored round"
        );

        RoundScoring {
            round,
            matches_scored,
            awarded,
        }
    }

    /// Rescore every round that has predictions or results.
    pub fn rescore_all(&self) -> Vec<RoundScoring> {
        let mut rounds: Vec<RoundId> = read(&self.predictions).rounds().collect();
        rounds.extend(read(&self.results).rounds());
        rounds.sort();
        rounds.dedup();

        rounds
            .into_iter()
            .map(|round| self.rescore_round(round))
            .collect()
    }

    /// Current leaderboard snapshot.
    pub fn leaderboard(&self) -> Arc<Leaderboard> {
        Arc::clone(&read(&self.leaderboard))
    }

    /// The first `n` standings.
    pub fn top(&self, n: usize) -> Vec<Standing> {
        self.leaderboard().top(n).to_vec()
    }

    /// A user's standing, or [`PredictorError::NotFound`] if nothing of
    /// theirs has been scored.
    pub fn rank_of(&self, user: UserId) -> Result<Standing> {
        self.leaderboard()
            .rank_of(user)
            .copied()
            .ok_or(PredictorError::NotFound { user })
    }

    pub fn total_for(&self, user: UserId) -> Option<Points> {
        read(&self.scores).total_for(user)
    }
}
