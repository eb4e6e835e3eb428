//! Point rules and per-round subtotals.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::{predictions::Prediction, results::MatchResult};
use crate::cli::types::{MatchId, Outcome, RoundId, UserId};

pub type Points = u32;

/// Base points for correctly calling a draw.
pub const DRAW_POINTS: Points = 4;
/// Base points for correctly calling the winner.
pub const WINNER_POINTS: Points = 1;
/// Bonus per predicted try-scorer who actually scored.
pub const SCORER_POINTS: Points = 1;

/// Points earned by one prediction against one result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MatchScore {
    pub outcome_points: Points,
    pub scorer_points: Points,
}

impl MatchScore {
    pub fn total(&self) -> Points {
        self.outcome_points + self.scorer_points
    }
}

/// 4 for a correct draw, 1 for a correct winner, 0 otherwise.
pub fn outcome_points(predicted: &Outcome, actual: &Outcome) -> Points {
    if predicted != actual {
        0
    } else if predicted.is_draw() {
        DRAW_POINTS
    } else {
        WINNER_POINTS
    }
}

/// One point per name present in both sets. Names match exactly.
pub fn scorer_points(predicted: &BTreeSet<String>, actual: &BTreeSet<String>) -> Points {
    predicted.intersection(actual).count() as Points * SCORER_POINTS
}

pub fn score_prediction(prediction: &Prediction, result: &MatchResult) -> MatchScore {
    MatchScore {
        outcome_points: outcome_points(&prediction.outcome, &result.outcome),
        scorer_points: scorer_points(&prediction.scorers, &result.scorers),
    }
}

/// Subtotal for one user's picks in a round.
///
/// Returns `None` when none of the picks has a result yet, so a user is only
/// recorded once something of theirs has actually been scored.
pub fn score_user_round(
    picks: &BTreeMap<MatchId, Prediction>,
    results: &BTreeMap<MatchId, MatchResult>,
) -> Option<Points> {
    let mut scored = false;
    let mut subtotal = 0;
    for (match_id, prediction) in picks {
        if let Some(result) = results.get(match_id) {
            scored = true;
            subtotal += score_prediction(prediction, result).total();
        }
    }
    scored.then_some(subtotal)
}

/// Per-round subtotals for every recorded user.
///
/// A round's entry is replaced wholesale on each rescoring pass, so a total
/// is always the sum of the latest pass for every round and never carries
/// points from a superseded result.
#[derive(Debug, Default, Clone)]
pub struct Scoreboard {
    rounds: BTreeMap<RoundId, BTreeMap<UserId, Points>>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_round(&mut self, round: RoundId, subtotals: BTreeMap<UserId, Points>) {
        if subtotals.is_empty() {
            self.rounds.remove(&round);
        } else {
            self.rounds.insert(round, subtotals);
        }
    }

    pub fn round(&self, round: RoundId) -> Option<&BTreeMap<UserId, Points>> {
        self.rounds.get(&round)
    }

    pub fn total_for(&self, user: UserId) -> Option<Points> {
        let mut recorded = false;
        let mut total = 0;
        for subtotals in self.rounds.values() {
            if let Some(points) = subtotals.get(&user) {
                recorded = true;
                total += points;
            }
        }
        recorded.then_some(total)
    }

    /// Cumulative points per recorded user across all rounds.
    pub fn totals(&self) -> BTreeMap<UserId, Points> {
        let mut totals = BTreeMap::new();
        for subtotals in self.rounds.values() {
            for (user, points) in subtotals {
                *totals.entry(*user).or_insert(0) += points;
            }
        }
        totals
    }
}
