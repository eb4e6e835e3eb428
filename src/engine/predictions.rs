//! Prediction store: one prediction per user, round and match.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::cli::types::{MatchId, Outcome, RoundId, UserId};

/// A user's pick for one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub user: UserId,
    pub round: RoundId,
    pub match_id: MatchId,
    pub outcome: Outcome,
    /// At most two names. Picking the same player twice stores one name.
    pub scorers: BTreeSet<String>,
}

/// Build a try-scorer set from two raw names, ignoring blanks.
pub fn scorer_set(scorer1: &str, scorer2: &str) -> BTreeSet<String> {
    [scorer1, scorer2]
        .into_iter()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Round -> user -> match -> prediction. Round-first nesting keeps a
/// rescoring pass to a single lookup.
pub type RoundPredictions = BTreeMap<UserId, BTreeMap<MatchId, Prediction>>;

#[derive(Debug, Default, Clone)]
pub struct PredictionStore {
    by_round: BTreeMap<RoundId, RoundPredictions>,
}

impl PredictionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `prediction`, replacing any earlier one for the same key whole.
    /// Returns the replaced prediction.
    pub fn insert(&mut self, prediction: Prediction) -> Option<Prediction> {
        self.by_round
            .entry(prediction.round)
            .or_default()
            .entry(prediction.user)
            .or_default()
            .insert(prediction.match_id.clone(), prediction)
    }

    pub fn get(&self, user: UserId, round: RoundId, match_id: &MatchId) -> Option<&Prediction> {
        self.by_round.get(&round)?.get(&user)?.get(match_id)
    }

    pub fn round(&self, round: RoundId) -> Option<&RoundPredictions> {
        self.by_round.get(&round)
    }

    pub fn rounds(&self) -> impl Iterator<Item = RoundId> + '_ {
        self.by_round.keys().copied()
    }

    /// Every prediction a user has made, ordered by round then match.
    pub fn for_user(&self, user: UserId) -> Vec<&Prediction> {
        self.by_round
            .values()
            .filter_map(|users| users.get(&user))
            .flat_map(BTreeMap::values)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_round
            .values()
            .flat_map(BTreeMap::values)
            .map(BTreeMap::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
