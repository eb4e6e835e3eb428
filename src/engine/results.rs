//! Result store: the authoritative outcome of each match.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::cli::types::{MatchId, Outcome, RoundId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub round: RoundId,
    pub match_id: MatchId,
    pub outcome: Outcome,
    pub scorers: BTreeSet<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ResultStore {
    by_round: BTreeMap<RoundId, BTreeMap<MatchId, MatchResult>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `result`, returning the one it corrects, if any.
    pub fn insert(&mut self, result: MatchResult) -> Option<MatchResult> {
        self.by_round
            .entry(result.round)
            .or_default()
            .insert(result.match_id.clone(), result)
    }

    pub fn get(&self, round: RoundId, match_id: &MatchId) -> Option<&MatchResult> {
        self.by_round.get(&round)?.get(match_id)
    }

    pub fn round(&self, round: RoundId) -> Option<&BTreeMap<MatchId, MatchResult>> {
        self.by_round.get(&round)
    }

    pub fn rounds(&self) -> impl Iterator<Item = RoundId> + '_ {
        self.by_round.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.by_round.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
