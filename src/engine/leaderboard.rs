//! Ranked view over per-user totals.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::scoring::Points;
use crate::cli::types::UserId;

/// A user's place on the leaderboard. `rank` is the 1-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub rank: usize,
    pub user: UserId,
    pub points: Points,
}

/// Points descending, ties by ascending user ID.
#[derive(Debug, Default, Clone)]
pub struct Leaderboard {
    standings: Vec<Standing>,
    positions: HashMap<UserId, usize>,
}

impl Leaderboard {
    pub fn rebuild(totals: &BTreeMap<UserId, Points>) -> Self {
        let mut ordered: Vec<(UserId, Points)> =
            totals.iter().map(|(user, points)| (*user, *points)).collect();
        ordered.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let standings: Vec<Standing> = ordered
            .into_iter()
            .enumerate()
            .map(|(index, (user, points))| Standing {
                rank: index + 1,
                user,
                points,
            })
            .collect();
        let positions = standings
            .iter()
            .enumerate()
            .map(|(index, standing)| (standing.user, index))
            .collect();

        Self {
            standings,
            positions,
        }
    }

    /// The first `n` standings, or all of them if there are fewer.
    pub fn top(&self, n: usize) -> &[Standing] {
        &self.standings[..n.min(self.standings.len())]
    }

    pub fn rank_of(&self, user: UserId) -> Option<&Standing> {
        self.positions
            .get(&user)
            .and_then(|index| self.standings.get(*index))
    }

    pub fn standings(&self) -> &[Standing] {
        &self.standings
    }

    pub fn len(&self) -> usize {
        self.standings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.standings.is_empty()
    }
}
