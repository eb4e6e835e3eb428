//! Match catalog: the fixtures and eligible try-scorers published per round.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    cli::types::{MatchId, Outcome, RoundId, DRAW_TOKEN},
    error::{PredictorError, Result},
};

/// Number of comma-separated fields in a catalog upload row.
pub const CATALOG_FIELDS: usize = 6;

/// One side of a fixture and the players eligible to score for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSheet {
    pub name: String,
    pub eligible_scorers: Vec<String>,
}

/// A fixture between two teams within a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub teams: [TeamSheet; 2],
}

impl Match {
    pub fn has_team(&self, name: &str) -> bool {
        self.teams.iter().any(|team| team.name == name)
    }

    /// Whether `outcome` names one of this match's teams or the draw.
    pub fn admits(&self, outcome: &Outcome) -> bool {
        match outcome {
            Outcome::Draw => true,
            Outcome::Winner(team) => self.has_team(team),
        }
    }
}

/// A match as supplied by an administrator, before it enters the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub match_id: String,
    pub team1: String,
    pub team2: String,
    pub scorers1: Vec<String>,
    pub scorers2: Vec<String>,
}

impl MatchRecord {
    /// Check the record can become a [`Match`]. `line` is reported on failure.
    pub fn validate(&self, line: usize) -> Result<()> {
        if self.match_id.trim().is_empty() {
            return Err(PredictorError::malformed(line, "match id is empty"));
        }
        for team in [&self.team1, &self.team2] {
            if team.trim().is_empty() {
                return Err(PredictorError::malformed(line, "team name is empty"));
            }
            // A team called "draw" would make the outcome token ambiguous.
            if team.trim().eq_ignore_ascii_case(DRAW_TOKEN) {
                return Err(PredictorError::malformed(
                    line,
                    format!("team name `{}` is reserved", team.trim()),
                ));
            }
        }
        if self.team1.trim() == self.team2.trim() {
            return Err(PredictorError::malformed(
                line,
                format!("team `{}` cannot play itself", self.team1.trim()),
            ));
        }
        Ok(())
    }

    fn into_match(self) -> Match {
        Match {
            id: MatchId::new(self.match_id.trim()),
            teams: [
                TeamSheet {
                    name: self.team1.trim().to_string(),
                    eligible_scorers: clean_names(self.scorers1),
                },
                TeamSheet {
                    name: self.team2.trim().to_string(),
                    eligible_scorers: clean_names(self.scorers2),
                },
            ],
        }
    }
}

/// A parsed upload row: the round it belongs to plus the match itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    pub line: usize,
    pub round: RoundId,
    pub record: MatchRecord,
}

/// Split a semicolon-separated scorer list, dropping empty entries.
pub fn split_scorers(field: &str) -> Vec<String> {
    field
        .split(';')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn clean_names(names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Parse a catalog upload.
///
/// The first line is a header and is skipped. Every other non-blank line must
/// hold exactly [`CATALOG_FIELDS`] fields:
/// `round,match,team1,team2,scorers1,scorers2`. Nothing is returned unless
/// every row parses, so a bad upload never reaches the catalog half-applied.
pub fn parse_catalog_csv(text: &str) -> Result<Vec<CatalogRow>> {
    let text = text.trim_start_matches('\u{feff}');
    let mut rows = Vec::new();

    for (index, raw) in text.lines().enumerate().skip(1) {
        let line = index + 1;
        if raw.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = raw.split(',').map(str::trim).collect();
        if fields.len() != CATALOG_FIELDS {
            return Err(PredictorError::malformed(
                line,
                format!(
                    "expected {} fields, found {}",
                    CATALOG_FIELDS,
                    fields.len()
                ),
            ));
        }

        let round = fields[0].parse::<RoundId>().map_err(|_| {
            PredictorError::malformed(line, format!("invalid round `{}`", fields[0]))
        })?;

        let record = MatchRecord {
            match_id: fields[1].to_string(),
            team1: fields[2].to_string(),
            team2: fields[3].to_string(),
            scorers1: split_scorers(fields[4]),
            scorers2: split_scorers(fields[5]),
        };
        record.validate(line)?;

        rows.push(CatalogRow {
            line,
            round,
            record,
        });
    }

    Ok(rows)
}

/// Matches per round, keyed by match id.
#[derive(Debug, Default, Clone)]
pub struct MatchCatalog {
    rounds: BTreeMap<RoundId, BTreeMap<MatchId, Match>>,
}

impl MatchCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the matches named by `records` in `round`.
    ///
    /// All records are validated before any is inserted. Existing matches not
    /// named in `records` are left untouched. Returns the number of matches
    /// written.
    pub fn load_round(&mut self, round: RoundId, records: Vec<MatchRecord>) -> Result<usize> {
        for (index, record) in records.iter().enumerate() {
            record.validate(index + 1)?;
        }

        let matches = self.rounds.entry(round).or_default();
        let count = records.len();
        for record in records {
            let game = record.into_match();
            matches.insert(game.id.clone(), game);
        }
        Ok(count)
    }

    /// Insert an already-built match, replacing any previous one.
    pub fn insert(&mut self, round: RoundId, game: Match) {
        self.rounds
            .entry(round)
            .or_default()
            .insert(game.id.clone(), game);
    }

    pub fn get(&self, round: RoundId, match_id: &MatchId) -> Option<&Match> {
        self.rounds.get(&round)?.get(match_id)
    }

    pub fn contains(&self, round: RoundId, match_id: &MatchId) -> bool {
        self.get(round, match_id).is_some()
    }

    /// Matches of a round ordered by match id.
    pub fn matches(&self, round: RoundId) -> Vec<&Match> {
        self.rounds
            .get(&round)
            .map(|matches| matches.values().collect())
            .unwrap_or_default()
    }

    pub fn rounds(&self) -> impl Iterator<Item = RoundId> + '_ {
        self.rounds.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.rounds.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
