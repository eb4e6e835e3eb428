//! Basic database query operations

use super::schema::PredictorDatabase;
use crate::{
    cli::types::{MatchId, Outcome, RoundId, UserId},
    engine::{EngineInputs, Match, MatchResult, Points, Prediction, TeamSheet},
    error::Result,
};
use rusqlite::params;
use std::{
    collections::{BTreeMap, BTreeSet},
    time::{SystemTime, UNIX_EPOCH},
};

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

type MatchRow = (u32, String, String, String, String, String);
type PickRow = (u32, String, String, String);

impl PredictorDatabase {
    /// Insert or replace the matches of every round in one transaction, so
    /// an upload is stored completely or not at all
    pub fn upsert_catalog(&mut self, rounds: &BTreeMap<RoundId, Vec<Match>>) -> Result<()> {
        let now = now();
        let tx = self.conn.transaction()?;
        for (round, matches) in rounds {
            for game in matches {
                let [home, away] = &game.teams;
                tx.execute(
                    "INSERT OR REPLACE INTO matches
                     (round, match_id, team1, team2, scorers1, scorers2, updated_at)
                     VALUES (?, ?, ?, ?, ?, ?, ?)",
                    params![
                        round.as_u32(),
                        game.id.as_str(),
                        home.name,
                        away.name,
                        serde_json::to_string(&home.eligible_scorers)?,
                        serde_json::to_string(&away.eligible_scorers)?,
                        now
                    ],
                )?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Replace the stored subtotals of a round with the latest scoring pass
    pub fn replace_round_scores(
        &mut self,
        round: RoundId,
        subtotals: &BTreeMap<UserId, Points>,
    ) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM round_scores WHERE round = ?",
            params![round.as_u32()],
        )?;
        for (user, points) in subtotals {
            tx.execute(
                "INSERT INTO round_scores (round, user_id, points) VALUES (?, ?, ?)",
                params![round.as_u32(), user.as_u64(), points],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Insert or replace a user's prediction
    pub fn upsert_prediction(&mut self, prediction: &Prediction) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO predictions
             (user_id, round, match_id, outcome, scorers, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                prediction.user.as_u64(),
                prediction.round.as_u32(),
                prediction.match_id.as_str(),
                prediction.outcome.as_token(),
                serde_json::to_string(&prediction.scorers)?,
                now()
            ],
        )?;
        Ok(())
    }

    /// Insert or replace a match result
    pub fn upsert_result(&mut self, result: &MatchResult) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO results
             (round, match_id, outcome, scorers, updated_at)
             VALUES (?, ?, ?, ?, ?)",
            params![
                result.round.as_u32(),
                result.match_id.as_str(),
                result.outcome.as_token(),
                serde_json::to_string(&result.scorers)?,
                now()
            ],
        )?;
        Ok(())
    }

    /// Load everything needed to rebuild the engine
    pub fn load_inputs(&self) -> Result<EngineInputs> {
        Ok(EngineInputs {
            matches: self.load_matches()?,
            predictions: self.load_predictions()?,
            results: self.load_results()?,
            subtotals: self.load_round_scores()?,
        })
    }

    fn load_matches(&self) -> Result<Vec<(RoundId, Match)>> {
        let mut stmt = self.conn.prepare(
            "SELECT round, match_id, team1, team2, scorers1, scorers2
             FROM matches
             ORDER BY round, match_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok::<MatchRow, rusqlite::Error>((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
            ))
        })?;

        let mut matches = Vec::new();
        for row in rows {
            let (round, match_id, team1, team2, scorers1, scorers2) = row?;
            let game = Match {
                id: MatchId::new(match_id),
                teams: [
                    TeamSheet {
                        name: team1,
                        eligible_scorers: serde_json::from_str(&scorers1)?,
                    },
                    TeamSheet {
                        name: team2,
                        eligible_scorers: serde_json::from_str(&scorers2)?,
                    },
                ],
            };
            matches.push((RoundId::new(round), game));
        }
        Ok(matches)
    }

    fn load_predictions(&self) -> Result<Vec<Prediction>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, round, match_id, outcome, scorers
             FROM predictions
             ORDER BY round, user_id, match_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok::<(u64, PickRow), rusqlite::Error>((
                row.get(0)?,
                (row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?),
            ))
        })?;

        let mut predictions = Vec::new();
        for row in rows {
            let (user, (round, match_id, outcome, scorers)) = row?;
            predictions.push(Prediction {
                user: UserId::new(user),
                round: RoundId::new(round),
                match_id: MatchId::new(match_id),
                outcome: outcome.parse::<Outcome>()?,
                scorers: serde_json::from_str::<BTreeSet<String>>(&scorers)?,
            });
        }
        Ok(predictions)
    }

    fn load_results(&self) -> Result<Vec<MatchResult>> {
        let mut stmt = self.conn.prepare(
            "SELECT round, match_id, outcome, scorers
             FROM results
             ORDER BY round, match_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok::<PickRow, rusqlite::Error>((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
        })?;

        let mut results = Vec::new();
        for row in rows {
            let (round, match_id, outcome, scorers) = row?;
            results.push(MatchResult {
                round: RoundId::new(round),
                match_id: MatchId::new(match_id),
                outcome: outcome.parse::<Outcome>()?,
                scorers: serde_json::from_str::<BTreeSet<String>>(&scorers)?,
            });
        }
        Ok(results)
    }

    fn load_round_scores(&self) -> Result<BTreeMap<RoundId, BTreeMap<UserId, Points>>> {
        let mut stmt = self
            .conn
            .prepare("SELECT round, user_id, points FROM round_scores")?;
        let rows = stmt.query_map([], |row| {
            Ok::<(u32, u64, Points), rusqlite::Error>((row.get(0)?, row.get(1)?, row.get(2)?))
        })?;

        let mut subtotals: BTreeMap<RoundId, BTreeMap<UserId, Points>> = BTreeMap::new();
        for row in rows {
            let (round, user, points) = row?;
            subtotals
                .entry(RoundId::new(round))
                .or_default()
                .insert(UserId::new(user), points);
        }
        Ok(subtotals)
    }

    /// Remove all stored data in one transaction
    pub fn clear_all_data(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM round_scores", [])?;
        tx.execute("DELETE FROM predictions", [])?;
        tx.execute("DELETE FROM results", [])?;
        tx.execute("DELETE FROM matches", [])?;
        tx.commit()?;
        Ok(())
    }
}
