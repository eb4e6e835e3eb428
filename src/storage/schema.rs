//! Database schema and connection management

use crate::error::Result;
use rusqlite::Connection;
use std::path::Path;

/// Database connection manager for engine state
pub struct PredictorDatabase {
    pub(crate) conn: Connection,
}

impl PredictorDatabase {
    /// Open (or create) the database at `path` and ensure tables exist
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure the data directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let mut db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// In-memory database, used by tests
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Initialize the database schema
    pub(crate) fn initialize_schema(&mut self) -> Result<()> {
        // Scorer lists are stored as JSON arrays
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS matches (
                round INTEGER NOT NULL,
                match_id TEXT NOT NULL,
                team1 TEXT NOT NULL,
                team2 TEXT NOT NULL,
                scorers1 TEXT NOT NULL,
                scorers2 TEXT NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (round, match_id)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS predictions (
                user_id INTEGER NOT NULL,
                round INTEGER NOT NULL,
                match_id TEXT NOT NULL,
                outcome TEXT NOT NULL,
                scorers TEXT NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (user_id, round, match_id)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS results (
                round INTEGER NOT NULL,
                match_id TEXT NOT NULL,
                outcome TEXT NOT NULL,
                scorers TEXT NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (round, match_id)
            )",
            [],
        )?;

        // Subtotals from the last scoring pass of each round
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS round_scores (
                round INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                points INTEGER NOT NULL,
                PRIMARY KEY (round, user_id)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_predictions_round
             ON predictions(round, match_id)",
            [],
        )?;

        Ok(())
    }
}
