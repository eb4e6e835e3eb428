//! Storage layer for the rugby prediction engine
//!
//! Persists the match catalog, predictions, results and the subtotals of the
//! last scoring pass of each round. Totals and the leaderboard are rebuilt
//! from the subtotals by [`PredictionEngine::restore`](crate::engine::PredictionEngine::restore).
//! - `schema`: Database connection and schema management
//! - `queries`: Upserts and the full state load

pub mod queries;
pub mod schema;


pub use schema::PredictorDatabase;
