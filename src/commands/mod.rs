//! Command implementations for the rugby predictor CLI

pub mod catalog;
pub mod common;
pub mod predictions;
pub mod results;
pub mod standings;


pub use common::{parse_admin_ids, resolve_user_id, CommandContext};
