//! Leaderboard and rank commands

use super::common::{print_json, CommandContext};
use crate::{engine::Standing, PredictorError, Result};

pub fn format_leaderboard(standings: &[Standing]) -> String {
    if standings.is_empty() {
        return "Leaderboard is empty".to_string();
    }

    let mut message = String::from("Leaderboard:");
    for standing in standings {
        message.push_str(&format!(
            "\n{}. {} - {} pts",
            standing.rank, standing.user, standing.points
        ));
    }
    message
}

/// Handle the leaderboard command
pub fn handle_leaderboard(ctx: &CommandContext, top: Option<usize>) -> Result<()> {
    let size = top.unwrap_or(ctx.engine.config().leaderboard_size);
    let standings = ctx.engine.top(size);
    if ctx.as_json {
        return print_json(&standings);
    }
    println!("{}", format_leaderboard(&standings));
    Ok(())
}

/// Handle the my-rank command
pub fn handle_my_rank(ctx: &CommandContext) -> Result<()> {
    let user = ctx.caller()?;
    match ctx.engine.rank_of(user) {
        Ok(standing) => {
            if ctx.as_json {
                return print_json(&standing);
            }
            println!("Your rank: {}, Points: {}", standing.rank, standing.points);
            Ok(())
        }
        Err(PredictorError::NotFound { .. }) => {
            if ctx.as_json {
                return print_json(&serde_json::json!({ "user": user, "rank": null }));
            }
            println!("Your rank: unranked, Points: 0");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
