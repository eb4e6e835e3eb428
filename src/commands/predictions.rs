//! Prediction command

use super::common::{catalog_notice, print_json, CommandContext};
use crate::{cli::MatchCall, engine::Prediction, Result};

/// Confirmation line echoed back to the user
pub fn format_prediction(prediction: &Prediction) -> String {
    let scorers: Vec<&str> = prediction.scorers.iter().map(String::as_str).collect();
    format!(
        "Prediction recorded: {} for match {} (Round {}), Try scorers: {}",
        prediction.outcome,
        prediction.match_id,
        prediction.round,
        if scorers.is_empty() {
            "none".to_string()
        } else {
            scorers.join(", ")
        }
    )
}

/// Handle the predict command
pub fn handle_predict(ctx: &mut CommandContext, call: MatchCall) -> Result<()> {
    let user = ctx.caller()?;
    let (scorer1, scorer2) = call.scorers();
    let receipt = ctx.engine.submit_prediction(
        user,
        call.round,
        call.match_id.clone(),
        call.outcome.clone(),
        scorer1,
        scorer2,
    )?;
    ctx.db.upsert_prediction(&receipt.record)?;

    if ctx.as_json {
        return print_json(&receipt);
    }
    println!("{}", format_prediction(&receipt.record));
    if let Some(notice) = catalog_notice(receipt.catalog, call.round, &call.match_id) {
        println!("{}", notice);
    }
    Ok(())
}
