//! Result submission, rescoring and reset commands

use serde::Serialize;

use super::common::{catalog_notice, print_json, CommandContext};
use crate::{
    cli::MatchCall,
    engine::{MatchResult, Receipt, RoundScoring},
    Result, RoundId,
};

#[derive(Serialize)]
struct SubmittedResult<'a> {
    result: &'a Receipt<MatchResult>,
    scoring: &'a RoundScoring,
}

/// Summary of a rescoring pass
pub fn format_scoring(scoring: &RoundScoring) -> String {
    let mut lines = vec![format!(
        "Round {} scored: {} results, {} users",
        scoring.round,
        scoring.matches_scored,
        scoring.awarded.len()
    )];
    for (user, points) in &scoring.awarded {
        lines.push(format!("  {} - {} pts", user, points));
    }
    lines.join("\n")
}

/// Handle the submit-result command
pub fn handle_submit_result(ctx: &mut CommandContext, call: MatchCall) -> Result<()> {
    let (scorer1, scorer2) = call.scorers();
    let (receipt, scoring) = ctx.engine.submit_result(
        ctx.auth,
        call.round,
        call.match_id.clone(),
        call.outcome.clone(),
        scorer1,
        scorer2,
    )?;
    ctx.db.upsert_result(&receipt.record)?;
    ctx.db.replace_round_scores(scoring.round, &scoring.awarded)?;

    if ctx.as_json {
        return print_json(&SubmittedResult {
            result: &receipt,
            scoring: &scoring,
        });
    }

    let scorers: Vec<&str> = receipt.record.scorers.iter().map(String::as_str).collect();
    println!(
        "Result recorded: {} for match {} (Round {}), Try scorers: {}",
        receipt.record.outcome,
        receipt.record.match_id,
        receipt.record.round,
        scorers.join(", ")
    );
    if let Some(notice) = catalog_notice(receipt.catalog, call.round, &call.match_id) {
        println!("{}", notice);
    }
    println!("{}", format_scoring(&scoring));
    Ok(())
}

/// Handle the rescore command
pub fn handle_rescore(ctx: &mut CommandContext, round: Option<RoundId>) -> Result<()> {
    ctx.auth.require_admin("rescore")?;

    let passes = match round {
        Some(round) => vec![ctx.engine.rescore_round(round)],
        None => ctx.engine.rescore_all(),
    };
    for scoring in &passes {
        ctx.db.replace_round_scores(scoring.round, &scoring.awarded)?;
    }

    if ctx.as_json {
        return print_json(&passes);
    }
    if passes.is_empty() {
        println!("Nothing to rescore");
    }
    for scoring in &passes {
        println!("{}", format_scoring(scoring));
    }
    Ok(())
}

/// Handle the reset command
pub fn handle_reset(ctx: &mut CommandContext) -> Result<()> {
    ctx.engine.reset(ctx.auth)?;
    ctx.db.clear_all_data()?;
    println!("✓ All prediction data cleared");
    Ok(())
}
