//! Catalog upload and listing commands

use std::{collections::BTreeMap, path::Path};

use super::common::{print_json, CommandContext};
use crate::{
    core::read_upload,
    engine::{parse_catalog_csv, Match},
    Result, RoundId,
};

/// Handle the upload-catalog command
pub fn handle_upload_catalog(ctx: &mut CommandContext, file: &Path) -> Result<()> {
    ctx.auth.require_admin("upload-catalog")?;

    let text = read_upload(file)?;
    let rows = parse_catalog_csv(&text)?;
    let loaded = ctx.engine.load_catalog(ctx.auth, rows)?;

    let rounds: BTreeMap<RoundId, Vec<Match>> = loaded
        .keys()
        .map(|round| (*round, ctx.engine.matches(*round)))
        .collect();
    ctx.db.upsert_catalog(&rounds)?;

    let total: usize = loaded.values().sum();
    println!(
        "✓ Match data uploaded: {} matches across {} rounds",
        total,
        loaded.len()
    );
    Ok(())
}

/// Text listing of a round's matches
pub fn format_matches(round: RoundId, matches: &[Match]) -> String {
    if matches.is_empty() {
        return format!("No matches uploaded for round {}", round);
    }

    let mut lines = vec![format!("Round {}:", round)];
    for game in matches {
        let [home, away] = &game.teams;
        lines.push(format!("{}. {} vs {}", game.id, home.name, away.name));
        for team in [home, away] {
            lines.push(format!(
                "   {}: {}",
                team.name,
                team.eligible_scorers.join(", ")
            ));
        }
    }
    lines.join("\n")
}

/// Handle the matches command
pub fn handle_matches(ctx: &CommandContext, round: RoundId) -> Result<()> {
    let matches = ctx.engine.matches(round);
    if ctx.as_json {
        return print_json(&matches);
    }
    println!("{}", format_matches(round, &matches));
    Ok(())
}
