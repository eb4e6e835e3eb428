//! Entry point: parse CLI and dispatch to command handlers.

use anyhow::Context;
use clap::Parser;
use rugby_predictor::{
    cli::{Commands, Predictor},
    commands::{
        catalog::{handle_matches, handle_upload_catalog},
        predictions::handle_predict,
        results::{handle_rescore, handle_reset, handle_submit_result},
        standings::{handle_leaderboard, handle_my_rank},
        CommandContext,
    },
};
use tracing::Level;

/// Run the CLI.
fn main() -> anyhow::Result<()> {
    let app = Predictor::parse();

    tracing_subscriber::fmt()
        .with_max_level(if app.global.verbose {
            Level::DEBUG
        } else {
            Level::WARN
        })
        .with_writer(std::io::stderr)
        .init();

    let mut ctx =
        CommandContext::open(&app.global).context("Failed to open the prediction database")?;

    match app.command {
        Commands::UploadCatalog { file } => handle_upload_catalog(&mut ctx, &file)
            .with_context(|| format!("Failed to upload {}", file.display()))?,
        Commands::Matches { round } => handle_matches(&ctx, round)?,
        Commands::Predict { call } => handle_predict(&mut ctx, call)?,
        Commands::SubmitResult { call } => handle_submit_result(&mut ctx, call)?,
        Commands::Rescore { round } => handle_rescore(&mut ctx, round)?,
        Commands::Leaderboard { top } => handle_leaderboard(&ctx, top)?,
        Commands::MyRank => handle_my_rank(&ctx)?,
        Commands::Reset => handle_reset(&mut ctx)?,
    }

    Ok(())
}
