//! Common utilities and helper functions shared across commands.
//!
//! The command context resolves who is calling, whether they are an admin and
//! which database to use, then rebuilds the engine from stored inputs.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::{
    cli::GlobalArgs,
    core::database_path,
    engine::{Authorization, CatalogCheck, EngineConfig, PredictionEngine},
    storage::PredictorDatabase,
    MatchId, PredictorError, Result, RoundId, UserId, ADMINS_ENV_VAR, USER_ID_ENV_VAR,
};

/// Context containing common resources needed by most commands
pub struct CommandContext {
    pub db: PredictorDatabase,
    pub engine: PredictionEngine,
    pub caller: Option<UserId>,
    pub auth: Authorization,
    pub as_json: bool,
}

impl CommandContext {
    /// Open the database, restore the engine and resolve the caller
    pub fn open(args: &GlobalArgs) -> Result<Self> {
        let path = database_path(args.db.clone());
        debug!(path = %path.display(), "opening prediction database");
        let db = PredictorDatabase::open(&path)?;

        let config = EngineConfig {
            strict_catalog: args.strict,
            ..EngineConfig::default()
        };
        let engine = PredictionEngine::restore(config, db.load_inputs()?);

        Ok(Self::from_parts(db, engine, resolve_user_id(args.user).ok(), args.json))
    }

    /// Assemble a context from an already-open database and engine
    pub fn from_parts(
        db: PredictorDatabase,
        engine: PredictionEngine,
        caller: Option<UserId>,
        as_json: bool,
    ) -> Self {
        let auth = caller
            .map(|user| Authorization::from_flag(admin_ids().contains(&user)))
            .unwrap_or(Authorization::Member);
        Self {
            db,
            engine,
            caller,
            auth,
            as_json,
        }
    }

    /// The calling user, required by commands that act on behalf of someone
    pub fn caller(&self) -> Result<UserId> {
        self.caller.ok_or_else(|| PredictorError::MissingUserId {
            env_var: USER_ID_ENV_VAR.to_string(),
        })
    }
}

/// Use the provided user ID, or fall back to the environment
pub fn resolve_user_id(user: Option<UserId>) -> Result<UserId> {
    user.or_else(|| {
        std::env::var(USER_ID_ENV_VAR)
            .ok()
            .and_then(|s| s.parse::<UserId>().ok())
    })
    .ok_or_else(|| PredictorError::MissingUserId {
        env_var: USER_ID_ENV_VAR.to_string(),
    })
}

/// Parse a comma-separated admin list, skipping entries that are not IDs
pub fn parse_admin_ids(raw: &str) -> BTreeSet<UserId> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.parse::<UserId>() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!(entry, "ignoring invalid admin id");
                None
            }
        })
        .collect()
}

/// Admins configured through the environment
pub fn admin_ids() -> BTreeSet<UserId> {
    std::env::var(ADMINS_ENV_VAR)
        .map(|raw| parse_admin_ids(&raw))
        .unwrap_or_default()
}

/// One-line notice for a submission that does not match the catalog
pub fn catalog_notice(check: CatalogCheck, round: RoundId, match_id: &MatchId) -> Option<String> {
    match check {
        CatalogCheck::Listed => None,
        CatalogCheck::UnlistedMatch => Some(format!(
            "⚠ Round {} match {} is not in the match catalog",
            round, match_id
        )),
        CatalogCheck::UnlistedOutcome => Some(format!(
            "⚠ Outcome does not name either team in round {} match {}",
            round, match_id
        )),
    }
}

/// Print `value` as pretty JSON
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
