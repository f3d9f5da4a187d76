//! Map validated CLI arguments to the action to run.

use crate::cli::{
    actions::{server::Args, Action},
    commands::{ARG_DSN, ARG_LEGACY_STATUS, ARG_MAX_CONNECTIONS, ARG_PORT},
};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(5000);
    let dsn = matches
        .get_one::<String>(ARG_DSN)
        .cloned()
        .context("missing required argument: --dsn")?;
    let max_connections = matches
        .get_one::<u32>(ARG_MAX_CONNECTIONS)
        .copied()
        .unwrap_or(5);

    Ok(Action::Server(Args {
        port,
        dsn: SecretString::from(dsn),
        max_connections,
        legacy_status: matches.get_flag(ARG_LEGACY_STATUS),
    }))
}
