use crate::{
    accounts::storage,
    api::{self, ApiConfig},
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: SecretString,
    pub max_connections: u32,
    pub legacy_status: bool,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the storage backend cannot be reached or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    debug!("Server args: {:?}", args);

    let dsn = args.dsn.expose_secret();
    let scheme = Url::parse(dsn)
        .map(|url| url.scheme().to_string())
        .context("Invalid database connection string")?;

    let storage = storage::connect(dsn, args.max_connections)
        .await
        .with_context(|| format!("Could not initialize {scheme} storage"))?;

    info!("Using {} storage", scheme);

    let config = ApiConfig::new().with_legacy_status(args.legacy_status);

    api::new(args.port, storage, config).await
}
