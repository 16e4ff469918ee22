//! Questling daemon binary.
//!
//! Loads the TOML config (`QUESTLING_CONFIG` overrides the path), wires
//! the token store, gateway client, and runner together, and polls until
//! the process is stopped or the profile fetch fails fatally.

use std::path::PathBuf;

use questling::{QuestClient, QuestConfig, QuestRunner, TokenStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("questling starting");

    let config_path = std::env::var_os("QUESTLING_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(QuestConfig::default_config_path);
    let config = QuestConfig::load_or_default(&config_path).map_err(|e| {
        tracing::error!(path = %config_path.display(), error = %e, "cannot load config");
        anyhow::anyhow!("cannot load config from {}: {e}", config_path.display())
    })?;
    tracing::info!(path = %config_path.display(), "config resolved");

    let token_path = config.token_path();
    tracing::info!(path = %token_path.display(), "token file resolved");
    let store = TokenStore::new(token_path);

    let client = QuestClient::new(config.api.clone(), store);
    let runner = QuestRunner::new(client, config.runner.clone());

    runner.run().await.map_err(|e| {
        tracing::error!(error = %e, "questling exited with error");
        anyhow::anyhow!("questling failed: {e}")
    })?;

    tracing::info!("questling shut down cleanly");
    Ok(())
}
