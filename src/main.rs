//! Item form server
//!
//! Reads its configuration from the YAML file named by `ITEM_SERVICE_CONFIG`
//! (defaults otherwise) and serves the item forms from an in-memory store.

use anyhow::Result;
use item_validation::config::AppConfig;
use item_validation::server::ServerBuilder;
use item_validation::storage::InMemoryItemRepository;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env()?;
    let addr = config.socket_addr()?.to_string();
    tracing::info!(
        strategy = ?config.validation.strategy,
        binding_failure = ?config.validation.binding_failure,
        "starting item server"
    );

    ServerBuilder::from_config(&config)?
        .with_repository(InMemoryItemRepository::new())
        .serve(&addr)
        .await
}
