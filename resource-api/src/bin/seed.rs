//! Load the fixed set of crisis resources into the database.
//! Existing rows are left untouched, so it is safe to run repeatedly.
//!
//! Usage:
//!   DATABASE_URL=postgres://... cargo run --bin seed

use envconfig::Envconfig;
use eyre::{Result, WrapErr};
use tracing::info;
use tracing_subscriber::EnvFilter;

use resource_api::config::Config;
use resource_api::seed::seed_store;
use resource_api::store::{PgResourceStore, ResourceStore, StoreError};

async fn run(store: &PgResourceStore) -> Result<(), StoreError> {
    store.migrate().await?;
    let report = seed_store(store).await?;
    store.sync_id_sequence().await?;

    info!(
        inserted = report.inserted,
        skipped = report.skipped,
        "Seed data inserted!"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::init_from_env().wrap_err("invalid configuration")?;

    let store = PgResourceStore::connect(&config)
        .await
        .wrap_err("failed to connect to the resource store")?;

    let result = run(&store).await;
    store.close().await;

    result.wrap_err("failed to seed resources")
}
