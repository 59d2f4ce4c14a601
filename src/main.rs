use std::env;

use tax_engine::api::{AppState, create_router};
use tax_engine::config::{ConfigLoader, TaxTables};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let tables = match env::var("TAX_ENGINE_CONFIG") {
        Ok(path) => {
            tracing::info!("Loading tax tables from {}", path);
            ConfigLoader::load(&path)?.into_tables()
        }
        Err(_) => TaxTables::statutory().clone(),
    };

    tracing::info!(
        "Using tax tables {} ({}), effective {}",
        tables.jurisdiction().code,
        tables.jurisdiction().version,
        tables.jurisdiction().effective_date
    );

    let addr = env::var("TAX_ENGINE_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, create_router(AppState::new(tables))).await?;
    Ok(())
}
