//! HTTP server for the Overtime Report Engine.

use std::env;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use overtime_engine::api::{AppState, create_router};
use overtime_engine::config::ConfigLoader;
use overtime_engine::models::HolidaySet;
use overtime_engine::storage::JsonFileRepository;

const DEFAULT_CONFIG_DIR: &str = "./config/default";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_dir = env::var("OVERTIME_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.into());
    let config = ConfigLoader::load(&config_dir)?;

    let repository = JsonFileRepository::open(config.records_path())?;
    // Dates flagged in the history file count as holidays too.
    let holidays = HolidaySet::from_dates(
        config
            .holiday_set()
            .iter()
            .chain(repository.festive_days()?),
    );

    let address = config.server_address();
    let state = AppState::new(config, Arc::new(repository)).with_holidays(holidays);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(address = %address, "Overtime report engine listening");
    axum::serve(listener, router).await?;

    Ok(())
}
