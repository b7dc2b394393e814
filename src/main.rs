use anyhow::{Context, Result};
use tracing::info;

use viajeia::providers::http_client;
use viajeia::{AppState, TripPlanner, VERSION, ViajeConfig, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = ViajeConfig::load().context("Failed to load configuration")?;
    logging::init(&config.logging);
    info!("Starting ViajeIA {}", VERSION);
    config.log_missing_credentials();

    let client = http_client(&config.http)?;
    let planner = TripPlanner::from_config(&config, &client)?;

    web::run(&config, AppState::new(planner)).await
}
