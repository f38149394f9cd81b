use std::process;
use std::sync::Arc;

use clap::{Arg, Command};
use log::{error, info};

use msk_locator::api::{create_router, AppState};
use msk_locator::{dataset, AppConfig, CoordinateTransformer, Result};

fn load_state(config: &AppConfig) -> Result<AppState> {
    let transformer = CoordinateTransformer::with_cache_capacity(&config.zone, config.cache_capacity)?;
    let records = match &config.records {
        Some(path) => dataset::load_records_from_path(path)?,
        None => Vec::new(),
    };

    Ok(AppState {
        transformer,
        records,
        default_radius: config.default_radius,
    })
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = Command::new("api-server")
        .about("Survey point lookup API")
        .arg(
            Arg::new("config")
                .help("TOML configuration file")
                .default_value("msk-locator.toml")
                .index(1),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config").map(String::as_str).unwrap_or("msk-locator.toml");

    let config = match AppConfig::from_path(config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load {}: {}", config_path, e);
            process::exit(1);
        }
    };

    let state = match load_state(&config) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialise: {}", e);
            process::exit(1);
        }
    };

    info!(
        "Zone {} (central meridian {}°E), {} records",
        state.transformer.zone(),
        state.transformer.central_meridian(),
        state.records.len()
    );

    let app = create_router(Arc::new(state));

    let listener = match tokio::net::TcpListener::bind(&config.bind).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", config.bind, e);
            process::exit(1);
        }
    };

    info!("Listening on http://{}", config.bind);
    info!("  GET  /api/search?term=<text>&mode=<contains|exact>&normalize=<bool>");
    info!("  GET  /api/nearby?id=<record id>&radius=<meters>");
    info!("  GET  /api/nearby/location?latitude=<lat>&longitude=<lon>&radius=<meters>");
    info!("  GET  /api/transform?x=<x>&y=<y>&from=<system>&to=<system>");
    info!("  GET  /api/records/<id>");

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        process::exit(1);
    }
}
