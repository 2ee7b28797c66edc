use std::sync::Arc;

use actix_web::web;
use tracing_subscriber::EnvFilter;

use crate::domain::error::Result;
use crate::infrastructure::artifact_store::ArtifactStore;
use crate::infrastructure::config::ServerConfig;
use crate::interfaces::http::{start_server, HttpState};

pub fn run() -> Result<()> {
    // A missing .env file is not an error
    let _ = dotenvy::dotenv();

    let config = ServerConfig::load()?;
    init_tracing(&config.log_filter);

    let store = Arc::new(ArtifactStore::open(&config.plot_dir)?);
    tracing::info!(
        host = %config.host,
        port = config.port,
        plot_dir = %store.root().display(),
        "Starting plotsheet"
    );

    let state = web::Data::new(HttpState::new(config, store));
    actix_web::rt::System::new().block_on(async move { start_server(state)?.await })?;

    tracing::info!("Server stopped");
    Ok(())
}

/// `RUST_LOG` wins over the configured filter.
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
