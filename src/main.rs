//! House Price Prediction API - Main Entry Point
//!
//! Loads a pre-trained ONNX regression model and serves predictions over HTTP.

use anyhow::Result;
use house_price_api::{
    config::AppConfig,
    http_server::{self, ServerState},
    metrics::MetricsReporter,
    model::{OnnxRegressor, Regressor},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration; a missing or broken config file falls back to
    // defaults so the service still comes up.
    let (config, config_err) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "house_price_api={}",
                    config.logging.level
                ))
            }),
        )
        .init();

    info!("Starting House Price Prediction API");

    if let Some(e) = config_err {
        warn!(error = %e, "Failed to load config/config.toml, using default configuration");
    } else {
        info!("Configuration loaded successfully");
    }

    // Load the model artifact once. Load failure is not fatal: the service
    // stays up and /predict reports the model-unavailable condition.
    let model: Option<Arc<dyn Regressor>> =
        match OnnxRegressor::load(&config.model.path, config.model.onnx_threads) {
            Ok(model) => {
                info!(path = %config.model.path, "Model loaded successfully");
                Some(Arc::new(model))
            }
            Err(e) => {
                warn!(
                    path = %config.model.path,
                    error = %e,
                    "Model not loaded, /predict will report model-unavailable"
                );
                None
            }
        };

    let state = ServerState::new(model);

    // Start metrics reporter (logs a summary every 30 seconds)
    let metrics = state.metrics.clone();
    tokio::spawn(async move {
        MetricsReporter::new(metrics, 30).start().await;
    });

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    http_server::serve(state, addr).await
}
