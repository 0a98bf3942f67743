//! HTTP server exposing the liveness and prediction endpoints.

use crate::features::FeatureVector;
use crate::metrics::RequestMetrics;
use crate::model::Regressor;
use anyhow::Result;
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Shared state threaded through the handlers.
///
/// `model` is `None` when the artifact failed to load at startup; the
/// service keeps serving, and `/predict` reports the condition instead.
#[derive(Clone)]
pub struct ServerState {
    pub model: Option<Arc<dyn Regressor>>,
    pub metrics: Arc<RequestMetrics>,
}

impl ServerState {
    /// Create server state around an optionally loaded model.
    pub fn new(model: Option<Arc<dyn Regressor>>) -> Self {
        Self {
            model,
            metrics: Arc::new(RequestMetrics::new()),
        }
    }
}

/// Successful prediction payload.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predicted_price: f64,
}

/// The two failure shapes the API exposes.
#[derive(Debug)]
pub enum ApiError {
    /// No model artifact was loaded at startup.
    ModelUnavailable,
    /// Bad request body or a failure during inference.
    BadRequest(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ModelUnavailable => f.write_str("Model not loaded"),
            ApiError::BadRequest(message) => f.write_str(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::ModelUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Build the application router.
pub fn app(state: ServerState) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/predict", post(predict))
        // Permissive CORS policy on all routes
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_origin(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: ServerState, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app(state)).await?;
    Ok(())
}

/// Liveness check, independent of model state.
async fn liveness() -> impl IntoResponse {
    Json(json!({ "message": "House Price Prediction API is running!" }))
}

async fn predict(
    State(state): State<ServerState>,
    body: Bytes,
) -> Result<Json<PredictResponse>, ApiError> {
    let started = Instant::now();

    match run_prediction(&state, &body) {
        Ok(response) => {
            state.metrics.record_success(started.elapsed());
            Ok(Json(response))
        }
        Err(e) => {
            error!(error = %e, "Prediction request failed");
            state.metrics.record_failure();
            Err(e)
        }
    }
}

/// Parse the body, build the feature vector, and run inference.
///
/// Field extraction is checked before model state, so a malformed body
/// reports 400 even when no model is loaded.
fn run_prediction(state: &ServerState, body: &[u8]) -> Result<PredictResponse, ApiError> {
    let json: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {e}")))?;

    let features =
        FeatureVector::from_json(&json).map_err(|e| ApiError::BadRequest(format!("{e:#}")))?;

    let model = state.model.as_ref().ok_or(ApiError::ModelUnavailable)?;

    let predicted_price = model
        .predict(&features)
        .map_err(|e| ApiError::BadRequest(format!("{e:#}")))?;

    Ok(PredictResponse { predicted_price })
}
