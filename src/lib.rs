//! House Price Prediction API Library
//!
//! Loads a pre-trained ONNX regression model for California housing data
//! and serves point predictions over a small HTTP surface.

pub mod config;
pub mod features;
pub mod http_server;
pub mod metrics;
pub mod model;

pub use config::AppConfig;
pub use features::FeatureVector;
pub use http_server::ServerState;
pub use model::{OnnxRegressor, Regressor};
