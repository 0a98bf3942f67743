//! Regression model loading and inference

pub mod loader;

pub use loader::OnnxRegressor;

use crate::features::FeatureVector;
use anyhow::Result;

/// A loaded regression model mapping a feature vector to a price.
///
/// The HTTP layer depends on this trait rather than the concrete ONNX
/// session, so handlers can be exercised without a model file on disk.
pub trait Regressor: Send + Sync {
    /// Run inference on a single feature vector.
    fn predict(&self, features: &FeatureVector) -> Result<f64>;
}
