//! ONNX model loader and session-backed regressor

use crate::features::{FeatureVector, FEATURE_COUNT};
use crate::model::Regressor;
use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use std::sync::RwLock;
use tracing::{debug, info};

/// Regression model backed by an ONNX Runtime session.
///
/// The session needs `&mut` to run, so it sits behind an `RwLock`;
/// everything else is immutable after load.
pub struct OnnxRegressor {
    /// ONNX Runtime session
    session: RwLock<Session>,
    /// Input name for the model
    input_name: String,
    /// Output name for the predicted value
    output_name: String,
}

impl OnnxRegressor {
    /// Load a regression model from an ONNX file.
    pub fn load<P: AsRef<Path>>(path: P, onnx_threads: usize) -> Result<Self> {
        let path = path.as_ref();

        // Initialize ONNX Runtime
        ort::init().commit()?;

        info!(path = %path.display(), threads = onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(onnx_threads)?
            .commit_from_file(path)
            .context(format!("Failed to load model from {:?}", path))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        // skl2onnx names the regression output "variable"
        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "variable".to_string());

        info!(
            input = %input_name,
            output = %output_name,
            "Model loaded successfully"
        );

        Ok(Self {
            session: RwLock::new(session),
            input_name,
            output_name,
        })
    }
}

impl Regressor for OnnxRegressor {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        use ort::value::Tensor;

        // Prepare input tensor - shape [1, num_features]
        let shape = vec![1_i64, FEATURE_COUNT as i64];
        let input_tensor = Tensor::from_array((shape, features.to_model_input()))
            .context("Failed to create input tensor")?;

        let mut session = self
            .session
            .write()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let outputs = session.run(ort::inputs![&self.input_name => input_tensor])?;

        // Preferred output first, then scan all outputs; export layouts
        // differ between converter versions.
        if let Some(output) = outputs.get(&self.output_name) {
            if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
                if let Some(&value) = data.first() {
                    return Ok(value as f64);
                }
            }
        }

        for (name, output) in outputs.iter() {
            if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
                if let Some(&value) = data.first() {
                    debug!(output = %name, "Extracted prediction from fallback output");
                    return Ok(value as f64);
                }
            }
        }

        anyhow::bail!("Model produced no extractable f32 output")
    }
}
