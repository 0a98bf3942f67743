//! Feature vector construction for the California housing model.
//!
//! The model was trained on eight features in a fixed order; the request
//! body carries them as named JSON fields, and this module rebuilds the
//! ordered vector per request.

use anyhow::{bail, Context, Result};
use serde_json::Value;

/// Number of features the model expects.
pub const FEATURE_COUNT: usize = 8;

/// Input field names, in the exact order the model was trained with.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "MedInc",
    "HouseAge",
    "AveRooms",
    "AveBedrms",
    "Population",
    "AveOccup",
    "Latitude",
    "Longitude",
];

/// Fixed-order feature vector built fresh for each prediction request.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Build a feature vector from a JSON request body.
    ///
    /// Every field must be present and numeric. JSON numbers and numeric
    /// strings are both accepted; anything else is an error naming the
    /// offending field. No defaulting, no range checks.
    pub fn from_json(body: &Value) -> Result<Self> {
        let object = body
            .as_object()
            .context("request body must be a JSON object")?;

        let mut values = [0.0_f64; FEATURE_COUNT];
        for (slot, name) in values.iter_mut().zip(FEATURE_NAMES) {
            let raw = object
                .get(name)
                .with_context(|| format!("missing field `{name}`"))?;
            *slot = coerce_f64(raw).with_context(|| format!("field `{name}` is not a valid number"))?;
        }

        Ok(Self(values))
    }

    /// Construct directly from ordered values.
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// The ordered feature values.
    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// Convert to the f32 layout the ONNX session consumes.
    pub fn to_model_input(&self) -> Vec<f32> {
        self.0.iter().map(|&v| v as f32).collect()
    }
}

fn coerce_f64(value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => n.as_f64().context("number does not fit in an f64"),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| anyhow::anyhow!("`{s}` cannot be parsed as a number")),
        other => bail!("expected a number, got {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_body() -> Value {
        json!({
            "MedInc": 8.3,
            "HouseAge": 41,
            "AveRooms": 6.98,
            "AveBedrms": 1.02,
            "Population": 322,
            "AveOccup": 2.55,
            "Latitude": 37.88,
            "Longitude": -122.23
        })
    }

    #[test]
    fn test_order_is_preserved() {
        let features = FeatureVector::from_json(&sample_body()).unwrap();
        assert_eq!(
            features.values(),
            &[8.3, 41.0, 6.98, 1.02, 322.0, 2.55, 37.88, -122.23]
        );
    }

    #[test]
    fn test_missing_field_is_named() {
        let mut body = sample_body();
        body.as_object_mut().unwrap().remove("AveOccup");

        let err = FeatureVector::from_json(&body).unwrap_err();
        assert!(format!("{err:#}").contains("AveOccup"));
    }

    #[test]
    fn test_numeric_string_is_coerced() {
        let mut body = sample_body();
        body["MedInc"] = json!("8.3");

        let features = FeatureVector::from_json(&body).unwrap();
        assert_eq!(features.values()[0], 8.3);
    }

    #[test]
    fn test_non_numeric_string_is_rejected() {
        let mut body = sample_body();
        body["Latitude"] = json!("north");

        let err = FeatureVector::from_json(&body).unwrap_err();
        assert!(format!("{err:#}").contains("Latitude"));
    }

    #[test]
    fn test_non_scalar_value_is_rejected() {
        let mut body = sample_body();
        body["Population"] = json!([322]);

        assert!(FeatureVector::from_json(&body).is_err());
    }

    #[test]
    fn test_body_must_be_object() {
        assert!(FeatureVector::from_json(&json!([1, 2, 3])).is_err());
    }

    #[test]
    fn test_model_input_is_f32() {
        let features = FeatureVector::from_values([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(features.to_model_input(), vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }
}
