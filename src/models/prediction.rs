//! Prediction request/response models

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw sensor reading as posted by the client.
///
/// Values stay untyped until [`crate::predictor::Reading::from_request`]
/// has checked presence, so a missing field and a malformed one produce
/// different errors. JSON `null` deserializes to `None` and counts as missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictRequest {
    #[serde(rename = "Temperature (°C)", default)]
    pub temperature: Option<Value>,

    #[serde(rename = "Humidity (%)", default)]
    pub humidity: Option<Value>,

    #[serde(rename = "Material Type", default)]
    pub material_type: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predicted_days: f64,
}
