//! Central Constants
//!
//! Request field names and artifact defaults shared by the predictor and
//! the HTTP layer.

/// Request field: temperature reading in degrees Celsius
pub const TEMPERATURE_FIELD: &str = "Temperature (°C)";

/// Request field: relative humidity in percent
pub const HUMIDITY_FIELD: &str = "Humidity (%)";

/// Request field: compost material category
pub const MATERIAL_TYPE_FIELD: &str = "Material Type";

/// Numeric fields a reading can provide to the scaler
pub const NUMERIC_FIELDS: &[&str] = &[TEMPERATURE_FIELD, HUMIDITY_FIELD];

/// Categorical fields a reading can provide to the encoder
pub const CATEGORICAL_FIELDS: &[&str] = &[MATERIAL_TYPE_FIELD];

/// Material category used when the request does not name one
pub const DEFAULT_MATERIAL_TYPE: &str = "Food Waste";

// ============================================
// Artifact file names (relative to ARTIFACT_DIR)
// ============================================

pub const MODEL_FILE: &str = "model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const ENCODER_FILE: &str = "encoder.json";
pub const TRAIN_COLUMNS_FILE: &str = "train_columns.json";

/// Default listen port
pub const DEFAULT_PORT: u16 = 5000;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
