//! Readiness Predictor - compost readiness inference
//!
//! Request → Reading → scale + encode → reconcile to train columns → model.
//! All fitted objects are loaded once and only ever read afterwards, so a
//! single `Arc<ReadinessPredictor>` serves every request without locking.

pub mod artifacts;
pub mod columns;
pub mod encoder;
pub mod reading;
pub mod regressor;
pub mod scaler;

pub use artifacts::{ArtifactError, ArtifactPaths, Artifacts};
pub use columns::{FeatureVector, TrainColumns};
pub use encoder::OneHotEncoder;
pub use reading::Reading;
pub use regressor::Regressor;
pub use scaler::StandardScaler;

use serde::Serialize;
use thiserror::Error;

use crate::constants::{CATEGORICAL_FIELDS, NUMERIC_FIELDS};
use crate::models::PredictRequest;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Missing required input fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Field '{field}' must be a number, got {value}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Field '{field}' must be a string, got {value}")]
    InvalidCategory { field: &'static str, value: String },

    #[error("Field '{field}' value {value} is out of range for the fitted scaler")]
    OutOfRange { field: String, value: f64 },

    #[error("Unknown category '{value}' for '{feature}'")]
    UnknownCategory { feature: String, value: String },

    #[error("reading has no value for feature '{0}'")]
    MissingFeature(String),

    #[error("feature vector has {actual} columns, model reads {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("model produced a non-finite prediction ({0})")]
    NonFinitePrediction(f64),
}

impl PipelineError {
    /// Caused by the request rather than by the artifacts
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PipelineError::MissingFields(_)
                | PipelineError::InvalidNumber { .. }
                | PipelineError::InvalidCategory { .. }
                | PipelineError::OutOfRange { .. }
                | PipelineError::UnknownCategory { .. }
        )
    }
}

// ============================================================================
// PREDICTOR
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub predicted_days: f64,
}

pub struct ReadinessPredictor {
    scaler: StandardScaler,
    encoder: OneHotEncoder,
    columns: TrainColumns,
    model: Box<dyn Regressor>,
    default_material: String,
}

impl ReadinessPredictor {
    /// Assemble a predictor from already-validated parts.
    ///
    /// Checks that every fitted column can be fed from a reading and that
    /// the model does not read past the train column layout.
    pub fn new(
        scaler: StandardScaler,
        encoder: OneHotEncoder,
        columns: TrainColumns,
        model: Box<dyn Regressor>,
        default_material: impl Into<String>,
    ) -> Result<Self, ArtifactError> {
        if let Some(f) = scaler
            .feature_names
            .iter()
            .find(|f| !NUMERIC_FIELDS.contains(&f.as_str()))
        {
            return Err(ArtifactError::invalid(
                "scaler",
                format!("'{}' is not a numeric request field", f),
            ));
        }
        if let Some(f) = encoder
            .features
            .iter()
            .find(|f| !CATEGORICAL_FIELDS.contains(&f.as_str()))
        {
            return Err(ArtifactError::invalid(
                "encoder",
                format!("'{}' is not a categorical request field", f),
            ));
        }
        if model.n_features() > columns.len() {
            return Err(ArtifactError::invalid(
                "model",
                format!(
                    "model reads {} features, train columns have {}",
                    model.n_features(),
                    columns.len()
                ),
            ));
        }

        let produced = scaler.feature_names.iter().cloned().chain(encoder.feature_names_out());
        for name in produced.filter(|n| !columns.contains(n)) {
            tracing::warn!("Column '{}' is not in train columns and will be dropped", name);
        }

        Ok(Self {
            scaler,
            encoder,
            columns,
            model,
            default_material: default_material.into(),
        })
    }

    /// Load, validate and cross-check all startup artifacts
    pub fn load(paths: &ArtifactPaths, default_material: &str) -> Result<Self, ArtifactError> {
        let Artifacts {
            model,
            scaler,
            encoder,
            train_columns,
        } = Artifacts::load(paths)?;

        scaler.validate()?;
        encoder.validate()?;
        let columns = TrainColumns::new(train_columns)?;
        model.validate(columns.len())?;

        tracing::info!(
            "Model loaded: {} ({} columns, layout {:08x})",
            model.kind(),
            columns.len(),
            columns.layout_hash()
        );

        Self::new(scaler, encoder, columns, model.into_regressor(), default_material)
    }

    pub fn columns(&self) -> &TrainColumns {
        &self.columns
    }

    /// Full request path: validate, preprocess, infer, round
    pub fn predict(&self, req: PredictRequest) -> Result<PredictionResult, PipelineError> {
        let reading = Reading::from_request(req, &self.default_material)?;
        let features = self.prepare_features(&reading)?;
        let raw = self.infer(&features)?;

        let predicted_days = round2(raw);
        tracing::debug!(
            temperature = reading.temperature,
            humidity = reading.humidity,
            material = %reading.material_type,
            predicted_days,
            "Prediction served"
        );

        Ok(PredictionResult { predicted_days })
    }

    /// Scale, encode, concatenate and reconcile one reading
    pub fn prepare_features(&self, reading: &Reading) -> Result<FeatureVector, PipelineError> {
        let scaled = self.scaler.transform(reading)?;
        let encoded = self.encoder.transform(reading)?;
        Ok(self.columns.reconcile(&scaled.concat(encoded)))
    }

    pub fn infer(&self, features: &FeatureVector) -> Result<f64, PipelineError> {
        if features.len() != self.columns.len() || features.len() < self.model.n_features() {
            return Err(PipelineError::ShapeMismatch {
                expected: self.columns.len(),
                actual: features.len(),
            });
        }

        let prediction = self.model.predict_row(features.as_slice());
        if !prediction.is_finite() {
            return Err(PipelineError::NonFinitePrediction(prediction));
        }
        Ok(prediction)
    }
}

/// Round to 2 decimal places.
/// Values too large to scale by 100 have no fractional part and pass through.
pub fn round2(value: f64) -> f64 {
    let cents = value * 100.0;
    if cents.is_finite() {
        cents.round() / 100.0
    } else {
        value
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================


// ============================================================================
// TESTS
// ============================================================================
