//! Standard Scaler - pre-fitted numeric standardization
//!
//! Only `transform` exists here. Statistics come from the training run and
//! are never re-derived from incoming readings.

use serde::{Deserialize, Serialize};

use super::artifacts::ArtifactError;
use super::columns::Frame;
use super::{PipelineError, Reading};

/// Fitted standardization parameters, one entry per numeric column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn validate(&self) -> Result<(), ArtifactError> {
        let n = self.feature_names.len();
        if n == 0 {
            return Err(ArtifactError::invalid("scaler", "no features"));
        }
        if self.mean.len() != n || self.scale.len() != n {
            return Err(ArtifactError::invalid(
                "scaler",
                format!(
                    "{} features but {} means and {} scales",
                    n,
                    self.mean.len(),
                    self.scale.len()
                ),
            ));
        }
        if self.mean.iter().chain(&self.scale).any(|v| !v.is_finite()) {
            return Err(ArtifactError::invalid("scaler", "non-finite statistic"));
        }
        Ok(())
    }

    /// Standardize the scaler's columns of `reading`: `(x - mean) / scale`
    pub fn transform(&self, reading: &Reading) -> Result<Frame, PipelineError> {
        let mut frame = Frame::new();

        for ((name, mean), scale) in self.feature_names.iter().zip(&self.mean).zip(&self.scale) {
            let raw = reading
                .numeric(name)
                .ok_or_else(|| PipelineError::MissingFeature(name.clone()))?;
            let scaled = (raw - mean) / effective_scale(*scale);
            if !scaled.is_finite() {
                return Err(PipelineError::OutOfRange {
                    field: name.clone(),
                    value: raw,
                });
            }
            frame.push(name.as_str(), scaled);
        }

        Ok(frame)
    }
}

/// Constant features were fitted with zero variance; leave them unscaled
fn effective_scale(scale: f64) -> f64 {
    if scale == 0.0 { 1.0 } else { scale }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scaler() -> StandardScaler {
        StandardScaler {
            feature_names: vec!["Temperature (°C)".into(), "Humidity (%)".into()],
            mean: vec![30.0, 50.0],
            scale: vec![5.0, 10.0],
        }
    }

    fn reading(temperature: f64, humidity: f64) -> Reading {
        Reading {
            temperature,
            humidity,
            material_type: "Food Waste".into(),
        }
    }

    #[test]
    fn test_transform() {
        let frame = scaler().transform(&reading(35.0, 45.0)).unwrap();
        assert_eq!(frame.get("Temperature (°C)"), Some(1.0));
        assert_eq!(frame.get("Humidity (%)"), Some(-0.5));
    }

    #[test]
    fn test_transform_does_not_refit() {
        // A one-row refit would map every reading to 0.0
        let s = scaler();
        let a = s.transform(&reading(20.0, 50.0)).unwrap();
        let b = s.transform(&reading(40.0, 50.0)).unwrap();
        assert_eq!(a.get("Temperature (°C)"), Some(-2.0));
        assert_eq!(b.get("Temperature (°C)"), Some(2.0));
    }

    #[test]
    fn test_zero_scale_passthrough() {
        let mut s = scaler();
        s.scale[1] = 0.0;
        let frame = s.transform(&reading(30.0, 53.0)).unwrap();
        assert_eq!(frame.get("Humidity (%)"), Some(3.0));
    }

    #[test]
    fn test_overflowing_reading_is_client_error() {
        let mut s = scaler();
        s.scale[0] = 1e-308;
        let err = s.transform(&reading(1e10, 50.0)).unwrap_err();
        assert!(matches!(err, PipelineError::OutOfRange { ref field, .. } if field == "Temperature (°C)"));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_unknown_feature() {
        let mut s = scaler();
        s.feature_names[1] = "pH".into();
        let err = s.transform(&reading(30.0, 50.0)).unwrap_err();
        assert!(matches!(err, PipelineError::MissingFeature(ref f) if f == "pH"));
    }

    #[test]
    fn test_validate_lengths() {
        assert!(scaler().validate().is_ok());

        let mut s = scaler();
        s.mean.pop();
        assert!(s.validate().is_err());

        let mut s = scaler();
        s.scale[0] = f64::NAN;
        assert!(s.validate().is_err());
    }
}
