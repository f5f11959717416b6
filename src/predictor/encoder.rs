//! One-Hot Encoder - pre-fitted categorical vocabulary
//!
//! Output columns are named `<feature>_<category>` in vocabulary order,
//! which is how the training frame names them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::artifacts::ArtifactError;
use super::columns::Frame;
use super::{PipelineError, Reading};

/// What to do with a category outside the fitted vocabulary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleUnknown {
    #[default]
    Error,
    /// Emit an all-zero indicator block
    Ignore,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    pub features: Vec<String>,
    pub categories: Vec<Vec<String>>,
    #[serde(default)]
    pub handle_unknown: HandleUnknown,
}

impl OneHotEncoder {
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.features.len() != self.categories.len() {
            return Err(ArtifactError::invalid(
                "encoder",
                format!(
                    "{} features but {} category lists",
                    self.features.len(),
                    self.categories.len()
                ),
            ));
        }
        for (feature, vocab) in self.features.iter().zip(&self.categories) {
            if vocab.is_empty() {
                return Err(ArtifactError::invalid(
                    "encoder",
                    format!("empty vocabulary for '{}'", feature),
                ));
            }
            let mut seen = HashSet::with_capacity(vocab.len());
            if let Some(dup) = vocab.iter().find(|c| !seen.insert(c.as_str())) {
                return Err(ArtifactError::invalid(
                    "encoder",
                    format!("duplicate category '{}' for '{}'", dup, feature),
                ));
            }
        }
        Ok(())
    }

    /// Indicator column names, in output order
    pub fn feature_names_out(&self) -> Vec<String> {
        self.features
            .iter()
            .zip(&self.categories)
            .flat_map(|(feature, vocab)| vocab.iter().map(move |c| format!("{}_{}", feature, c)))
            .collect()
    }

    /// Encode the categorical columns of `reading` against the fitted vocabulary
    pub fn transform(&self, reading: &Reading) -> Result<Frame, PipelineError> {
        let mut frame = Frame::new();

        for (feature, vocab) in self.features.iter().zip(&self.categories) {
            let value = reading
                .categorical(feature)
                .ok_or_else(|| PipelineError::MissingFeature(feature.clone()))?;

            let hit = vocab.iter().position(|c| c == value);
            if hit.is_none() && self.handle_unknown == HandleUnknown::Error {
                return Err(PipelineError::UnknownCategory {
                    feature: feature.clone(),
                    value: value.to_string(),
                });
            }

            for (i, category) in vocab.iter().enumerate() {
                let indicator = if hit == Some(i) { 1.0 } else { 0.0 };
                frame.push(format!("{}_{}", feature, category), indicator);
            }
        }

        Ok(frame)
    }
}
