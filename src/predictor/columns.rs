//! Train Columns - authoritative feature layout
//!
//! The model only understands vectors laid out exactly as the training
//! frame was. Everything produced by the scaler and encoder goes through
//! [`TrainColumns::reconcile`] before inference:
//! 1. Columns unknown to the layout are dropped
//! 2. Layout columns nobody produced are filled with 0
//! 3. Output order is the layout order

use std::collections::HashMap;

use crc32fast::Hasher;

use super::artifacts::ArtifactError;

// ============================================================================
// FRAME (named, ordered, single row)
// ============================================================================

/// Single-row frame of named columns, in production order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    columns: Vec<(String, f64)>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: f64) {
        self.columns.push((name.into(), value));
    }

    /// Append all columns of `other` after ours
    pub fn concat(mut self, other: Frame) -> Self {
        self.columns.extend(other.columns);
        self
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    #[cfg(test)]
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.columns.len()
    }
}

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Model input row, guaranteed to follow the train column layout
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

// ============================================================================
// TRAIN COLUMNS
// ============================================================================

#[derive(Debug, Clone)]
pub struct TrainColumns {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl TrainColumns {
    /// Build the layout; rejects empty lists and duplicate names
    pub fn new(names: Vec<String>) -> Result<Self, ArtifactError> {
        if names.is_empty() {
            return Err(ArtifactError::invalid("train_columns", "column list is empty"));
        }

        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(ArtifactError::invalid(
                    "train_columns",
                    format!("duplicate column '{}'", name),
                ));
            }
        }

        Ok(Self { names, index })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// CRC32 over the ordered column names (null separated).
    /// Any rename or reorder changes the fingerprint.
    pub fn layout_hash(&self) -> u32 {
        let mut hasher = Hasher::new();
        for name in &self.names {
            hasher.update(name.as_bytes());
            hasher.update(&[0]);
        }
        hasher.finalize()
    }

    /// Project a frame onto the training layout
    pub fn reconcile(&self, frame: &Frame) -> FeatureVector {
        let mut values = vec![0.0; self.names.len()];

        for (name, value) in &frame.columns {
            match self.index.get(name) {
                Some(&i) => values[i] = *value,
                None => tracing::trace!("Dropping column not seen in training: {}", name),
            }
        }

        FeatureVector(values)
    }
}

// ============================================================================
// TESTS
// ============================================================================
