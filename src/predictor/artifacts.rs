//! Artifact loading
//!
//! The four training outputs are read once at startup. Any failure here is
//! fatal: the service never starts without a complete, consistent set.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use super::encoder::OneHotEncoder;
use super::regressor::Model;
use super::scaler::StandardScaler;
use crate::constants::{ENCODER_FILE, MODEL_FILE, SCALER_FILE, TRAIN_COLUMNS_FILE};

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid {artifact} artifact: {reason}")]
    Invalid {
        artifact: &'static str,
        reason: String,
    },
}

impl ArtifactError {
    pub fn invalid(artifact: &'static str, reason: impl Into<String>) -> Self {
        ArtifactError::Invalid {
            artifact,
            reason: reason.into(),
        }
    }
}

/// Locations of the four startup artifacts
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub encoder: PathBuf,
    pub train_columns: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            model: dir.join(MODEL_FILE),
            scaler: dir.join(SCALER_FILE),
            encoder: dir.join(ENCODER_FILE),
            train_columns: dir.join(TRAIN_COLUMNS_FILE),
        }
    }
}

/// Raw deserialized artifacts, not yet cross-checked
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub model: Model,
    pub scaler: StandardScaler,
    pub encoder: OneHotEncoder,
    pub train_columns: Vec<String>,
}

impl Artifacts {
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        Ok(Self {
            model: read_json(&paths.model)?,
            scaler: read_json(&paths.scaler)?,
            encoder: read_json(&paths.encoder)?,
            train_columns: read_json(&paths.train_columns)?,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    tracing::info!("Loading artifact: {}", path.display());

    let raw = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
