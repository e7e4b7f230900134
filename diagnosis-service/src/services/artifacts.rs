//! Startup loading of the trained model artifacts.
//!
//! Three JSON files live in the artifact directory, one per artifact the
//! training pipeline exports: the classifier (`classifier.json`), the label
//! encoder (`label_encoder.json`) and the ordered feature-name list
//! (`features.json`). Loading is fail-fast: any missing file, parse error or
//! cross-artifact mismatch aborts startup instead of leaving the process
//! half-initialized.

use crate::tree::DecisionTree;
use serde::Deserialize;
use service_core::error::AppError;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const CLASSIFIER_FILE: &str = "classifier.json";
pub const LABEL_ENCODER_FILE: &str = "label_encoder.json";
pub const FEATURES_FILE: &str = "features.json";

#[derive(Debug, Deserialize)]
struct LabelEncoder {
    classes: Vec<String>,
}

/// The immutable model state shared read-only across all requests.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub tree: DecisionTree,
    pub classes: Vec<String>,
    pub feature_names: Vec<String>,
}

impl ModelArtifacts {
    /// Load and cross-validate all three artifacts from `dir`.
    pub fn load(dir: &Path) -> Result<Self, AppError> {
        let tree: DecisionTree = read_json(dir, CLASSIFIER_FILE)?;
        let encoder: LabelEncoder = read_json(dir, LABEL_ENCODER_FILE)?;
        let feature_names: Vec<String> = read_json(dir, FEATURES_FILE)?;

        if encoder.classes.is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "label encoder in {} lists no classes",
                dir.display()
            )));
        }

        tree.validate(feature_names.len(), encoder.classes.len())
            .map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "classifier in {} failed validation: {}",
                    dir.display(),
                    e
                ))
            })?;

        Ok(Self {
            tree,
            classes: encoder.classes,
            feature_names,
        })
    }
}

fn read_json<T: serde::de::DeserializeOwned>(dir: &Path, name: &str) -> Result<T, AppError> {
    let path = dir.join(name);
    let file = File::open(&path).map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("failed to open {}: {}", path.display(), e))
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("failed to parse {}: {}", path.display(), e))
    })
}
