//! Classifier configuration
//!
//! Loaded from YAML; every field has a default so a file only needs the keys
//! it changes:
//!
//! ```yaml
//! model_path: models/mnist_quant.onnx
//! output_type: quantized
//! invert_polarity: true
//! confidence_threshold: 0.7
//! ```

use crate::gate::DEFAULT_CONFIDENCE_THRESHOLD;
use digit_common::{ModelOutputType, ProcessingError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the classification model
pub const DEFAULT_MODEL_PATH: &str = "models/mnist.onnx";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Path to the ONNX model
    pub model_path: PathBuf,
    /// Element type of the model output
    pub output_type: ModelOutputType,
    /// Invert dark-on-light captures into the light-on-dark training layout
    pub invert_polarity: bool,
    /// Predictions at or below this confidence are reported as unknown
    pub confidence_threshold: f32,
    /// Keep the full per-class score vector in results
    pub include_scores: bool,
    /// ONNX intra-op threads (None = env override or physical cores)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_threads: Option<usize>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            output_type: ModelOutputType::Float,
            invert_polarity: false,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            include_scores: false,
            num_threads: None,
        }
    }
}

impl ClassifierConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml(yaml_path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(yaml_path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(contents)
            .map_err(|e| ProcessingError::Config(format!("Failed to parse YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot honor
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ProcessingError::Config(format!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if self.num_threads == Some(0) {
            return Err(ProcessingError::Config(
                "num_threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
