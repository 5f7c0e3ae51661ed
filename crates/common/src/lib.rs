/// Common types and utilities for digit recognition
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of digit classes produced by the model
pub const NUM_CLASSES: usize = 10;

/// Processing errors
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Model file not found: {0}")]
    ModelNotFound(String),

    #[error("Failed to load model from {path}: {error}")]
    ModelLoad { path: String, error: String },

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Model output does not match declared {declared} layout: {detail}")]
    OutputTypeMismatch {
        declared: ModelOutputType,
        detail: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageError(String),
}

impl From<image::ImageError> for ProcessingError {
    fn from(err: image::ImageError) -> Self {
        ProcessingError::ImageError(err.to_string())
    }
}

impl From<ort::Error> for ProcessingError {
    fn from(err: ort::Error) -> Self {
        ProcessingError::Inference(err.to_string())
    }
}

/// Result type for processing operations
pub type Result<T> = std::result::Result<T, ProcessingError>;

/// Element type of the model's output tensor.
///
/// Declared when the engine is built; it is never sniffed from the model file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelOutputType {
    /// Unsigned 8-bit scores, rescaled by 1/255
    Quantized,
    /// 32-bit float probabilities
    #[default]
    Float,
}

impl fmt::Display for ModelOutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelOutputType::Quantized => write!(f, "quantized"),
            ModelOutputType::Float => write!(f, "float"),
        }
    }
}

impl std::str::FromStr for ModelOutputType {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quantized" | "uint8" | "u8" => Ok(ModelOutputType::Quantized),
            "float" | "float32" | "f32" => Ok(ModelOutputType::Float),
            other => Err(ProcessingError::Config(format!(
                "unknown model output type '{other}' (expected 'quantized' or 'float')"
            ))),
        }
    }
}

/// Decoded model output: the winning class and its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Winning class index, `None` when the model produced no scores
    pub class_index: Option<usize>,
    /// Score of the winning class (0.0 - 1.0)
    pub confidence: f32,
    /// Per-class scores (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<Vec<f32>>,
}

impl Prediction {
    /// Prediction for an empty output sequence
    #[must_use]
    pub fn none() -> Self {
        Self {
            class_index: None,
            confidence: 0.0,
            scores: None,
        }
    }

    /// The predicted digit, if the class index maps to 0-9
    #[must_use]
    pub fn digit(&self) -> Option<u8> {
        self.class_index
            .filter(|&i| i < NUM_CLASSES)
            .map(|i| i as u8)
    }
}
