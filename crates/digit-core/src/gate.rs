//! Confidence gate between a decoded prediction and what a user sees

use digit_common::{Prediction, ProcessingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default acceptance threshold
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.65;

/// Outcome of gating a prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Verdict {
    /// Confidence above the threshold
    Confident { digit: u8, confidence: f32 },
    /// Confidence at or below the threshold, or no prediction at all
    Unknown { confidence: f32 },
}

impl Verdict {
    #[must_use]
    pub fn digit(&self) -> Option<u8> {
        match self {
            Verdict::Confident { digit, .. } => Some(*digit),
            Verdict::Unknown { .. } => None,
        }
    }

    #[must_use]
    pub fn confidence(&self) -> f32 {
        match self {
            Verdict::Confident { confidence, .. } | Verdict::Unknown { confidence } => *confidence,
        }
    }

    #[must_use]
    pub fn is_confident(&self) -> bool {
        matches!(self, Verdict::Confident { .. })
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Confident { digit, confidence } => {
                write!(f, "{digit} (conf={confidence:.2})")
            }
            Verdict::Unknown { confidence } => write!(f, "unknown (conf={confidence:.2})"),
        }
    }
}

/// Accepts predictions whose confidence is strictly above a threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceGate {
    threshold: f32,
}

impl Default for ConfidenceGate {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

impl ConfidenceGate {
    /// Create a gate; `threshold` must lie in [0, 1]
    pub fn new(threshold: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ProcessingError::Config(format!(
                "confidence threshold must be within [0, 1], got {threshold}"
            )));
        }
        Ok(Self { threshold })
    }

    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    #[must_use]
    pub fn evaluate(&self, prediction: &Prediction) -> Verdict {
        match prediction.digit() {
            Some(digit) if prediction.confidence > self.threshold => Verdict::Confident {
                digit,
                confidence: prediction.confidence,
            },
            _ => Verdict::Unknown {
                confidence: prediction.confidence,
            },
        }
    }
}
