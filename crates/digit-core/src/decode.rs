//! Raw model output decoding
//!
//! A model produces either quantized `u8` scores or `f32` probabilities. The
//! layout is carried by the [`RawOutput`] tag so a byte buffer can never be read
//! as floats or the other way round.

use digit_common::{ModelOutputType, Prediction};
use tracing::warn;

/// Scale applied to quantized scores
const QUANTIZED_SCALE: f32 = 255.0;

/// Model output as produced by an inference engine
#[derive(Debug, Clone, PartialEq)]
pub enum RawOutput {
    /// One unsigned byte per class
    Quantized(Vec<u8>),
    /// One probability per class, already normalized by the model
    Float(Vec<f32>),
}

impl RawOutput {
    /// Output layout of this value
    #[must_use]
    pub fn output_type(&self) -> ModelOutputType {
        match self {
            RawOutput::Quantized(_) => ModelOutputType::Quantized,
            RawOutput::Float(_) => ModelOutputType::Float,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            RawOutput::Quantized(bytes) => bytes.len(),
            RawOutput::Float(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Per-class scores in [0, 1].
    ///
    /// Quantized bytes are divided by 255 and not renormalized, so they need not
    /// sum to 1.
    #[must_use]
    pub fn scores(&self) -> Vec<f32> {
        match self {
            RawOutput::Quantized(bytes) => bytes
                .iter()
                .map(|&b| f32::from(b) / QUANTIZED_SCALE)
                .collect(),
            RawOutput::Float(values) => values.clone(),
        }
    }
}

/// Decode raw output into the winning class and its confidence
#[must_use]
pub fn decode(raw: &RawOutput) -> Prediction {
    decode_with_scores(raw, false)
}

/// Decode raw output, optionally keeping the full score vector
#[must_use]
pub fn decode_with_scores(raw: &RawOutput, include_scores: bool) -> Prediction {
    let scores = raw.scores();

    let Some(class_index) = argmax(&scores) else {
        if scores.is_empty() {
            warn!("Model produced an empty {} output", raw.output_type());
        } else {
            warn!(
                "Model produced no finite scores in {} {} values",
                scores.len(),
                raw.output_type()
            );
        }
        return Prediction::none();
    };

    Prediction {
        class_index: Some(class_index),
        confidence: scores[class_index],
        scores: include_scores.then_some(scores),
    }
}

/// Index of the largest finite score; the first one wins on ties.
///
/// NaN and infinite scores are skipped. Returns `None` when no score is finite.
#[must_use]
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        if !score.is_finite() {
            continue;
        }
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(index, _)| index)
}
