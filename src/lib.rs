//! Digit Recognition - classify photographed handwritten digits
//!
//! Facade over the workspace crates:
//! - [`common`]: shared error and result types
//! - [`pipeline`]: preprocessing, inference engines, decoding and gating

pub use digit_common as common;
pub use digit_core as pipeline;

pub use digit_core::{
    decode, load_image, preprocess, Classification, ClassifierConfig, ConfidenceGate,
    DigitClassifier, InferenceEngine, ModelOutputType, NormalizedTensor, OnnxEngine, Prediction,
    ProcessingError, RawOutput, Result, Verdict,
};
