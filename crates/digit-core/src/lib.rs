//! Digit Core - handwritten digit classification pipeline
//!
//! Turns an arbitrary color image into a 28x28 model input, runs a
//! pre-trained classifier through an [`InferenceEngine`], and decodes the
//! quantized or float output into a digit and a confidence score.
//!
//! # Example
//! ```no_run
//! use digit_core::{load_image, ClassifierConfig, DigitClassifier};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClassifierConfig {
//!     invert_polarity: true,
//!     ..ClassifierConfig::default()
//! };
//! let classifier = DigitClassifier::from_config(config)?;
//!
//! let result = classifier.classify(&load_image("photo.jpg")?)?;
//! println!("{}", result.verdict);
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod config;
pub mod decode;
pub mod engine;
pub mod gate;
pub mod image_io;
pub mod onnx_utils;
pub mod preprocess;

pub use classifier::{Classification, DigitClassifier};
pub use config::ClassifierConfig;
pub use decode::{decode, decode_with_scores, RawOutput};
pub use digit_common::{ModelOutputType, Prediction, ProcessingError, Result, NUM_CLASSES};
pub use engine::{InferenceEngine, OnnxEngine};
pub use gate::{ConfidenceGate, Verdict, DEFAULT_CONFIDENCE_THRESHOLD};
pub use image_io::{load_image, load_image_from_memory};
pub use preprocess::{preprocess, preprocess_rgb, NormalizedTensor, CONTRAST_THRESHOLD, INPUT_SIZE};
