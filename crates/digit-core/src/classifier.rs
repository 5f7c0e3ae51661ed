//! End-to-end digit classification: preprocess, infer, decode, gate

use crate::config::ClassifierConfig;
use crate::decode::decode_with_scores;
use crate::engine::{InferenceEngine, OnnxEngine};
use crate::gate::{ConfidenceGate, Verdict};
use crate::preprocess::preprocess;
use digit_common::{Prediction, ProcessingError, Result};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A decoded prediction together with its gated verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub prediction: Prediction,
    pub verdict: Verdict,
}

/// Digit classifier owning a loaded inference engine.
///
/// The engine is built once and reused for every image; it is released when
/// the classifier is dropped.
pub struct DigitClassifier<E: InferenceEngine = OnnxEngine> {
    engine: E,
    config: ClassifierConfig,
    gate: ConfidenceGate,
}

impl DigitClassifier<OnnxEngine> {
    /// Load the model named in `config`
    pub fn from_config(config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        let engine = OnnxEngine::load(&config.model_path, config.output_type, config.num_threads)?;
        Self::new(engine, config)
    }
}

impl<E: InferenceEngine> DigitClassifier<E> {
    /// Wrap an existing engine.
    ///
    /// # Errors
    /// `Config` if the config is invalid or declares a different output type
    /// than the engine.
    pub fn new(engine: E, config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        if engine.output_type() != config.output_type {
            return Err(ProcessingError::Config(format!(
                "engine produces {} output but config declares {}",
                engine.output_type(),
                config.output_type
            )));
        }
        let gate = ConfidenceGate::new(config.confidence_threshold)?;

        Ok(Self {
            engine,
            config,
            gate,
        })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn gate(&self) -> &ConfidenceGate {
        &self.gate
    }

    /// Predict using the configured polarity
    pub fn predict(&self, image: &DynamicImage) -> Result<Prediction> {
        self.predict_with(image, self.config.invert_polarity)
    }

    /// Predict with an explicit polarity choice
    pub fn predict_with(&self, image: &DynamicImage, invert_polarity: bool) -> Result<Prediction> {
        let tensor = preprocess(image, invert_polarity);
        let raw = self.engine.run(&tensor)?;

        let declared = self.engine.output_type();
        if raw.output_type() != declared {
            return Err(ProcessingError::OutputTypeMismatch {
                declared,
                detail: format!("engine returned {} scores", raw.output_type()),
            });
        }

        let prediction = decode_with_scores(&raw, self.config.include_scores);
        debug!(
            "Predicted class {:?} with confidence {:.3} ({}x{} input, invert={})",
            prediction.class_index,
            prediction.confidence,
            image.width(),
            image.height(),
            invert_polarity
        );
        Ok(prediction)
    }

    /// Predict and apply the confidence gate
    pub fn classify(&self, image: &DynamicImage) -> Result<Classification> {
        let prediction = self.predict(image)?;
        let verdict = self.gate.evaluate(&prediction);
        Ok(Classification {
            prediction,
            verdict,
        })
    }

    /// Classify several images with the same engine, stopping at the first error
    pub fn classify_batch(&self, images: &[DynamicImage]) -> Result<Vec<Classification>> {
        let mut results = Vec::with_capacity(images.len());
        for image in images {
            results.push(self.classify(image)?);
        }
        Ok(results)
    }
}
