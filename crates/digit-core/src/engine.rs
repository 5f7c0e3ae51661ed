//! Inference engines
//!
//! An engine maps one [`NormalizedTensor`] to one [`RawOutput`]. The model
//! handle is acquired when the engine is built and released when it is
//! dropped, so a single engine should be reused for every request.

use crate::decode::RawOutput;
use crate::onnx_utils::create_session;
use crate::preprocess::NormalizedTensor;
use digit_common::{ModelOutputType, ProcessingError, Result, NUM_CLASSES};
use ort::session::Session;
use ort::value::TensorRef;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Tensor-in, scores-out model boundary
pub trait InferenceEngine {
    /// Output layout this engine was declared with
    fn output_type(&self) -> ModelOutputType;

    /// Run the model on one preprocessed image
    fn run(&self, input: &NormalizedTensor) -> Result<RawOutput>;
}

impl<E: InferenceEngine + ?Sized> InferenceEngine for &E {
    fn output_type(&self) -> ModelOutputType {
        (**self).output_type()
    }

    fn run(&self, input: &NormalizedTensor) -> Result<RawOutput> {
        (**self).run(input)
    }
}

impl<E: InferenceEngine + ?Sized> InferenceEngine for Box<E> {
    fn output_type(&self) -> ModelOutputType {
        (**self).output_type()
    }

    fn run(&self, input: &NormalizedTensor) -> Result<RawOutput> {
        (**self).run(input)
    }
}

/// ONNX Runtime backed engine
pub struct OnnxEngine {
    session: Mutex<Session>,
    output_type: ModelOutputType,
    input_name: String,
    model_path: PathBuf,
}

impl OnnxEngine {
    /// Load the model once.
    ///
    /// # Errors
    /// A missing or corrupt model is reported as `ModelNotFound` / `ModelLoad`.
    /// Both are fatal; loading is not retried.
    pub fn load<P: AsRef<Path>>(
        model_path: P,
        output_type: ModelOutputType,
        num_threads: Option<usize>,
    ) -> Result<Self> {
        let model_path = model_path.as_ref();
        info!(
            "Loading digit model from {} ({} output)",
            model_path.display(),
            output_type
        );

        let session = create_session(model_path, num_threads)?;

        let input_name = session
            .inputs
            .first()
            .ok_or_else(|| ProcessingError::ModelLoad {
                path: model_path.display().to_string(),
                error: "model has no inputs".to_string(),
            })?
            .name
            .clone();
        if session.outputs.is_empty() {
            return Err(ProcessingError::ModelLoad {
                path: model_path.display().to_string(),
                error: "model has no outputs".to_string(),
            });
        }

        Ok(Self {
            session: Mutex::new(session),
            output_type,
            input_name,
            model_path: model_path.to_path_buf(),
        })
    }

    #[must_use]
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl InferenceEngine for OnnxEngine {
    fn output_type(&self) -> ModelOutputType {
        self.output_type
    }

    fn run(&self, input: &NormalizedTensor) -> Result<RawOutput> {
        let start = Instant::now();
        let input = input.to_model_input();

        let mut session = self
            .session
            .lock()
            .map_err(|_| ProcessingError::Inference("session lock poisoned".to_string()))?;
        let input_tensor = TensorRef::from_array_view(input.view())?;
        let outputs = session.run(ort::inputs![self.input_name.as_str() => input_tensor])?;

        let mismatch = |e: ort::Error| ProcessingError::OutputTypeMismatch {
            declared: self.output_type,
            detail: e.to_string(),
        };
        let raw = match self.output_type {
            ModelOutputType::Quantized => {
                let (_shape, data) = outputs[0].try_extract_tensor::<u8>().map_err(mismatch)?;
                RawOutput::Quantized(data.to_vec())
            }
            ModelOutputType::Float => {
                let (_shape, data) = outputs[0].try_extract_tensor::<f32>().map_err(mismatch)?;
                RawOutput::Float(data.to_vec())
            }
        };

        if raw.len() != NUM_CLASSES {
            warn!(
                "Expected {} scores from {}, got {}",
                NUM_CLASSES,
                self.model_path.display(),
                raw.len()
            );
        }
        debug!("Inference took {:.2}ms", start.elapsed().as_secs_f64() * 1000.0);

        Ok(raw)
    }
}

impl Drop for OnnxEngine {
    fn drop(&mut self) {
        debug!("Releasing digit model {}", self.model_path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::{preprocess, preprocess_rgb};
    use image::{DynamicImage, Rgb, RgbImage};

    /// Float model whose scores are the first ten input values in memory order
    fn first_ten_pixels_model() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/first_ten_pixels.onnx")
    }

    /// White pixels at even columns of the top row and at (0, 1)
    fn striped_top_row() -> NormalizedTensor {
        let mut img = RgbImage::new(28, 28);
        for x in (0..10).step_by(2) {
            img.put_pixel(x, 0, Rgb([255, 255, 255]));
        }
        img.put_pixel(0, 1, Rgb([255, 255, 255]));
        preprocess_rgb(&img, false)
    }

    struct FixedEngine(RawOutput);

    impl InferenceEngine for FixedEngine {
        fn output_type(&self) -> ModelOutputType {
            self.0.output_type()
        }

        fn run(&self, _input: &NormalizedTensor) -> Result<RawOutput> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_load_missing_model_is_fatal() {
        let result = OnnxEngine::load("models/missing.onnx", ModelOutputType::Float, Some(1));
        assert!(matches!(result, Err(ProcessingError::ModelNotFound(_))));
    }

    #[test]
    fn test_engine_through_reference_and_box() {
        let engine = FixedEngine(RawOutput::Quantized(vec![0, 255]));
        let tensor = preprocess(&DynamicImage::ImageRgb8(RgbImage::new(4, 4)), false);

        let by_ref: &dyn InferenceEngine = &engine;
        assert_eq!(by_ref.output_type(), ModelOutputType::Quantized);
        assert_eq!(
            (&engine).run(&tensor).unwrap(),
            RawOutput::Quantized(vec![0, 255])
        );

        let boxed: Box<dyn InferenceEngine> = Box::new(engine);
        assert_eq!(boxed.run(&tensor).unwrap().len(), 2);
    }

    #[test]
    fn test_onnx_engine_reads_row_major_input() {
        let engine =
            OnnxEngine::load(first_ten_pixels_model(), ModelOutputType::Float, Some(1)).unwrap();
        assert_eq!(engine.output_type(), ModelOutputType::Float);

        let raw = engine.run(&striped_top_row()).unwrap();
        assert_eq!(
            raw,
            RawOutput::Float(vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0])
        );

        // Same session serves repeated calls
        let again = engine.run(&striped_top_row()).unwrap();
        assert_eq!(again, raw);
    }

    #[test]
    fn test_onnx_engine_rejects_wrong_declared_type() {
        let engine =
            OnnxEngine::load(first_ten_pixels_model(), ModelOutputType::Quantized, Some(1))
                .unwrap();

        let err = engine.run(&striped_top_row()).unwrap_err();
        assert!(matches!(
            err,
            ProcessingError::OutputTypeMismatch {
                declared: ModelOutputType::Quantized,
                ..
            }
        ));
    }
}
