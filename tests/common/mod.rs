//! Shared fixtures for integration tests

use digit_recognition::{InferenceEngine, ModelOutputType, NormalizedTensor, RawOutput, Result};
use image::{DynamicImage, Rgb, RgbImage};
use std::cell::RefCell;

/// Engine returning a fixed output and recording every tensor it receives
pub struct RecordingEngine {
    output: RawOutput,
    pub inputs: RefCell<Vec<NormalizedTensor>>,
}

impl RecordingEngine {
    pub fn new(output: RawOutput) -> Self {
        Self {
            output,
            inputs: RefCell::new(Vec::new()),
        }
    }
}

impl InferenceEngine for RecordingEngine {
    fn output_type(&self) -> ModelOutputType {
        self.output.output_type()
    }

    fn run(&self, input: &NormalizedTensor) -> Result<RawOutput> {
        self.inputs.borrow_mut().push(input.clone());
        Ok(self.output.clone())
    }
}

/// Float probabilities with `peak` at `class` and the rest spread evenly
pub fn float_scores(class: usize, peak: f32) -> Vec<f32> {
    let rest = (1.0 - peak) / 9.0;
    (0..10).map(|i| if i == class { peak } else { rest }).collect()
}

pub fn solid(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
}

/// Dark "1" stroke on white paper, as a phone camera would capture it
pub fn paper_capture(width: u32, height: u32) -> DynamicImage {
    let x0 = width * 45 / 100;
    let x1 = width * 55 / 100;
    let y0 = height / 5;
    let y1 = height * 4 / 5;
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        if (x0..x1).contains(&x) && (y0..y1).contains(&y) {
            Rgb([20, 20, 35])
        } else {
            Rgb([235, 232, 225])
        }
    }))
}
