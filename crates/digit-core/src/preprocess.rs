//! Image to model-input tensor conversion
//!
//! The classifier expects the layout it was trained on: a 28x28 single-channel
//! grid of light strokes on a dark background, values in [0, 1], row-major.
//!
//! Pipeline per image:
//! 1. Resize to 28x28 with a triangle (bilinear) filter so thin strokes survive
//! 2. Grayscale as the plain mean of R, G and B (alpha ignored)
//! 3. Optional polarity inversion (`v -> 1 - v`) for dark-ink-on-paper photos
//! 4. Contrast stretch around a fixed 0.2 floor, clamped to [0, 1]

use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use ndarray::{Array2, Array4, Axis};

/// Side length of the model input
pub const INPUT_SIZE: u32 = 28;

/// Number of values in a preprocessed tensor
pub const INPUT_LEN: usize = (INPUT_SIZE * INPUT_SIZE) as usize;

/// Background floor for the contrast stretch. Values at or below it become 0.
pub const CONTRAST_THRESHOLD: f32 = 0.2;

/// Filter used to shrink camera frames down to the model input size
pub const RESIZE_FILTER: FilterType = FilterType::Triangle;

/// A 28x28 single-channel tensor with every value in [0, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTensor {
    data: Array2<f32>,
}

impl NormalizedTensor {
    /// Number of elements (always 784)
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; kept for API symmetry with `len`
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at column `x`, row `y`
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        self.data.get((y, x)).copied()
    }

    /// 2D view, indexed `[[y, x]]`
    pub fn view(&self) -> ndarray::ArrayView2<'_, f32> {
        self.data.view()
    }

    /// Values in row-major order (y outer, x inner)
    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.data.iter().copied()
    }

    /// Row-major copy of the values
    #[must_use]
    pub fn to_vec(&self) -> Vec<f32> {
        self.values().collect()
    }

    /// NHWC `[1, 28, 28, 1]` array as the model consumes it.
    ///
    /// Inserting unit axes keeps the memory order identical to `to_vec`.
    #[must_use]
    pub fn to_model_input(&self) -> Array4<f32> {
        self.data
            .clone()
            .insert_axis(Axis(0))
            .insert_axis(Axis(3))
    }

    /// Mean value over the grid
    #[must_use]
    pub fn mean(&self) -> f32 {
        self.data.mean().unwrap_or(0.0)
    }

    /// Render the grid as text, one row per line.
    ///
    /// ` ` for 0, `.` below 0.25, `:` below 0.5, `+` below 0.75, `#` otherwise.
    #[must_use]
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(INPUT_LEN + INPUT_SIZE as usize);
        for row in self.data.rows() {
            for &v in row {
                out.push(match v {
                    v if v <= 0.0 => ' ',
                    v if v < 0.25 => '.',
                    v if v < 0.5 => ':',
                    v if v < 0.75 => '+',
                    _ => '#',
                });
            }
            out.push('\n');
        }
        out
    }
}

/// Convert an image of any size into the model input tensor
#[must_use]
pub fn preprocess(image: &DynamicImage, invert_polarity: bool) -> NormalizedTensor {
    preprocess_rgb(&image.to_rgb8(), invert_polarity)
}

/// Same as [`preprocess`] for an already-decoded RGB buffer
#[must_use]
pub fn preprocess_rgb(image: &RgbImage, invert_polarity: bool) -> NormalizedTensor {
    let resized = resize_to_input(image);
    let data = Array2::from_shape_fn(
        (INPUT_SIZE as usize, INPUT_SIZE as usize),
        |(y, x)| {
            let v = grayscale(resized.get_pixel(x as u32, y as u32).0, invert_polarity);
            contrast_stretch(v, CONTRAST_THRESHOLD)
        },
    );

    NormalizedTensor { data }
}

/// Pre-threshold grayscale values for an image, row-major.
///
/// Useful for inspecting what the contrast stretch receives.
#[must_use]
pub fn grayscale_values(image: &DynamicImage, invert_polarity: bool) -> Vec<f32> {
    let resized = resize_to_input(&image.to_rgb8());
    resized
        .pixels()
        .map(|p| grayscale(p.0, invert_polarity))
        .collect()
}

fn resize_to_input(image: &RgbImage) -> RgbImage {
    if image.dimensions() == (INPUT_SIZE, INPUT_SIZE) {
        image.clone()
    } else {
        image::imageops::resize(image, INPUT_SIZE, INPUT_SIZE, RESIZE_FILTER)
    }
}

/// Unweighted RGB mean scaled to [0, 1], optionally inverted
#[must_use]
pub fn grayscale(rgb: [u8; 3], invert_polarity: bool) -> f32 {
    let sum = u32::from(rgb[0]) + u32::from(rgb[1]) + u32::from(rgb[2]);
    let v = sum as f32 / 3.0 / 255.0;
    if invert_polarity {
        1.0 - v
    } else {
        v
    }
}

/// Map `v` through `clamp((v - t) / (1 - t), 0, 1)`
#[must_use]
pub fn contrast_stretch(v: f32, threshold: f32) -> f32 {
    ((v - threshold).max(0.0) / (1.0 - threshold)).min(1.0)
}
