//! Scalar noise fields and their normalization to bytes.

use image::{GrayImage, Luma};

/// Added to the min-max denominator so a constant field normalizes to 0
/// instead of dividing by zero.
pub const NORMALIZE_EPSILON: f64 = 1e-6;

/// A `width × height` grid of raw (unnormalized) noise samples, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseField {
    pub width: u32,
    pub height: u32,
    pub data: Vec<f64>,
}

impl NoiseField {
    /// Wraps row-major samples. `data.len()` must equal `width * height`.
    pub fn new(width: u32, height: u32, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), (width as usize) * (height as usize));
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f64 {
        self.data[(y * self.width + x) as usize]
    }

    /// Returns `(min, max)` over all samples, or `(0.0, 0.0)` for an empty field.
    pub fn range(&self) -> (f64, f64) {
        if self.data.is_empty() {
            return (0.0, 0.0);
        }
        self.data
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }

    /// Min-max scales the field into `[0, 1)`.
    pub fn normalized(&self) -> Vec<f64> {
        let (min, max) = self.range();
        let denom = max - min + NORMALIZE_EPSILON;
        self.data.iter().map(|&v| (v - min) / denom).collect()
    }

    /// Normalized samples scaled to `[0, 255]` and truncated.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.normalized()
            .into_iter()
            .map(|n| (n * 255.0) as u8)
            .collect()
    }

    pub fn to_gray_image(&self) -> GrayImage {
        let bytes = self.to_bytes();
        GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([bytes[(y * self.width + x) as usize]])
        })
    }
}
