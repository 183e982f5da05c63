//! Gradient palettes and their 1D lookup tables.

use image::{Rgb, RgbImage};
use thiserror::Error;

/// Errors raised when a set of color stops does not form a palette.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaletteError {
    #[error("A palette needs at least two stops, got {0}")]
    TooFewStops(usize),
    #[error("First stop must be 0.0, got {0}")]
    BadFirstStop(f64),
    #[error("Last stop must be 1.0, got {0}")]
    BadLastStop(f64),
    #[error("Stops must be strictly ascending: {0} at index {1} follows {2}")]
    NotAscending(f64, usize, f64),
}

/// A control point of the gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    /// Position in `[0, 1]`.
    pub stop: f64,
    pub color: [u8; 3],
}

impl ColorStop {
    pub const fn new(stop: f64, color: [u8; 3]) -> Self {
        Self { stop, color }
    }
}

/// Control points of the baked gradient: dark navy, muted blue, muted
/// orange-red, soft white.
pub const DEFAULT_STOPS: [ColorStop; 4] = [
    ColorStop::new(0.0, [15, 20, 40]),
    ColorStop::new(0.3, [70, 120, 180]),
    ColorStop::new(0.6, [200, 90, 60]),
    ColorStop::new(1.0, [220, 220, 220]),
];

/// Piecewise-linear gradient over ascending color stops.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    stops: Vec<ColorStop>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            stops: DEFAULT_STOPS.to_vec(),
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

impl Palette {
    /// Validates and wraps a list of stops running strictly upward from 0.0 to 1.0.
    pub fn new(stops: Vec<ColorStop>) -> Result<Self, PaletteError> {
        if stops.len() < 2 {
            return Err(PaletteError::TooFewStops(stops.len()));
        }

        let first = stops[0].stop;
        if first != 0.0 {
            return Err(PaletteError::BadFirstStop(first));
        }
        let last = stops[stops.len() - 1].stop;
        if last != 1.0 {
            return Err(PaletteError::BadLastStop(last));
        }

        for (i, pair) in stops.windows(2).enumerate() {
            // `!(a < b)` also rejects NaN.
            if !(pair[0].stop < pair[1].stop) {
                return Err(PaletteError::NotAscending(pair[1].stop, i + 1, pair[0].stop));
            }
        }

        Ok(Self { stops })
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Color at `value`.
    ///
    /// Scans brackets in ascending order and uses the first with
    /// `left <= value <= right`, so a value sitting exactly on an interior
    /// stop resolves against the bracket ending there. Channels are
    /// interpolated independently and truncated. Values outside `[0, 1]`
    /// are clamped; NaN yields the first stop's color.
    pub fn sample(&self, value: f64) -> [u8; 3] {
        let value = value.clamp(0.0, 1.0);

        for pair in self.stops.windows(2) {
            let (left, right) = (&pair[0], &pair[1]);
            if value >= left.stop && value <= right.stop {
                let span = right.stop - left.stop;
                let t = if span > 0.0 {
                    (value - left.stop) / span
                } else {
                    0.0
                };

                let mut color = [0u8; 3];
                for (c, channel) in color.iter_mut().enumerate() {
                    *channel = lerp(left.color[c] as f64, right.color[c] as f64, t) as u8;
                }
                return color;
            }
        }

        self.stops[0].color
    }

    /// Samples the gradient at `resolution` evenly spaced points from 0.0 to 1.0.
    pub fn build(&self, resolution: usize) -> Vec<[u8; 3]> {
        match resolution {
            0 => Vec::new(),
            1 => vec![self.sample(0.0)],
            n => {
                let step = (n - 1) as f64;
                (0..n).map(|i| self.sample(i as f64 / step)).collect()
            }
        }
    }

    /// The lookup table as a `resolution × 1` image.
    pub fn to_image(&self, resolution: u32) -> RgbImage {
        let colors = self.build(resolution as usize);
        RgbImage::from_fn(resolution, 1, |x, _| Rgb(colors[x as usize]))
    }
}

/// Builds a `resolution`-entry lookup table from the default gradient.
pub fn build_palette(resolution: usize) -> Vec<[u8; 3]> {
    Palette::default().build(resolution)
}
