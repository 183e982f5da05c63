//! Sampling domains for 2D noise.
//!
//! A domain is a pair of same-shaped coordinate grids built as the outer
//! product of two 1D axes (row-major, `x` varies along columns and `y`
//! along rows).

use std::f64::consts::TAU;

use glam::DVec2;

/// Two same-shaped coordinate grids over which noise is sampled.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleDomain {
    pub width: u32,
    pub height: u32,
    /// X coordinate per sample, row-major.
    pub x: Vec<f64>,
    /// Y coordinate per sample, row-major.
    pub y: Vec<f64>,
}

/// Maps grid index `i` of a `size`-long axis onto a circle of circumference `size`.
///
/// `i == size` lands on the same point as `i == 0`, which is what makes the
/// sampled texture wrap.
pub fn circle_point(i: u32, size: u32) -> DVec2 {
    let size = size as f64;
    let radius = size / TAU;
    DVec2::from_angle(TAU * i as f64 / size) * radius
}

impl SampleDomain {
    /// Builds the outer product grid of two axes.
    pub fn from_axes(xs: &[f64], ys: &[f64]) -> Self {
        let width = xs.len();
        let height = ys.len();
        let mut x = Vec::with_capacity(width * height);
        let mut y = Vec::with_capacity(width * height);

        for &row in ys {
            for &col in xs {
                x.push(col);
                y.push(row);
            }
        }

        Self {
            width: width as u32,
            height: height as u32,
            x,
            y,
        }
    }

    /// Builds a `size × size` domain whose noise tiles seamlessly.
    ///
    /// The x axis takes the cosine and the y axis the sine of each index's
    /// circle point; the 2D domain is their outer product.
    pub fn tileable(size: u32) -> Self {
        let (xs, ys): (Vec<f64>, Vec<f64>) = (0..size)
            .map(|i| {
                let p = circle_point(i, size);
                (p.x, p.y)
            })
            .unzip();
        Self::from_axes(&xs, &ys)
    }

    /// Returns a copy with `dx` added to every x and `dy` to every y.
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self {
            width: self.width,
            height: self.height,
            x: self.x.iter().map(|v| v + dx).collect(),
            y: self.y.iter().map(|v| v + dy).collect(),
        }
    }

    /// Number of samples in the domain.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Coordinates of the sample at column `col`, row `row`.
    pub fn point(&self, col: u32, row: u32) -> (f64, f64) {
        let i = (row * self.width + col) as usize;
        (self.x[i], self.y[i])
    }
}
