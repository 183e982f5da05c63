//! Noise synthesis for tileable textures.
//!
//! Fractal sums of Perlin gradient noise from the `noise` crate, sampled
//! over a circular domain so the resulting tile wraps.

mod domain;
mod field;
mod fractal;

pub use domain::{circle_point, SampleDomain};
pub use field::{NoiseField, NORMALIZE_EPSILON};
pub use fractal::{fbm, sample_fbm, FbmConfig};
