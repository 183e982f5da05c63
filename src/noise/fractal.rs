//! Multi-octave fractal Brownian motion (fBm) noise generation.

use ::noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use super::domain::SampleDomain;
use super::field::NoiseField;

/// Configuration for multi-octave fractal noise generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FbmConfig {
    /// Number of noise octaves.
    pub octaves: u32,
    /// Frequency multiplier per octave.
    pub lacunarity: f64,
    /// Amplitude multiplier per octave.
    pub gain: f64,
    /// Seed of the Perlin permutation table used as the basis function.
    pub seed: u32,
}

impl Default for FbmConfig {
    fn default() -> Self {
        Self {
            octaves: 4,
            lacunarity: 2.7,
            gain: 0.5,
            seed: 0,
        }
    }
}

impl FbmConfig {
    /// Creates a new noise configuration with the given seed.
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// The gradient-noise basis sampled by every octave.
    pub fn basis(&self) -> Perlin {
        Perlin::new(self.seed)
    }
}

/// Samples the fractal sum at a single point.
///
/// Octave `k` reads the basis at `(x·lacunarity^k + t, y·lacunarity^k + t)`
/// weighted by `gain^k`. The sum is not normalized.
pub fn sample_fbm<N: NoiseFn<f64, 2>>(
    basis: &N,
    x: f64,
    y: f64,
    config: &FbmConfig,
    t: f64,
) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;

    for _ in 0..config.octaves {
        total += amplitude * basis.get([x * frequency + t, y * frequency + t]);
        frequency *= config.lacunarity;
        amplitude *= config.gain;
    }

    total
}

/// Samples the fractal sum over every point of a domain.
pub fn fbm(domain: &SampleDomain, config: &FbmConfig, t: f64) -> NoiseField {
    let basis = config.basis();
    let data = domain
        .x
        .iter()
        .zip(&domain.y)
        .map(|(&x, &y)| sample_fbm(&basis, x, y, config, t))
        .collect();

    NoiseField::new(domain.width, domain.height, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::circle_point;

    #[test]
    fn test_default_config() {
        let config = FbmConfig::default();
        assert_eq!(config.octaves, 4);
        assert_eq!(config.lacunarity, 2.7);
        assert_eq!(config.gain, 0.5);
    }

    #[test]
    fn test_single_octave_is_basis() {
        let config = FbmConfig {
            octaves: 1,
            ..Default::default()
        };
        let basis = config.basis();
        let (x, y, t) = (1.37, -4.21, 0.5);
        assert_eq!(
            sample_fbm(&basis, x, y, &config, t),
            basis.get([x + t, y + t])
        );
    }

    #[test]
    fn test_octave_weighting() {
        let config = FbmConfig {
            octaves: 3,
            lacunarity: 2.0,
            gain: 0.25,
            seed: 7,
        };
        let basis = config.basis();
        let (x, y, t) = (0.31, 0.77, 1.0);

        let expected = basis.get([x + t, y + t])
            + 0.25 * basis.get([x * 2.0 + t, y * 2.0 + t])
            + 0.0625 * basis.get([x * 4.0 + t, y * 4.0 + t]);

        let value = sample_fbm(&basis, x, y, &config, t);
        assert!((value - expected).abs() < 1e-12);
    }

    #[test]
    fn test_zero_octaves_is_zero() {
        let config = FbmConfig {
            octaves: 0,
            ..Default::default()
        };
        assert_eq!(sample_fbm(&config.basis(), 3.3, 1.1, &config, 0.0), 0.0);
    }

    #[test]
    fn test_fbm_determinism() {
        let domain = SampleDomain::tileable(16);
        let config = FbmConfig::with_seed(12345);

        let a = fbm(&domain, &config, 2.0);
        let b = fbm(&domain, &config, 2.0);

        assert_eq!(a.data.len(), 256);
        for (va, vb) in a.data.iter().zip(&b.data) {
            assert_eq!(va.to_bits(), vb.to_bits());
        }
    }

    #[test]
    fn test_time_offset_changes_field() {
        let domain = SampleDomain::tileable(16);
        let config = FbmConfig::default();

        let a = fbm(&domain, &config, 0.0);
        let b = fbm(&domain, &config, 0.37);

        assert_ne!(a.data, b.data);
    }

    #[test]
    fn test_field_is_not_flat() {
        let field = fbm(&SampleDomain::tileable(32), &FbmConfig::default(), 0.0);
        let (min, max) = field.range();
        assert!(max > min);
    }

    #[test]
    fn test_tiling_at_wrap_boundary() {
        let size = 32;
        let config = FbmConfig::default();
        let basis = config.basis();

        let start = circle_point(0, size);
        let end = circle_point(size, size);

        // Along x (cos axis), holding y at an interior row.
        let y = circle_point(5, size).y;
        let a = sample_fbm(&basis, start.x, y, &config, 0.0);
        let b = sample_fbm(&basis, end.x, y, &config, 0.0);
        assert!((a - b).abs() < 1e-6, "x wrap: {} vs {}", a, b);

        // Along y (sin axis), holding x at an interior column.
        let x = circle_point(9, size).x;
        let a = sample_fbm(&basis, x, start.y, &config, 0.0);
        let b = sample_fbm(&basis, x, end.y, &config, 0.0);
        assert!((a - b).abs() < 1e-6, "y wrap: {} vs {}", a, b);
    }
}
