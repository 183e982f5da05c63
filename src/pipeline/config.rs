//! Bake configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::noise::FbmConfig;
use crate::texture::BlueChannel;

/// Errors loading or validating a [`BakeConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Everything one bake needs. Passed explicitly into each generation call.
///
/// Sizes are in pixels; `time` is the offset added to both noise axes.
/// The speeds and strength only drive the composite preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BakeConfig {
    /// Side of the square fBm tile.
    pub tile_size: u32,
    /// Side of the square warp map.
    pub warp_size: u32,
    /// Entries in the palette LUT.
    pub palette_size: u32,
    pub noise: FbmConfig,
    pub time: f64,
    pub warp_blue: BlueChannel,
    /// fBm tile scroll, in tiles per second.
    pub scroll_speed: f64,
    /// Warp map scroll, in tiles per second.
    pub warp_speed: f64,
    /// Peak-to-peak displacement in fBm texels.
    pub warp_strength: f64,
}

impl Default for BakeConfig {
    fn default() -> Self {
        // Sized so all three textures fit in 4 KiB of texture memory.
        Self {
            tile_size: 32,
            warp_size: 32,
            palette_size: 64,
            noise: FbmConfig::default(),
            time: 0.0,
            warp_blue: BlueChannel::Neutral,
            scroll_speed: 0.05,
            warp_speed: 0.3,
            warp_strength: 4.0,
        }
    }
}

impl BakeConfig {
    /// Reads a JSON config; missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks sizes are natural numbers and noise parameters positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("tile_size", self.tile_size),
            ("warp_size", self.warp_size),
            ("palette_size", self.palette_size),
            ("noise.octaves", self.noise.octaves),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{} must be at least 1", name)));
            }
        }

        for (name, value) in [
            ("noise.lacunarity", self.noise.lacunarity),
            ("noise.gain", self.noise.gain),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if !self.time.is_finite() {
            return Err(ConfigError::Invalid(format!("time must be finite, got {}", self.time)));
        }

        Ok(())
    }
}
