//! Warp displacement map: two decorrelated fBm fields packed into R and G.

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::noise::{fbm, FbmConfig, SampleDomain};

/// Offset applied to both axes of the second field's domain.
pub const WARP_DECORRELATION_OFFSET: f64 = 100.0;

/// What the unused blue channel of the warp map holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlueChannel {
    /// Mid-gray, "no offset" under a signed displacement reading.
    #[default]
    Neutral,
    /// Zero.
    Zero,
}

impl BlueChannel {
    pub fn value(self) -> u8 {
        match self {
            BlueChannel::Neutral => 128,
            BlueChannel::Zero => 0,
        }
    }
}

/// Generates a `size × size` warp map.
///
/// R and G are independently normalized fBm fields over the tileable domain,
/// the second shifted by [`WARP_DECORRELATION_OFFSET`]. B is constant.
pub fn generate_warp_map(size: u32, config: &FbmConfig, t: f64, blue: BlueChannel) -> RgbImage {
    let domain = SampleDomain::tileable(size);
    let warp_x = fbm(&domain, config, t).to_bytes();
    let warp_y = fbm(
        &domain.offset(WARP_DECORRELATION_OFFSET, WARP_DECORRELATION_OFFSET),
        config,
        t,
    )
    .to_bytes();

    let b = blue.value();
    RgbImage::from_fn(size, size, |x, y| {
        let i = (y * size + x) as usize;
        Rgb([warp_x[i], warp_y[i], b])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::generate_tileable_fbm;

    #[test]
    fn test_blue_channel_values() {
        assert_eq!(BlueChannel::Neutral.value(), 128);
        assert_eq!(BlueChannel::Zero.value(), 0);
        assert_eq!(BlueChannel::default(), BlueChannel::Neutral);
    }

    #[test]
    fn test_constant_blue() {
        let config = FbmConfig::default();
        let neutral = generate_warp_map(16, &config, 0.0, BlueChannel::Neutral);
        let zero = generate_warp_map(16, &config, 0.0, BlueChannel::Zero);

        assert!(neutral.pixels().all(|p| p[2] == 128));
        assert!(zero.pixels().all(|p| p[2] == 0));

        // Blue choice never touches the displacement channels.
        for (a, b) in neutral.pixels().zip(zero.pixels()) {
            assert_eq!(a[0], b[0]);
            assert_eq!(a[1], b[1]);
        }
    }

    #[test]
    fn test_red_matches_fbm_tile() {
        let config = FbmConfig::default();
        let warp = generate_warp_map(16, &config, 0.5, BlueChannel::Neutral);
        let tile = generate_tileable_fbm(16, &config, 0.5);

        for (w, g) in warp.pixels().zip(tile.pixels()) {
            assert_eq!(w[0], g[0]);
        }
    }

    #[test]
    fn test_channels_are_decorrelated() {
        let warp = generate_warp_map(32, &FbmConfig::default(), 0.0, BlueChannel::Neutral);
        let differing = warp.pixels().filter(|p| p[0] != p[1]).count();
        assert!(differing > (32 * 32) / 2);
    }

    #[test]
    fn test_blue_channel_serde() {
        let json = serde_json::to_string(&BlueChannel::Zero).unwrap();
        assert_eq!(json, "\"zero\"");
        let parsed: BlueChannel = serde_json::from_str("\"neutral\"").unwrap();
        assert_eq!(parsed, BlueChannel::Neutral);
    }
}
