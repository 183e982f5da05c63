//! CPU rendition of the combined background effect.
//!
//! The fBm tile scrolls, the warp map scrolls at its own speed and its R/G
//! channels push fBm lookups around, and the displaced fBm value indexes the
//! palette LUT. Every lookup wraps.

use image::{GrayImage, Rgb, RgbImage};

use crate::pipeline::BakeConfig;

/// Animation and output parameters for [`composite_frame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeParams {
    pub width: u32,
    pub height: u32,
    /// Seconds since the animation started.
    pub time: f64,
    /// fBm scroll, in tiles per second.
    pub scroll_speed: f64,
    /// Warp scroll, in tiles per second.
    pub warp_speed: f64,
    /// Peak-to-peak displacement in fBm texels.
    pub warp_strength: f64,
}

impl CompositeParams {
    pub fn from_config(config: &BakeConfig, width: u32, height: u32, time: f64) -> Self {
        Self {
            width,
            height,
            time,
            scroll_speed: config.scroll_speed,
            warp_speed: config.warp_speed,
            warp_strength: config.warp_strength,
        }
    }
}

#[inline]
fn wrap(v: f64, size: u32) -> u32 {
    (v.floor() as i64).rem_euclid(size as i64) as u32
}

/// Renders one frame of the effect.
///
/// `lut` is read along its first row. Returns a black frame if any input
/// texture is empty.
pub fn composite_frame(
    fbm: &GrayImage,
    warp: &RgbImage,
    lut: &RgbImage,
    params: &CompositeParams,
) -> RgbImage {
    let (tile_w, tile_h) = fbm.dimensions();
    let (warp_w, warp_h) = warp.dimensions();
    let lut_len = lut.width();

    if tile_w == 0
        || tile_h == 0
        || warp_w == 0
        || warp_h == 0
        || lut_len == 0
        || lut.height() == 0
    {
        return RgbImage::new(params.width, params.height);
    }

    let scroll_x = params.time * params.scroll_speed * tile_w as f64;
    let scroll_y = params.time * params.scroll_speed * tile_h as f64;
    let warp_x = params.time * params.warp_speed * warp_w as f64;
    let warp_y = params.time * params.warp_speed * warp_h as f64;

    RgbImage::from_fn(params.width, params.height, |x, y| {
        let w = warp.get_pixel(wrap(x as f64 + warp_x, warp_w), wrap(y as f64 + warp_y, warp_h));
        let dx = (w[0] as f64 / 255.0 - 0.5) * params.warp_strength;
        let dy = (w[1] as f64 / 255.0 - 0.5) * params.warp_strength;

        let value = fbm.get_pixel(
            wrap(x as f64 + scroll_x + dx, tile_w),
            wrap(y as f64 + scroll_y + dy, tile_h),
        )[0];

        let index = value as u32 * (lut_len - 1) / 255;
        Rgb(lut.get_pixel(index, 0).0)
    })
}
