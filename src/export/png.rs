//! PNG export of 8-bit previews.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, PixelWithColorType};
use thiserror::Error;

/// Errors that can occur during PNG export.
#[derive(Error, Debug)]
pub enum PngExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Cannot encode an empty {0}x{1} image")]
    EmptyImage(u32, u32),
}

/// Options for PNG export.
#[derive(Debug, Clone, Copy)]
pub struct PngExportOptions {
    /// PNG compression type.
    pub compression: CompressionType,
    /// PNG filter type.
    pub filter: FilterType,
}

impl Default for PngExportOptions {
    fn default() -> Self {
        Self {
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

/// Writes any 8-bit image buffer (gray or RGB) as a PNG.
pub fn save_png<P>(
    img: &ImageBuffer<P, Vec<u8>>,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), PngExportError>
where
    P: PixelWithColorType<Subpixel = u8>,
{
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(PngExportError::EmptyImage(width, height));
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);

    encoder.write_image(img.as_raw(), width, height, P::COLOR_TYPE)?;

    Ok(())
}
