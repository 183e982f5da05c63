//! Export module for saving baked textures.
//!
//! RGB555 is the deliverable format; PNG is for looking at the results.

mod png;
mod rgb555;

pub use png::{save_png, PngExportError, PngExportOptions};
pub use rgb555::{
    encode, expected_file_size, load_rgb555, load_rgb555_or_fallback, write_rgb555,
    PackedTexture, Rgb555, Rgb555Error, Rgb555Source, SIZE_MISMATCH_FILL,
};
