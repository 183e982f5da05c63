//! Texture builders: the fBm tile, the warp map and the palette LUT.

mod palette;
mod tile;
mod warp;

pub use palette::{build_palette, ColorStop, Palette, PaletteError, DEFAULT_STOPS};
pub use tile::generate_tileable_fbm;
pub use warp::{generate_warp_map, BlueChannel, WARP_DECORRELATION_OFFSET};
