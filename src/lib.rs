//! Procedural background texture baker.
//!
//! This crate generates a tileable fractal noise tile, a warp displacement
//! map and a gradient palette LUT, and packs them as headerless big-endian
//! RGB555 files for tight texture-memory budgets.

pub mod export;
pub mod noise;
pub mod pipeline;
pub mod preview;
pub mod texture;

pub use crate::export::{encode, write_rgb555, PackedTexture, Rgb555};
pub use crate::noise::{fbm, FbmConfig, NoiseField, SampleDomain};
pub use crate::pipeline::{BakeConfig, BakeOptions, BakeReport, Pipeline, StageId};
pub use crate::preview::{composite_frame, CompositeParams, RegenSchedule};
pub use crate::texture::{
    build_palette, generate_tileable_fbm, generate_warp_map, BlueChannel, Palette,
};
