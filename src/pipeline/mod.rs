//! Pipeline module for baking the texture set.
//!
//! Each texture is a stage; the pipeline runs the stages against one
//! explicit [`BakeConfig`] and writes their outputs.

mod config;
mod stage;

pub use config::{BakeConfig, ConfigError};
pub use stage::{
    BakeOptions, BakeReport, FbmNoiseStage, PaletteLutStage, Pipeline, PipelineError, StageId,
    StageImage, StageOutput, TextureStage, WarpMapStage,
};
