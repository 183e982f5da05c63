//! Texture stage trait and bake orchestration.

use std::path::{Path, PathBuf};

use image::{GrayImage, RgbImage};
use thiserror::Error;

use super::config::BakeConfig;
use crate::export::{
    encode, expected_file_size, save_png, write_rgb555, PackedTexture, PngExportError,
    PngExportOptions, Rgb555Error,
};
use crate::texture::{generate_tileable_fbm, generate_warp_map, Palette};

/// Unique identifier for texture stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Grayscale fBm tile.
    FbmNoise,
    /// R/G displacement map.
    WarpMap,
    /// Gradient lookup table.
    PaletteLut,
}

impl StageId {
    pub fn all() -> [StageId; 3] {
        [StageId::FbmNoise, StageId::WarpMap, StageId::PaletteLut]
    }

    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::FbmNoise => "fbm noise",
            StageId::WarpMap => "warp map",
            StageId::PaletteLut => "palette lut",
        }
    }

    /// Conventional output name without extension.
    pub fn file_stem(&self) -> &'static str {
        match self {
            StageId::FbmNoise => "fbm_noise",
            StageId::WarpMap => "warp_map",
            StageId::PaletteLut => "palette_lut",
        }
    }

    /// Output file name, with a `_v{n}` suffix for numbered variations.
    pub fn file_name(&self, variant: Option<usize>, extension: &str) -> String {
        match variant {
            Some(n) => format!("{}_v{}.{}", self.file_stem(), n, extension),
            None => format!("{}.{}", self.file_stem(), extension),
        }
    }

    /// Texture dimensions under `config`.
    pub fn dimensions(&self, config: &BakeConfig) -> (u32, u32) {
        match self {
            StageId::FbmNoise => (config.tile_size, config.tile_size),
            StageId::WarpMap => (config.warp_size, config.warp_size),
            StageId::PaletteLut => (config.palette_size, 1),
        }
    }

    /// Identifies a stage from an output file name such as `warp_map_v2.rgb555`.
    pub fn from_file_name(name: &str) -> Option<StageId> {
        StageId::all()
            .into_iter()
            .find(|id| name.starts_with(id.file_stem()))
    }
}

/// Errors that can occur while writing a stage's output.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("RGB555 export failed: {0}")]
    Rgb555(#[from] Rgb555Error),
    #[error("Preview export failed: {0}")]
    Preview(#[from] PngExportError),
}

/// The 8-bit image a stage produced, before packing.
#[derive(Debug, Clone, PartialEq)]
pub enum StageImage {
    Gray(GrayImage),
    Rgb(RgbImage),
}

impl StageImage {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            StageImage::Gray(img) => img.dimensions(),
            StageImage::Rgb(img) => img.dimensions(),
        }
    }

    pub fn as_gray(&self) -> Option<&GrayImage> {
        match self {
            StageImage::Gray(img) => Some(img),
            StageImage::Rgb(_) => None,
        }
    }

    pub fn as_rgb(&self) -> Option<&RgbImage> {
        match self {
            StageImage::Rgb(img) => Some(img),
            StageImage::Gray(_) => None,
        }
    }

    pub fn encode(&self) -> PackedTexture {
        match self {
            StageImage::Gray(img) => encode(img),
            StageImage::Rgb(img) => encode(img),
        }
    }

    pub fn save_png(&self, path: &Path, options: &PngExportOptions) -> Result<(), PngExportError> {
        match self {
            StageImage::Gray(img) => save_png(img, path, options),
            StageImage::Rgb(img) => save_png(img, path, options),
        }
    }
}

/// Trait for implementing texture stages.
///
/// A stage is a pure function of the configuration and the time offset;
/// stages share nothing and can run in any order.
pub trait TextureStage {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str {
        self.id().name()
    }

    /// Whether the output changes with the time offset.
    fn animated(&self) -> bool {
        true
    }

    /// Builds the stage's image.
    fn build(&self, config: &BakeConfig, time: f64) -> StageImage;
}

/// Tileable grayscale fBm.
pub struct FbmNoiseStage;

impl TextureStage for FbmNoiseStage {
    fn id(&self) -> StageId {
        StageId::FbmNoise
    }

    fn build(&self, config: &BakeConfig, time: f64) -> StageImage {
        StageImage::Gray(generate_tileable_fbm(config.tile_size, &config.noise, time))
    }
}

/// Two-channel warp displacement map.
pub struct WarpMapStage;

impl TextureStage for WarpMapStage {
    fn id(&self) -> StageId {
        StageId::WarpMap
    }

    fn build(&self, config: &BakeConfig, time: f64) -> StageImage {
        StageImage::Rgb(generate_warp_map(
            config.warp_size,
            &config.noise,
            time,
            config.warp_blue,
        ))
    }
}

/// Default gradient sampled into a LUT.
pub struct PaletteLutStage;

impl TextureStage for PaletteLutStage {
    fn id(&self) -> StageId {
        StageId::PaletteLut
    }

    fn animated(&self) -> bool {
        false
    }

    fn build(&self, config: &BakeConfig, _time: f64) -> StageImage {
        StageImage::Rgb(Palette::default().to_image(config.palette_size))
    }
}

/// Options for writing stage outputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct BakeOptions {
    /// Also write a PNG next to each `.rgb555` file.
    pub preview: bool,
    pub png: PngExportOptions,
}

/// Outcome of one stage.
#[derive(Debug)]
pub struct StageOutput {
    pub id: StageId,
    /// Path of the `.rgb555` file.
    pub path: PathBuf,
    /// Path of the PNG preview, when requested.
    pub preview_path: Option<PathBuf>,
    pub image: StageImage,
    pub packed: PackedTexture,
    /// `Err` if either file failed to write. The RGB555 file is written first.
    pub result: Result<(), PipelineError>,
}

impl StageOutput {
    pub fn bytes(&self) -> u64 {
        expected_file_size(self.packed.width, self.packed.height)
    }
}

/// Outcomes of one pipeline run, in stage order.
#[derive(Debug, Default)]
pub struct BakeReport {
    pub outputs: Vec<StageOutput>,
}

impl BakeReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &StageOutput> {
        self.outputs.iter().filter(|o| o.result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &StageOutput> {
        self.outputs.iter().filter(|o| o.result.is_err())
    }

    pub fn is_success(&self) -> bool {
        self.outputs.iter().all(|o| o.result.is_ok())
    }

    /// Texture memory of every written file, in bytes.
    pub fn total_bytes(&self) -> u64 {
        self.succeeded().map(StageOutput::bytes).sum()
    }

    pub fn get(&self, id: StageId) -> Option<&StageOutput> {
        self.outputs.iter().find(|o| o.id == id)
    }
}

/// An ordered set of texture stages sharing one configuration.
pub struct Pipeline {
    stages: Vec<Box<dyn TextureStage>>,
    config: BakeConfig,
}

impl Pipeline {
    /// Creates a new empty pipeline with the given configuration.
    pub fn new(config: BakeConfig) -> Self {
        Self {
            stages: Vec::new(),
            config,
        }
    }

    /// The fBm tile, warp map and palette LUT.
    pub fn standard(config: BakeConfig) -> Self {
        let mut pipeline = Self::new(config);
        pipeline
            .add_stage(FbmNoiseStage)
            .add_stage(WarpMapStage)
            .add_stage(PaletteLutStage);
        pipeline
    }

    /// Only the stages whose output depends on time.
    pub fn animated(config: BakeConfig) -> Self {
        let mut pipeline = Self::standard(config);
        pipeline.stages.retain(|s| s.animated());
        pipeline
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: TextureStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn stage_ids(&self) -> Vec<StageId> {
        self.stages.iter().map(|s| s.id()).collect()
    }

    pub fn config(&self) -> &BakeConfig {
        &self.config
    }

    /// Bakes every stage into `out_dir`.
    ///
    /// # Arguments
    /// * `out_dir` - Existing directory to write into
    /// * `time` - Time offset passed to every stage
    /// * `variant` - Optional `_v{n}` file suffix
    /// * `options` - Preview settings
    pub fn run(
        &self,
        out_dir: &Path,
        time: f64,
        variant: Option<usize>,
        options: &BakeOptions,
    ) -> BakeReport {
        self.run_with_callbacks(out_dir, time, variant, options, |_, _, _| {}, |_, _, _| {})
    }

    /// Bakes every stage with progress callbacks.
    ///
    /// A stage that fails to write does not stop the others; its error is
    /// recorded in the report.
    pub fn run_with_callbacks<F1, F2>(
        &self,
        out_dir: &Path,
        time: f64,
        variant: Option<usize>,
        options: &BakeOptions,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> BakeReport
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&StageOutput, usize, usize),
    {
        let total = self.stages.len();
        let mut report = BakeReport::default();

        for (i, stage) in self.stages.iter().enumerate() {
            on_stage_start(stage.name(), i, total);

            let id = stage.id();
            let image = stage.build(&self.config, time);
            let packed = image.encode();

            let path = out_dir.join(id.file_name(variant, "rgb555"));
            let preview_path = options
                .preview
                .then(|| out_dir.join(id.file_name(variant, "png")));

            let result = write_outputs(&image, &packed, &path, preview_path.as_deref(), options);

            let output = StageOutput {
                id,
                path,
                preview_path,
                image,
                packed,
                result,
            };
            on_stage_complete(&output, i, total);
            report.outputs.push(output);
        }

        report
    }
}

fn write_outputs(
    image: &StageImage,
    packed: &PackedTexture,
    path: &Path,
    preview_path: Option<&Path>,
    options: &BakeOptions,
) -> Result<(), PipelineError> {
    write_rgb555(path, packed)?;
    if let Some(preview_path) = preview_path {
        image.save_png(preview_path, &options.png)?;
    }
    Ok(())
}
