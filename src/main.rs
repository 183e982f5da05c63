//! noisebake CLI - procedural background texture baker.
//!
//! Bakes a tileable fBm tile, a warp displacement map and a palette LUT
//! into big-endian RGB555 files.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use noisebake::export::{
    expected_file_size, load_rgb555, load_rgb555_or_fallback, save_png, PngExportOptions,
};
use noisebake::pipeline::{
    BakeConfig, BakeOptions, BakeReport, PaletteLutStage, Pipeline, StageId, StageOutput,
};
use noisebake::preview::{composite_frame, CompositeParams, RegenSchedule};
use noisebake::texture::BlueChannel;

/// Procedural background texture baker.
#[derive(Parser)]
#[command(name = "noisebake")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bake fbm_noise, warp_map and palette_lut.
    Bake {
        #[command(flatten)]
        bake: BakeArgs,
    },

    /// Bake numbered fbm/warp variations at several time offsets.
    Variations {
        #[command(flatten)]
        bake: BakeArgs,

        /// Time offsets, one variation each.
        #[arg(long, value_delimiter = ',', default_value = "0,1,2,3")]
        times: Vec<f64>,
    },

    /// Re-bake once per elapsed second and render a composite preview frame.
    Watch {
        #[command(flatten)]
        bake: BakeArgs,

        /// How long to run, in seconds.
        #[arg(long, default_value = "5")]
        duration: u64,

        /// Preview frame width in pixels.
        #[arg(long, default_value = "320")]
        frame_width: u32,

        /// Preview frame height in pixels.
        #[arg(long, default_value = "240")]
        frame_height: u32,
    },

    /// Decode an .rgb555 file to PNG.
    Inspect {
        /// Input .rgb555 file.
        input: PathBuf,

        /// Texture width (inferred from the file name and config if omitted).
        #[arg(long)]
        width: Option<u32>,

        /// Texture height (inferred from the file name and config if omitted).
        #[arg(long)]
        height: Option<u32>,

        /// Output PNG path (defaults to the input with a .png extension).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Substitute a test pattern for missing or truncated files.
        #[arg(long)]
        fallback: bool,

        /// JSON config used to infer dimensions.
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Display texture sizes and memory use for a configuration.
    Info {
        #[command(flatten)]
        bake: BakeArgs,
    },
}

/// Options shared by every command that bakes.
#[derive(Args)]
struct BakeArgs {
    /// JSON config file; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory for generated files.
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// fBm tile size in pixels.
    #[arg(long)]
    tile_size: Option<u32>,

    /// Warp map size in pixels.
    #[arg(long)]
    warp_size: Option<u32>,

    /// Palette LUT entries.
    #[arg(long)]
    palette_size: Option<u32>,

    /// Number of noise octaves.
    #[arg(long)]
    octaves: Option<u32>,

    /// Frequency multiplier per octave.
    #[arg(long)]
    lacunarity: Option<f64>,

    /// Amplitude multiplier per octave.
    #[arg(long)]
    gain: Option<f64>,

    /// Perlin permutation seed.
    #[arg(long)]
    seed: Option<u32>,

    /// Time offset added to both noise axes.
    #[arg(short, long)]
    time: Option<f64>,

    /// Warp map blue channel.
    #[arg(long)]
    warp_blue: Option<BlueArg>,

    /// Also write PNG previews.
    #[arg(long)]
    preview: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum BlueArg {
    /// 128: no offset under a signed reading.
    Neutral,
    /// 0.
    Zero,
}

impl From<BlueArg> for BlueChannel {
    fn from(arg: BlueArg) -> Self {
        match arg {
            BlueArg::Neutral => BlueChannel::Neutral,
            BlueArg::Zero => BlueChannel::Zero,
        }
    }
}

impl BakeArgs {
    fn resolve(&self) -> BakeConfig {
        let mut config = match &self.config {
            Some(path) => BakeConfig::load(path).unwrap_or_else(|e| {
                fail(format!("Error loading config {}: {}", path.display(), e))
            }),
            None => BakeConfig::default(),
        };

        if let Some(v) = self.tile_size {
            config.tile_size = v;
        }
        if let Some(v) = self.warp_size {
            config.warp_size = v;
        }
        if let Some(v) = self.palette_size {
            config.palette_size = v;
        }
        if let Some(v) = self.octaves {
            config.noise.octaves = v;
        }
        if let Some(v) = self.lacunarity {
            config.noise.lacunarity = v;
        }
        if let Some(v) = self.gain {
            config.noise.gain = v;
        }
        if let Some(v) = self.seed {
            config.noise.seed = v;
        }
        if let Some(v) = self.time {
            config.time = v;
        }
        if let Some(v) = self.warp_blue {
            config.warp_blue = v.into();
        }

        config
            .validate()
            .unwrap_or_else(|e| fail(format!("Error: {}", e)));
        config
    }

    fn options(&self) -> BakeOptions {
        BakeOptions {
            preview: self.preview,
            ..Default::default()
        }
    }
}

fn fail(message: String) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Bake { bake } => run_bake(&bake),
        Commands::Variations { bake, times } => run_variations(&bake, &times),
        Commands::Watch {
            bake,
            duration,
            frame_width,
            frame_height,
        } => run_watch(&bake, duration, frame_width, frame_height),
        Commands::Inspect {
            input,
            width,
            height,
            output,
            fallback,
            config,
        } => run_inspect(&input, width, height, output, fallback, config),
        Commands::Info { bake } => run_info(&bake.resolve()),
    }
}

fn print_config(config: &BakeConfig, output: &Path) {
    println!(
        "Tile: {0}x{0}  Warp: {1}x{1}  Palette: {2}x1",
        config.tile_size, config.warp_size, config.palette_size
    );
    println!(
        "Noise: octaves={} lacunarity={} gain={} seed={}",
        config.noise.octaves, config.noise.lacunarity, config.noise.gain, config.noise.seed
    );
    println!("Output: {}", output.display());
}

fn create_output_dir(output: &Path) {
    std::fs::create_dir_all(output).unwrap_or_else(|e| {
        fail(format!("Error creating output directory: {}", e))
    });
}

fn report_start(name: &str, i: usize, total: usize) {
    println!("  [{}/{}] Starting: {}", i + 1, total, name);
}

fn report_complete(output: &StageOutput, i: usize, total: usize) {
    match &output.result {
        Ok(()) => println!(
            "  [{}/{}] Completed: {} ({}x{}, {} bytes)",
            i + 1,
            total,
            output.path.display(),
            output.packed.width,
            output.packed.height,
            output.bytes()
        ),
        Err(e) => eprintln!("  [{}/{}] Failed: {}: {}", i + 1, total, output.path.display(), e),
    }
}

fn finish(report: &BakeReport) {
    println!("Total texture memory: {} bytes", report.total_bytes());
    let failed = report.failures().count();
    if failed > 0 {
        fail(format!("{} of {} files failed to write", failed, report.outputs.len()));
    }
}

fn run_bake(args: &BakeArgs) {
    let config = args.resolve();

    println!("noisebake - Background Texture Baker");
    println!("====================================");
    print_config(&config, &args.output);
    println!("Time: {}", config.time);

    create_output_dir(&args.output);

    let start = Instant::now();
    let pipeline = Pipeline::standard(config.clone());
    let report = pipeline.run_with_callbacks(
        &args.output,
        config.time,
        None,
        &args.options(),
        report_start,
        report_complete,
    );

    println!("Baked in {:.2?}", start.elapsed());
    finish(&report);
    println!("Done!");
}

fn run_variations(args: &BakeArgs, times: &[f64]) {
    let config = args.resolve();

    println!("noisebake - Texture Variations");
    println!("==============================");
    print_config(&config, &args.output);

    create_output_dir(&args.output);

    let start = Instant::now();
    let pipeline = Pipeline::animated(config);
    let mut failed = 0;
    let mut bytes = 0;

    for (i, &t) in times.iter().enumerate() {
        println!("\nVariation {} (t={})", i + 1, t);
        let report = pipeline.run_with_callbacks(
            &args.output,
            t,
            Some(i + 1),
            &args.options(),
            report_start,
            report_complete,
        );
        failed += report.failures().count();
        bytes += report.total_bytes();
    }

    println!("\nBaked {} variations in {:.2?} ({} bytes)", times.len(), start.elapsed(), bytes);
    if failed > 0 {
        fail(format!("{} files failed to write", failed));
    }
    println!("Done!");
}

fn run_watch(args: &BakeArgs, duration: u64, frame_width: u32, frame_height: u32) {
    let config = args.resolve();

    println!("noisebake - Watch");
    println!("=================");
    print_config(&config, &args.output);
    println!("Regenerating once per second for {}s", duration);

    create_output_dir(&args.output);

    let options = args.options();
    let mut palette = Pipeline::new(config.clone());
    palette.add_stage(PaletteLutStage);
    let palette_report = palette.run(&args.output, config.time, None, &options);
    let lut = palette_report
        .get(StageId::PaletteLut)
        .and_then(|o| o.image.as_rgb().cloned())
        .unwrap_or_else(|| fail("Error: palette stage produced no image".to_string()));
    for output in palette_report.failures() {
        report_complete(output, 0, 1);
    }

    let pipeline = Pipeline::animated(config.clone());
    let frame_path = args.output.join("preview_frame.png");
    let png = PngExportOptions::default();
    let mut schedule = RegenSchedule::new();
    let start = Instant::now();
    let limit = Duration::from_secs(duration);

    loop {
        let elapsed = start.elapsed();
        if elapsed >= limit {
            break;
        }

        if let Some(tick) = schedule.poll(elapsed) {
            let t = config.time + tick as f64;
            let gen_start = Instant::now();
            let report = pipeline.run(&args.output, t, None, &options);
            for output in report.failures() {
                report_complete(output, 0, 1);
            }

            let fbm = report.get(StageId::FbmNoise).and_then(|o| o.image.as_gray());
            let warp = report.get(StageId::WarpMap).and_then(|o| o.image.as_rgb());
            if let (Some(fbm), Some(warp)) = (fbm, warp) {
                let params = CompositeParams::from_config(
                    &config,
                    frame_width,
                    frame_height,
                    elapsed.as_secs_f64(),
                );
                let frame = composite_frame(fbm, warp, &lut, &params);
                if let Err(e) = save_png(&frame, &frame_path, &png) {
                    eprintln!("  Error writing preview frame: {}", e);
                }
            }

            println!("  [t={}] Regenerated in {:.2?}", t, gen_start.elapsed());
        }

        std::thread::sleep(Duration::from_millis(50));
    }

    println!("Done!");
}

fn run_inspect(
    input: &Path,
    width: Option<u32>,
    height: Option<u32>,
    output: Option<PathBuf>,
    fallback: bool,
    config: Option<PathBuf>,
) {
    let inferred = || {
        let config = match &config {
            Some(path) => BakeConfig::load(path).unwrap_or_else(|e| {
                fail(format!("Error loading config {}: {}", path.display(), e))
            }),
            None => BakeConfig::default(),
        };
        input
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(StageId::from_file_name)
            .map(|id| id.dimensions(&config))
    };

    let (width, height) = match (width, height) {
        (Some(w), Some(h)) => (w, h),
        (w, h) => {
            let (iw, ih) = inferred().unwrap_or_else(|| {
                fail(format!(
                    "Error: cannot infer dimensions of {}; pass --width and --height",
                    input.display()
                ))
            });
            (w.unwrap_or(iw), h.unwrap_or(ih))
        }
    };

    let texture = if fallback {
        load_rgb555_or_fallback(input, width, height)
    } else {
        load_rgb555(input, width, height).unwrap_or_else(|e| {
            fail(format!("Error reading {}: {}", input.display(), e))
        })
    };

    let output = output.unwrap_or_else(|| input.with_extension("png"));
    save_png(&texture.to_rgb_image(), &output, &PngExportOptions::default()).unwrap_or_else(|e| {
        fail(format!("Error exporting PNG: {}", e))
    });

    println!("Decoded {}x{} texture: {}", width, height, output.display());
}

fn run_info(config: &BakeConfig) {
    println!("noisebake - Texture Configuration Info");
    println!("======================================");
    println!();

    let mut total = 0;
    for id in StageId::all() {
        let (w, h) = id.dimensions(config);
        let bytes = expected_file_size(w, h);
        total += bytes;
        println!(
            "  {:<20} {:>5}x{:<5} {:>8} bytes",
            id.file_name(None, "rgb555"),
            w,
            h,
            bytes
        );
    }

    println!();
    println!("Total texture memory: {} bytes ({:.2} KiB)", total, total as f64 / 1024.0);
    println!();
    println!("Config:");
    match config.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
