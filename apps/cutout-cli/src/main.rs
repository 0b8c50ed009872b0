mod gallery;

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use cutout_core::{
    AlphaMask, CutoutResult, EventSink, PixelBuffer, SegmentationProvider,
    DEFAULT_CONFIDENCE_CUTOFF,
};
use cutout_runtime_luma::LumaProvider;
use cutout_samples::SampleId;
use cutout_telemetry::sink_from_env;
use gallery::GalleryRunner;

#[derive(Parser, Debug)]
#[command(name = "cutout", version, about = "Selfie cutout demo pipeline")]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: TopLevelCommand,
}

#[derive(Subcommand, Debug)]
enum TopLevelCommand {
    /// List the bundled sample images
    Samples,
    /// Process one input (bundled sample id or image file)
    #[command(name = "exec")]
    Exec(ExecArgs),
    /// Process the whole sample gallery concurrently
    Gallery(GalleryArgs),
}

#[derive(Args, Debug)]
struct ExecArgs {
    /// Bundled sample id or path to an image file
    #[arg(long, short = 'i')]
    input: String,
    #[arg(long, short = 'c', default_value_t = DEFAULT_CONFIDENCE_CUTOFF)]
    cutoff: f32,
    /// Artificial provider latency in milliseconds
    #[arg(long)]
    latency_ms: Option<u64>,
    #[arg(long, short = 'o')]
    output_cutout: Option<PathBuf>,
    #[arg(long, short = 'm')]
    output_mask: Option<PathBuf>,
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    profile: bool,
}

#[derive(Args, Debug)]
struct GalleryArgs {
    #[arg(long, default_value = "cutouts")]
    output_dir: PathBuf,
    #[arg(long, short = 'c', default_value_t = DEFAULT_CONFIDENCE_CUTOFF)]
    cutoff: f32,
    /// Artificial provider latency in milliseconds
    #[arg(long)]
    latency_ms: Option<u64>,
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    profile: bool,
}

static RUNTIME: OnceLock<tokio::runtime::Runtime> = OnceLock::new();

pub(crate) fn rt() -> &'static tokio::runtime::Runtime {
    RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("tokio runtime")
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        TopLevelCommand::Samples => run_samples(),
        TopLevelCommand::Exec(args) => run_exec(args),
        TopLevelCommand::Gallery(args) => run_gallery(args),
    }
}

fn run_samples() -> Result<()> {
    let mut entries = Vec::new();
    for sample in SampleId::all() {
        let img = cutout_samples::render(sample);
        entries.push(serde_json::json!({
            "id": sample.id(),
            "description": sample.description(),
            "width": img.width(),
            "height": img.height(),
        }));
    }
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

fn run_exec(args: ExecArgs) -> Result<()> {
    let (label, original) = resolve_input(&args.input)?;
    let provider = build_provider(args.latency_ms);
    let events = sink_from_env();

    let start = Instant::now();
    let result = rt()
        .block_on(cutout_core::remove_background_with_events(
            provider.as_ref(),
            &original,
            args.cutoff,
            &label,
            events.as_deref(),
        ))
        .with_context(|| format!("processing '{}'", label))?;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    let cutout_path = args
        .output_cutout
        .unwrap_or_else(|| default_output_path(&args.input, &label, "cutout"));
    cutout_image::save_png(&result, &cutout_path)?;
    let mask_path = match args.output_mask {
        Some(path) => {
            let mask = mask_of(&result)?;
            let bytes = cutout_image::mask_to_luma_png(&mask)?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, bytes)?;
            Some(path)
        }
        None => None,
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "input": label,
            "width": result.width(),
            "height": result.height(),
            "outputCutout": cutout_path,
            "outputMask": mask_path,
            "timingsMs": if args.profile {
                Some(serde_json::json!({ "request": elapsed_ms }))
            } else {
                None
            },
        }))?
    );
    Ok(())
}

fn run_gallery(args: GalleryArgs) -> Result<()> {
    let provider = build_provider(args.latency_ms);
    let events: Option<Arc<dyn EventSink>> = sink_from_env().map(Arc::from);
    let mut runner = GalleryRunner::new(provider, events);
    let mut entries = Vec::new();

    for sample in SampleId::all() {
        let png = cutout_samples::render_png(sample)?;
        match cutout_image::decode_rgba(&png) {
            Ok(buffer) => runner.schedule(sample.id().to_string(), buffer, args.cutoff),
            // A broken sample only fails its own entry; the rest of the
            // gallery still runs.
            Err(err) => entries.push(serde_json::json!({
                "sample": sample.id(),
                "error": err.as_error_info(),
            })),
        }
    }

    for sample in SampleId::all() {
        if runner.is_busy(sample.id()) {
            tracing::debug!(sample = %sample, "request in flight");
        }
    }

    while let Some(outcome) = runner.wait_next() {
        let entry = match outcome.result {
            Ok(cutout) => {
                let cutout_path = args
                    .output_dir
                    .join(format!("{}_cutout.png", outcome.request));
                cutout_image::save_png(&cutout, &cutout_path)?;
                let mask = mask_of(&cutout)?;
                let mask_path = args.output_dir.join(format!("{}_mask.png", outcome.request));
                let mask_bytes = cutout_image::mask_to_luma_png(&mask)?;
                std::fs::write(&mask_path, mask_bytes)?;
                serde_json::json!({
                    "sample": outcome.request,
                    "width": cutout.width(),
                    "height": cutout.height(),
                    "outputCutout": cutout_path,
                    "outputMask": mask_path,
                    "timingsMs": if args.profile {
                        Some(serde_json::json!({ "request": outcome.elapsed_ms }))
                    } else {
                        None
                    },
                })
            }
            Err(err) => serde_json::json!({
                "sample": outcome.request,
                "error": err.as_error_info(),
            }),
        };
        entries.push(entry);
    }

    // Completion order depends on provider timing; keep the report stable.
    entries.sort_by(|a, b| a["sample"].as_str().cmp(&b["sample"].as_str()));
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({ "results": entries }))?
    );
    Ok(())
}

fn build_provider(latency_ms: Option<u64>) -> Arc<dyn SegmentationProvider> {
    match latency_ms {
        Some(ms) => Arc::new(LumaProvider::with_latency(Duration::from_millis(ms))),
        None => Arc::new(LumaProvider::new()),
    }
}

fn resolve_input(input: &str) -> Result<(String, PixelBuffer)> {
    if let Some(sample) = SampleId::from_id(input) {
        let png = cutout_samples::render_png(sample)?;
        let buffer = cutout_image::decode_rgba(&png)?;
        return Ok((sample.id().to_string(), buffer));
    }

    let path = Path::new(input);
    if !path.exists() {
        return Err(anyhow!(
            "'{}' is neither a bundled sample id nor an existing file",
            input
        ));
    }
    let bytes =
        std::fs::read(path).with_context(|| format!("reading input {}", path.display()))?;
    let buffer = cutout_image::decode_rgba(&bytes)?;
    let label = path
        .file_stem()
        .ok_or_else(|| anyhow!("input file must include a valid file name"))?
        .to_string_lossy()
        .to_string();
    Ok((label, buffer))
}

fn default_output_path(input: &str, label: &str, suffix: &str) -> PathBuf {
    let filename = format!("{}_{}.png", label, suffix);
    let as_path = Path::new(input);
    if as_path.exists() {
        if let Some(parent) = as_path.parent() {
            return parent.join(filename);
        }
    }
    PathBuf::from(filename)
}

/// The cutout's alpha channel is exactly the mask verdict, so the mask
/// image can be reconstructed from the result instead of re-running the
/// pipeline.
fn mask_of(result: &CutoutResult) -> Result<AlphaMask> {
    let opaque = result
        .data()
        .chunks_exact(4)
        .map(|px| px[3] == 255)
        .collect();
    AlphaMask::new(result.width(), result.height(), opaque).map_err(|e| anyhow!(e))
}
