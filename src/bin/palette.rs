use anyhow::{Context, Result, bail};
use clap::Parser;
use image_to_palette_wasm::{
    ExtractorConfig, Palette, PaletteExtractor, extract_palette_bytes, source,
};
use log::{LevelFilter, info};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Print the dominant colors of images.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    inputs: Vec<PathBuf>,

    /// JSON file holding an array of [r, g, b] pixels, used instead of images
    #[arg(long, conflicts_with = "inputs")]
    pixels: Option<PathBuf>,

    /// Number of colors in the palette
    #[arg(short = 'k', long)]
    n_colors: Option<usize>,

    /// Shrink images so the longest side is at most this many pixels
    #[arg(short, long)]
    downscale: Option<u32>,

    /// JSON config file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print a JSON document instead of text
    #[arg(long)]
    json: bool,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct Report<'a> {
    source: String,
    palette: &'a Palette,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_config(args: &Args) -> Result<ExtractorConfig> {
    let mut config = match &args.config {
        Some(path) => ExtractorConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ExtractorConfig::default(),
    };
    if let Some(k) = args.n_colors {
        config.k = k;
    }
    if args.downscale.is_some() {
        config.downscale = args.downscale;
    }
    config.validate().context("invalid settings")?;
    Ok(config)
}

fn palette_from_pixels(path: &Path, config: &ExtractorConfig) -> Result<Palette> {
    let text = fs::read_to_string(path)?;
    let document: serde_json::Value = serde_json::from_str(&text)?;
    let samples = source::json_samples(&document)?;
    let (palette, stats) = PaletteExtractor::new(config.clone()).extract_checked(samples);
    info!(
        "{}: {} pixels, {} skipped, {} buckets",
        path.display(),
        stats.accepted,
        stats.skipped,
        stats.buckets
    );
    Ok(palette)
}

fn print_text(source: &str, palette: &Palette) {
    println!("{source}");
    if palette.is_empty() {
        println!("  (no colors)");
    }
    for swatch in palette {
        println!("  {}  {:>8}", swatch.hex, swatch.weight);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let config = load_config(&args)?;

    let mut results = Vec::new();
    if let Some(path) = &args.pixels {
        let palette = palette_from_pixels(path, &config)
            .with_context(|| format!("reading pixels from {}", path.display()))?;
        results.push((path.display().to_string(), palette));
    } else {
        if args.inputs.is_empty() {
            bail!("no input images given (pass image paths or --pixels)");
        }
        for input in &args.inputs {
            let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
            let palette = extract_palette_bytes(&bytes, &config)
                .with_context(|| format!("extracting palette from {}", input.display()))?;
            info!("{}: {} colors", input.display(), palette.len());
            results.push((input.display().to_string(), palette));
        }
    }

    if args.json {
        let reports: Vec<Report<'_>> = results
            .iter()
            .map(|(source, palette)| Report {
                source: source.clone(),
                palette,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for (source, palette) in &results {
            print_text(source, palette);
        }
    }

    Ok(())
}
