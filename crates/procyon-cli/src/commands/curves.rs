use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use procyon_core::curve::{self, CurveMethod, PiecewiseParams};
use procyon_core::io::image_io::{load_image, save_image};

#[derive(Args)]
pub struct CurvesArgs {
    /// Input image file (TIFF or PNG)
    pub file: PathBuf,

    /// Lower breakpoint in source sample values
    #[arg(long, default_value = "50.0")]
    pub r1: f32,

    /// Output value at the lower breakpoint
    #[arg(long, default_value = "0.0")]
    pub s1: f32,

    /// Upper breakpoint in source sample values
    #[arg(long, default_value = "200.0")]
    pub r2: f32,

    /// Output value at the upper breakpoint
    #[arg(long, default_value = "255.0")]
    pub s2: f32,

    /// Output file path (default: {stem}_curves{ext} beside the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &CurvesArgs) -> Result<()> {
    let buffer = load_image(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    println!(
        "Loaded {}x{} image ({} channel(s))",
        buffer.width(),
        buffer.height(),
        buffer.channels()
    );

    let method = CurveMethod::PiecewiseLinear(PiecewiseParams {
        r1: args.r1,
        s1: args.s1,
        r2: args.r2,
        s2: args.s2,
    });
    let stretched = curve::apply(&buffer, &method)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.file));
    save_image(&stretched, &output)?;
    println!("Saved stretched image to {}", output.display());

    Ok(())
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = input
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let name = format!("{stem}_curves{extension}");
    match input.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}
