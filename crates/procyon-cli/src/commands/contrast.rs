use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use procyon_core::curve::{self, ControlPoint, ControlPointSet, CurveMethod};
use procyon_core::io::image_io::{load_image, save_image};

#[derive(Args)]
pub struct ContrastArgs {
    /// Input image file (TIFF or PNG)
    pub file: PathBuf,

    /// Contrast adjustment method
    #[arg(long, value_enum, default_value = "linear")]
    pub method: MethodArg,

    /// Contrast factor for the linear method (>1 increases contrast)
    #[arg(long, default_value = "1.5")]
    pub alpha: f32,

    /// Brightness offset for the linear method
    #[arg(long, default_value = "0.0")]
    pub beta: f32,

    /// Gain factor for the sigmoid method
    #[arg(long, default_value = "5.0")]
    pub gain: f32,

    /// Cutoff value for the sigmoid method
    #[arg(long, default_value = "0.5")]
    pub cutoff: f32,

    /// Gamma value for gamma correction
    #[arg(long, default_value = "0.5")]
    pub gamma: f32,

    /// Control points for cubic spline as "x1,y1;x2,y2;..." (values in 0-1)
    #[arg(long)]
    pub control_points: Option<String>,

    /// Output file path (default: {stem}_contrast{ext} beside the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MethodArg {
    Linear,
    Sigmoid,
    Gamma,
    Equalize,
    CubicSpline,
}

pub fn run(args: &ContrastArgs) -> Result<()> {
    let buffer = load_image(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    println!(
        "Loaded {}x{} image ({} channel(s))",
        buffer.width(),
        buffer.height(),
        buffer.channels()
    );

    let method = build_method(args)?;
    let adjusted = curve::apply(&buffer, &method)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.file));
    save_image(&adjusted, &output)?;
    println!("Saved contrast-adjusted image to {}", output.display());

    Ok(())
}

fn build_method(args: &ContrastArgs) -> Result<CurveMethod> {
    let method = match args.method {
        MethodArg::Linear => CurveMethod::Linear {
            alpha: args.alpha,
            beta: args.beta,
        },
        MethodArg::Sigmoid => CurveMethod::Sigmoid {
            gain: args.gain,
            cutoff: args.cutoff,
        },
        MethodArg::Gamma => CurveMethod::Gamma { gamma: args.gamma },
        MethodArg::Equalize => CurveMethod::Equalize,
        MethodArg::CubicSpline => {
            let points = match &args.control_points {
                Some(spec) => parse_control_points(spec)?,
                None => default_control_points(),
            };
            CurveMethod::CubicSpline(points)
        }
    };
    Ok(method)
}

fn parse_control_points(spec: &str) -> Result<ControlPointSet> {
    let mut points = Vec::new();
    for pair in spec.split(';') {
        let (x, y) = pair
            .split_once(',')
            .context("Control points must be 'x1,y1;x2,y2;...'")?;
        points.push(ControlPoint::new(
            x.trim().parse::<f32>().context("Invalid control point x")?,
            y.trim().parse::<f32>().context("Invalid control point y")?,
        ));
    }
    ControlPointSet::new(points).context("Invalid control point set")
}

fn default_control_points() -> ControlPointSet {
    // Gentle S-curve: darken the shadows, lift the light midtones.
    ControlPointSet::new(vec![
        ControlPoint::new(0.0, 0.0),
        ControlPoint::new(0.25, 0.15),
        ControlPoint::new(0.5, 0.5),
        ControlPoint::new(0.75, 0.85),
        ControlPoint::new(1.0, 1.0),
    ])
    .expect("default control points are valid")
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
    let name = format!("{stem}_contrast{extension}");
    match input.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}
