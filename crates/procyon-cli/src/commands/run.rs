use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use procyon_core::host::LocalSession;
use procyon_core::pipeline::config::{PipelineConfig, Step};
use procyon_core::pipeline::{PipelineRunner, StatusSink};

#[derive(Args)]
pub struct RunArgs {
    /// Base image file (TIFF or PNG)
    pub file: PathBuf,

    /// Pipeline config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Persist an artifact after every step, not only the final one
    #[arg(long)]
    pub save_every_step: bool,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let mut config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid pipeline config")?
    } else {
        PipelineConfig::default()
    };
    if args.save_every_step {
        config.save_every_step = true;
    }

    let enabled: Vec<String> = config
        .steps
        .iter()
        .filter(|s| s.enabled)
        .map(|s| s.step.to_string())
        .collect();

    println!("Procyon Pipeline");
    println!("  Input:    {}", args.file.display());
    println!("  Steps:    {}", enabled.join(", "));
    println!(
        "  Artifacts: {}",
        if config.save_every_step {
            "after every step"
        } else {
            "final only"
        }
    );
    println!();

    let pb = ProgressBar::new(enabled.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:24} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );

    let mut session = LocalSession::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let mut runner = PipelineRunner::new();
    let sink = ProgressSink { bar: pb.clone() };

    let final_path = runner.run(&config, &mut session, &sink)?;

    pb.finish_with_message("Done");
    println!("\nResult saved to {}", final_path.display());

    Ok(())
}

struct ProgressSink {
    bar: ProgressBar,
}

impl StatusSink for ProgressSink {
    fn step_started(&self, step: &Step) {
        self.bar.set_message(step.to_string());
    }

    fn step_finished(&self, _step: &Step) {
        self.bar.inc(1);
    }

    fn artifact_saved(&self, path: &Path) {
        self.bar
            .println(format!("  saved {}", path.display()));
    }
}
