//! svg2icon - converts an SVG file into Windows and macOS icon files.
//!
//! The output path decides what is written: a directory receives both
//! `<name>.ico` and `<name>.icns`, a `.ico` or `.icns` path receives that
//! format only, and a `.icon` path or one without an extension receives
//! both formats side by side.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use svg2icon::{plan_outputs, save, SvgRasterizer};

#[derive(Parser)]
#[command(name = "svg2icon")]
#[command(about = "Convert an SVG image into .ico and .icns icon files")]
#[command(version)]
struct Cli {
    /// Input SVG file
    input: PathBuf,

    /// Output file (.ico, .icns, .icon) or directory
    output: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .init();

    let targets = plan_outputs(&cli.input, &cli.output)
        .with_context(|| format!("Invalid output path {:?}", cli.output))?;
    let rasterizer = SvgRasterizer::open(&cli.input)
        .with_context(|| format!("Failed to load {:?}", cli.input))?;
    tracing::info!("Converting {:?}", cli.input);

    // Each format is attempted even if another one failed.
    let mut failures = 0;
    for (format, path) in &targets {
        if let Err(error) = save(*format, &rasterizer, path) {
            tracing::error!("{} conversion failed: {:#}",
                            format,
                            anyhow::Error::new(error));
            failures += 1;
        }
    }
    if failures > 0 {
        anyhow::bail!("{} of {} icon file(s) could not be created",
                      failures,
                      targets.len());
    }
    tracing::info!("Done!");
    Ok(())
}
