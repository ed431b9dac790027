//! snip - split a long recording into individually tagged track files.
//!
//! Reads a snip-file manifest of timestamps and titles, then drives the
//! external encoder once per track. See `snip --help` for the flag surface.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use snip_core::config::Settings;
use snip_core::pipeline::{self, SplitRequest};
use snip_core::plan;

/// Command-line arguments for snip.
#[derive(Parser, Debug)]
#[command(name = "snip")]
#[command(about = "Split a long recording into individually tagged tracks")]
#[command(version)]
struct Args {
    /// Manifest file holding timestamps and titles
    manifest: PathBuf,

    /// Media file to split
    media: PathBuf,

    /// Only print the encoder calls that would be made
    #[arg(short, long)]
    simulate: bool,

    /// Comma-separated 1-based track numbers to extract (default: all)
    #[arg(short, long, value_name = "NUMBERS", conflicts_with = "limit")]
    tracks: Option<String>,

    /// Limit processing to the first N tracks
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    limit: Option<u64>,

    /// Normalize volume of the extracted tracks (two-pass loudnorm)
    #[arg(short, long)]
    normalize: bool,

    /// Fade into the first track (seconds)
    #[arg(long, value_name = "SECONDS")]
    fade_in: Option<f64>,

    /// Fade out of the last track (seconds)
    #[arg(long, value_name = "SECONDS")]
    fade_out: Option<f64>,

    /// Settings file (TOML)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    snip_core::logging::init_tracing("snip=info");

    let args = Args::parse();

    let settings = Settings::load_or_default(args.config.as_deref())
        .context("Failed to load settings")?;

    let selection = match (&args.tracks, args.limit) {
        (Some(text), _) => Some(plan::parse_selection(text)?),
        (None, Some(n)) => Some((1..=n as usize).collect()),
        (None, None) => None,
    };

    let request = SplitRequest {
        manifest_path: args.manifest,
        media_path: args.media,
        simulate: args.simulate,
        normalize: args.normalize,
        selection,
        fade_in: args.fade_in,
        fade_out: args.fade_out,
    };

    let report = pipeline::run(&request, &settings)?;
    tracing::debug!("Run finished with {} track(s)", report.outputs.len());

    Ok(())
}
