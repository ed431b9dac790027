//! Sequential split pipeline.
//!
//! One run: validate inputs, parse the manifest, plan the intervals,
//! measure loudness if requested, then extract and tag each selected track
//! in order. Everything is blocking and fail-fast; a failure mid-run leaves
//! already-produced files in place.

use std::path::PathBuf;

use crate::command::CommandError;
use crate::config::Settings;
use crate::encode;
use crate::loudness::{self, LoudnessError};
use crate::manifest::{self, Manifest, ManifestError};
use crate::plan::{self, PlanError};
use crate::tags::{self, TagError};

/// Inputs for one split run.
#[derive(Debug, Clone)]
pub struct SplitRequest {
    /// Path to the snip-file manifest.
    pub manifest_path: PathBuf,
    /// Path to the source media to split.
    pub media_path: PathBuf,
    /// Echo commands instead of running them; write nothing.
    pub simulate: bool,
    /// Run the two-pass loudness normalization.
    pub normalize: bool,
    /// 1-based track numbers to extract. `None` extracts all.
    pub selection: Option<Vec<usize>>,
    /// Fade into the first overall track (seconds).
    pub fade_in: Option<f64>,
    /// Fade out of the last overall track (seconds).
    pub fade_out: Option<f64>,
}

/// What a completed run produced (or, when simulating, would produce).
#[derive(Debug, Clone)]
pub struct SplitReport {
    /// Output file paths in processing order.
    pub outputs: Vec<PathBuf>,
}

/// Error types for the pipeline, naming the failing stage.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Manifest file not found: {0}")]
    ManifestNotFound(PathBuf),

    #[error("Media file not found: {0}")]
    MediaNotFound(PathBuf),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("Manifest metadata is missing \"{key}\"")]
    MissingMeta { key: &'static str },

    #[error("Normalization failed: {0}")]
    Normalization(#[from] LoudnessError),

    #[error("Extracting track {number} failed: {source}")]
    Extraction {
        number: usize,
        #[source]
        source: CommandError,
    },

    #[error("Tagging track {number} failed: {source}")]
    Tagging {
        number: usize,
        #[source]
        source: TagError,
    },
}

/// Type alias for pipeline results.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Run one split from manifest to tagged output files.
pub fn run(request: &SplitRequest, settings: &Settings) -> PipelineResult<SplitReport> {
    if !request.manifest_path.exists() {
        return Err(PipelineError::ManifestNotFound(
            request.manifest_path.clone(),
        ));
    }
    if !request.media_path.exists() {
        return Err(PipelineError::MediaNotFound(request.media_path.clone()));
    }

    let manifest = manifest::parse_manifest_file(&request.manifest_path)?;
    let plans = plan::build_plans(&manifest, request.selection.as_deref())?;
    let track_count = manifest.track_count();
    let artist = artist(&manifest)?.to_string();

    let loudnorm = if request.normalize {
        println!("Preprocessing media for normalization...");
        Some(loudness::measure(
            &request.media_path,
            &settings.loudness,
            request.simulate,
        )?)
    } else {
        None
    };

    let mut outputs = Vec::with_capacity(plans.len());
    for track in &plans {
        let output = PathBuf::from(plan::output_filename(track, &artist));
        println!(
            "[{}/{}] Snipping '{}'",
            track.number, track_count, track.title
        );

        let mut filters = Vec::new();
        if let Some(params) = &loudnorm {
            filters.push(loudness::render_filter(params, &settings.loudness));
        }
        filters.extend(encode::fade_filters(
            track,
            track_count,
            request.fade_in,
            request.fade_out,
        ));

        encode::extract_track(
            &request.media_path,
            &output,
            track,
            &settings.encode,
            &filters,
            request.simulate,
        )
        .map_err(|e| PipelineError::Extraction {
            number: track.number,
            source: e,
        })?;

        tags::tag_track(&output, &manifest, track, track_count, request.simulate).map_err(
            |e| PipelineError::Tagging {
                number: track.number,
                source: e,
            },
        )?;

        outputs.push(output);
    }

    Ok(SplitReport { outputs })
}

/// The artist tag names every output file; resolve it up front.
fn artist(manifest: &Manifest) -> PipelineResult<&str> {
    manifest
        .meta_value("Artist")
        .ok_or(PipelineError::MissingMeta { key: "Artist" })
}
