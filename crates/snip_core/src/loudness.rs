//! Two-pass loudness measurement.
//!
//! Pass 1 runs the encoder in analysis-only mode (`loudnorm` filter with
//! `print_format=json`, null muxer) and recovers the measured statistics
//! from its diagnostic stream. Pass 2 happens per track in the encode
//! module, which injects [`render_filter`] into the encode command.
//!
//! The diagnostic format is a contract with the external tool: the JSON
//! blob follows a `Parsed_loudnorm` marker on stderr. The scraping half is
//! kept as a pure function over the captured text so it can be tested and
//! swapped without touching process execution.

use std::path::Path;

use serde::Deserialize;

use crate::command::{self, CommandError};
use crate::config::LoudnessSettings;

/// Marker preceding the JSON statistics in the tool's diagnostic stream.
pub const LOUDNORM_MARKER: &str = "Parsed_loudnorm";

/// Measured loudness statistics from the analysis pass.
///
/// The tool prints every value as a JSON string; they are kept verbatim
/// and passed back unmodified when building the correction filter.
#[derive(Debug, Clone, Deserialize)]
pub struct LoudnormParams {
    pub input_i: String,
    pub input_tp: String,
    pub input_lra: String,
    pub input_thresh: String,
    pub output_i: String,
    pub output_tp: String,
    pub output_lra: String,
    pub output_thresh: String,
    #[serde(default)]
    pub normalization_type: String,
    pub target_offset: String,
}

/// Error types for the measurement pass.
#[derive(Debug, thiserror::Error)]
pub enum LoudnessError {
    /// The analysis command failed to start or exited nonzero.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The diagnostic stream did not contain the loudnorm statistics.
    #[error("loudnorm statistics not found in encoder output")]
    MarkerNotFound,

    /// The statistics blob was not valid JSON.
    #[error("Failed to parse loudnorm statistics: {0}")]
    Json(#[from] serde_json::Error),
}

/// Type alias for measurement results.
pub type LoudnessResult<T> = Result<T, LoudnessError>;

/// Build the analysis-only command arguments.
///
/// The window only bounds how much material is sampled for measurement; it
/// never changes the boundaries used for the real per-track encode.
pub fn build_measure_args(
    media: &Path,
    settings: &LoudnessSettings,
    window_secs: u64,
) -> Vec<String> {
    vec![
        "-i".to_string(),
        media.display().to_string(),
        "-af".to_string(),
        format!(
            "loudnorm=I={}:LRA={}:tp={}:print_format=json",
            settings.integrated, settings.range, settings.true_peak
        ),
        "-f".to_string(),
        "null".to_string(),
        "-t".to_string(),
        window_secs.to_string(),
        "-".to_string(),
    ]
}

/// Run the measurement pass over the source media.
///
/// The pass runs even when simulating: it is read-only, and its result is
/// what makes the echoed encode commands complete. Simulation shortens the
/// sampling window and echoes the analysis command line as well.
pub fn measure(
    media: &Path,
    settings: &LoudnessSettings,
    simulate: bool,
) -> LoudnessResult<LoudnormParams> {
    let window_secs = if simulate {
        settings.simulate_window_secs
    } else {
        settings.analysis_window_secs
    };

    let args = build_measure_args(media, settings, window_secs);
    if simulate {
        println!("{}", command::render("ffmpeg", &args));
    }

    let output = command::run("ffmpeg", &args)?;
    let stderr = String::from_utf8_lossy(&output.stderr);

    let params = parse_loudnorm_stderr(&stderr)?;
    tracing::debug!("loudnorm statistics: {:?}", params);
    Ok(params)
}

/// Extract the loudnorm statistics from the captured diagnostic stream.
///
/// Finds the marker, scans forward to the first `{`, and parses up to the
/// closing `}` (the blob is a flat object).
pub fn parse_loudnorm_stderr(stderr: &str) -> LoudnessResult<LoudnormParams> {
    let marker = stderr
        .find(LOUDNORM_MARKER)
        .ok_or(LoudnessError::MarkerNotFound)?;

    let open = stderr[marker..]
        .find('{')
        .map(|i| marker + i)
        .ok_or(LoudnessError::MarkerNotFound)?;

    let close = stderr[open..]
        .find('}')
        .map(|i| open + i + 1)
        .ok_or(LoudnessError::MarkerNotFound)?;

    Ok(serde_json::from_str(&stderr[open..close])?)
}

/// Build the per-track correction filter from the measured statistics.
///
/// The correction pass uses the measured *output-side* statistics of the
/// analysis pass, not the raw input-side values, together with the same
/// targets the measurement ran with.
pub fn render_filter(params: &LoudnormParams, settings: &LoudnessSettings) -> String {
    format!(
        "loudnorm=I={}:LRA={}:tp={}:measured_I={}:measured_LRA={}:measured_tp={}:measured_thresh={}:offset={}",
        settings.integrated,
        settings.range,
        settings.true_peak,
        params.output_i,
        params.output_lra,
        params.output_tp,
        params.output_thresh,
        params.target_offset
    )
}
