//! Interval planning.
//!
//! Turns consecutive manifest timestamps into per-track (start, duration)
//! plans and applies track-selection filtering. All selection errors abort
//! before any extraction starts; there is no partial selection.

use std::time::Duration;

use crate::manifest::{format_timestamp, Manifest};

/// Everything needed to extract one output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackPlan {
    /// 1-based track number within the manifest.
    pub number: usize,
    /// Track title from the manifest line.
    pub title: String,
    /// Offset of the track within the source media.
    pub start: Duration,
    /// Length of the track (next boundary minus this one).
    pub duration: Duration,
}

/// Error types for planning and track selection.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// The manifest cannot yield any track interval.
    #[error("Manifest needs at least two track entries, found {0}")]
    TooFewTracks(usize),

    /// A selection entry was not a number.
    #[error("Invalid track number: \"{0}\"")]
    InvalidTrackNumber(String),

    /// A selection entry was outside the extractable range.
    #[error("Track number {number} out of range 1..={count}")]
    TrackOutOfRange { number: usize, count: usize },

    /// A non-sentinel track entry is missing its title.
    #[error("Track {number} has no title")]
    MissingTitle { number: usize },

    /// Consecutive boundaries are out of order or equal, which would give
    /// the track a non-positive duration.
    #[error("Track {number} does not end after it starts ({start} >= {end})")]
    NonMonotonicTimestamps {
        number: usize,
        start: String,
        end: String,
    },
}

/// Type alias for planning results.
pub type PlanResult<T> = Result<T, PlanError>;

/// Parse a comma-separated list of 1-based track numbers.
///
/// Order and duplicates are preserved; range checking happens against the
/// manifest in [`build_plans`].
pub fn parse_selection(text: &str) -> PlanResult<Vec<usize>> {
    text.split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<usize>()
                .map_err(|_| PlanError::InvalidTrackNumber(part.to_string()))
        })
        .collect()
}

/// Build the ordered list of plans to extract.
///
/// With no selection, all tracks `1..=count` are planned in manifest order.
/// The interval for track `n` runs from boundary `n-1` to boundary `n`;
/// boundaries that do not strictly increase are rejected here rather than
/// handed to the encoder as a zero or negative duration.
pub fn build_plans(manifest: &Manifest, selection: Option<&[usize]>) -> PlanResult<Vec<TrackPlan>> {
    let count = manifest.track_count();
    if count == 0 {
        return Err(PlanError::TooFewTracks(manifest.tracks.len()));
    }

    let numbers: Vec<usize> = match selection {
        Some(numbers) => numbers.to_vec(),
        None => (1..=count).collect(),
    };

    let mut plans = Vec::with_capacity(numbers.len());
    for number in numbers {
        if number < 1 || number > count {
            return Err(PlanError::TrackOutOfRange { number, count });
        }

        let entry = &manifest.tracks[number - 1];
        let end = manifest.tracks[number].timestamp;

        if end <= entry.timestamp {
            return Err(PlanError::NonMonotonicTimestamps {
                number,
                start: format_timestamp(entry.timestamp),
                end: format_timestamp(end),
            });
        }

        let title = entry
            .title
            .clone()
            .ok_or(PlanError::MissingTitle { number })?;

        plans.push(TrackPlan {
            number,
            title,
            start: entry.timestamp,
            duration: end - entry.timestamp,
        });
    }

    Ok(plans)
}

/// Output filename for one plan: `"NN Artist - Title.mp3"`.
pub fn output_filename(plan: &TrackPlan, artist: &str) -> String {
    format!("{:02} {} - {}.mp3", plan.number, artist, plan.title)
}
