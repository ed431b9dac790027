//! Manifest types and error definitions.
//!
//! A manifest (snip-file) carries free-form metadata tags and an ordered
//! list of track boundary timestamps.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A single track-mode manifest line: a boundary timestamp and, except for
/// the trailing end-of-media sentinel, a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackEntry {
    /// Offset from the start of the media file.
    pub timestamp: Duration,
    /// Track title. `None` for the sentinel end marker.
    pub title: Option<String>,
}

/// Parsed manifest: metadata tags plus the ordered track list.
///
/// Track order equals file order; the planner relies on this to compute
/// intervals from consecutive entries. The last entry marks where the
/// previous track ends and is never extracted itself, so N entries
/// describe N-1 extractable tracks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Metadata tags (commonly Artist, Album, Genre, Year). Duplicate keys
    /// in the file overwrite earlier values.
    pub meta: HashMap<String, String>,
    /// Track boundaries in file order.
    pub tracks: Vec<TrackEntry>,
}

impl Manifest {
    /// Look up a metadata tag by name.
    pub fn meta_value(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }

    /// Number of extractable tracks (entries minus the end sentinel).
    pub fn track_count(&self) -> usize {
        self.tracks.len().saturating_sub(1)
    }
}

/// Error types for manifest parsing.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// A track-mode line did not contain a valid timestamp.
    #[error("Malformed timestamp on line {line}: \"{text}\"")]
    MalformedTimestamp { line: usize, text: String },

    /// A metadata-mode line was not of the form `Key: Value`.
    #[error("Malformed metadata entry on line {line}: \"{text}\"")]
    MalformedMeta { line: usize, text: String },

    /// IO error reading the manifest file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for manifest operation results.
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Parse a boundary timestamp.
///
/// Three colon-separated integer fields are read as `H:MM:SS`, two as
/// `MM:SS`. Anything else is rejected.
pub fn parse_timestamp(text: &str) -> Option<Duration> {
    let parts: Vec<&str> = text.split(':').collect();

    let (hours, minutes, seconds): (u64, u64, u64) = match parts.as_slice() {
        [h, m, s] => (h.parse().ok()?, m.parse().ok()?, s.parse().ok()?),
        [m, s] => (0, m.parse().ok()?, s.parse().ok()?),
        _ => return None,
    };

    Some(Duration::from_secs(hours * 3600 + minutes * 60 + seconds))
}

/// Format a timestamp as HH:MM:SS for encoder arguments.
pub fn format_timestamp(timestamp: Duration) -> String {
    let total_secs = timestamp.as_secs();

    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_timestamp_three_fields() {
        assert_eq!(
            parse_timestamp("1:02:03"),
            Some(Duration::from_secs(3723))
        );
        assert_eq!(parse_timestamp("0:00:00"), Some(Duration::ZERO));
    }

    #[test]
    fn parse_timestamp_two_fields() {
        assert_eq!(parse_timestamp("02:03"), Some(Duration::from_secs(123)));
        assert_eq!(parse_timestamp("0:00"), Some(Duration::ZERO));
    }

    #[test]
    fn parse_timestamp_rejects_bad_input() {
        assert_eq!(parse_timestamp("abc"), None);
        assert_eq!(parse_timestamp("1:2:3:4"), None);
        assert_eq!(parse_timestamp("12"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("1:xx"), None);
    }

    #[test]
    fn format_timestamp_works() {
        assert_eq!(format_timestamp(Duration::ZERO), "00:00:00");
        assert_eq!(format_timestamp(Duration::from_secs(225)), "00:03:45");
        assert_eq!(format_timestamp(Duration::from_secs(3723)), "01:02:03");
    }

    #[test]
    fn timestamp_roundtrip() {
        let original = Duration::from_secs(4521);
        let formatted = format_timestamp(original);
        assert_eq!(parse_timestamp(&formatted), Some(original));
    }

    #[test]
    fn track_count_excludes_sentinel() {
        let manifest = Manifest {
            meta: HashMap::new(),
            tracks: vec![
                TrackEntry {
                    timestamp: Duration::ZERO,
                    title: Some("A".into()),
                },
                TrackEntry {
                    timestamp: Duration::from_secs(10),
                    title: None,
                },
            ],
        };
        assert_eq!(manifest.track_count(), 1);
        assert_eq!(Manifest::default().track_count(), 0);
    }
}
