//! Snip-file parsing.
//!
//! Handles the plain-text manifest format:
//!
//! ```text
//! [Meta]
//! Artist: Some Artist
//! Album: Some Album
//!
//! [Tracks]
//! 0:00 First Track
//! 3:45 Second Track
//! 7:10
//! ```
//!
//! The final track-mode line has no title; it marks where the last track
//! ends.

use std::path::Path;

use super::types::{parse_timestamp, Manifest, ManifestError, ManifestResult, TrackEntry};

/// Which section the line loop is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Meta,
    Tracks,
}

/// Parse a manifest from a file.
pub fn parse_manifest_file(path: &Path) -> ManifestResult<Manifest> {
    let content = std::fs::read_to_string(path)?;
    parse_manifest(&content)
}

/// Parse manifest text into a [`Manifest`].
///
/// Lines are processed in order. Blank lines and lines starting with `#`
/// are skipped. `[Meta]` and `[Tracks]` switch the section; before any
/// header the parser is in track mode.
pub fn parse_manifest(text: &str) -> ManifestResult<Manifest> {
    let mut manifest = Manifest::default();
    let mut section = Section::Tracks;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;

        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line == "[Meta]" {
            section = Section::Meta;
            continue;
        }
        if line == "[Tracks]" {
            section = Section::Tracks;
            continue;
        }

        match section {
            Section::Meta => {
                let (key, value) =
                    parse_meta_line(line).ok_or_else(|| ManifestError::MalformedMeta {
                        line: line_no,
                        text: line.to_string(),
                    })?;
                manifest.meta.insert(key, value);
            }
            Section::Tracks => {
                manifest.tracks.push(parse_track_line(line, line_no)?);
            }
        }
    }

    Ok(manifest)
}

/// Parse a `Key: Value` metadata line.
///
/// The key is everything before the first `:`; the value starts after the
/// first space that follows the colon.
fn parse_meta_line(line: &str) -> Option<(String, String)> {
    let colon = line.find(':')?;
    let key = &line[..colon];

    let after_colon = &line[colon + 1..];
    let space = after_colon.find(' ')?;
    let value = &after_colon[space + 1..];

    Some((key.to_string(), value.to_string()))
}

/// Parse a `TIMESTAMP` or `TIMESTAMP TITLE` track line.
fn parse_track_line(line: &str, line_no: usize) -> ManifestResult<TrackEntry> {
    let (stamp_text, title) = match line.split_once(' ') {
        Some((stamp, rest)) => (stamp, Some(rest.to_string())),
        None => (line, None),
    };

    let timestamp =
        parse_timestamp(stamp_text).ok_or_else(|| ManifestError::MalformedTimestamp {
            line: line_no,
            text: line.to_string(),
        })?;

    Ok(TrackEntry { timestamp, title })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const SAMPLE: &str = "\
[Meta]
Artist: Some Artist
Album: Some Album
Genre: Electronic
Year: 2020

[Tracks]
# intro is part of the first track
0:00 First Track
3:45 Second Track
1:07:10 Third Track
1:10:30
";

    #[test]
    fn parse_sample_manifest() {
        let manifest = parse_manifest(SAMPLE).unwrap();

        assert_eq!(manifest.meta_value("Artist"), Some("Some Artist"));
        assert_eq!(manifest.meta_value("Album"), Some("Some Album"));
        assert_eq!(manifest.meta_value("Genre"), Some("Electronic"));
        assert_eq!(manifest.meta_value("Year"), Some("2020"));

        assert_eq!(manifest.tracks.len(), 4);
        assert_eq!(manifest.track_count(), 3);

        assert_eq!(manifest.tracks[0].timestamp, Duration::ZERO);
        assert_eq!(manifest.tracks[0].title.as_deref(), Some("First Track"));
        assert_eq!(manifest.tracks[1].timestamp, Duration::from_secs(225));
        assert_eq!(manifest.tracks[2].timestamp, Duration::from_secs(4030));

        // Sentinel: timestamp only, no title.
        assert_eq!(manifest.tracks[3].timestamp, Duration::from_secs(4230));
        assert_eq!(manifest.tracks[3].title, None);
    }

    #[test]
    fn initial_section_is_tracks() {
        let manifest = parse_manifest("0:00 A\n0:10\n").unwrap();
        assert_eq!(manifest.track_count(), 1);
        assert!(manifest.meta.is_empty());
    }

    #[test]
    fn sections_can_switch_back() {
        let text = "[Meta]\nArtist: X\n[Tracks]\n0:00 A\n[Meta]\nAlbum: Y\n[Tracks]\n0:10\n";
        let manifest = parse_manifest(text).unwrap();
        assert_eq!(manifest.meta_value("Artist"), Some("X"));
        assert_eq!(manifest.meta_value("Album"), Some("Y"));
        assert_eq!(manifest.tracks.len(), 2);
    }

    #[test]
    fn duplicate_meta_keys_overwrite() {
        let text = "[Meta]\nArtist: First\nArtist: Second\n[Tracks]\n0:00 A\n0:10\n";
        let manifest = parse_manifest(text).unwrap();
        assert_eq!(manifest.meta_value("Artist"), Some("Second"));
    }

    #[test]
    fn title_keeps_everything_after_first_space() {
        let manifest = parse_manifest("0:00 Title - With (Extras)\n0:10\n").unwrap();
        assert_eq!(
            manifest.tracks[0].title.as_deref(),
            Some("Title - With (Extras)")
        );
    }

    #[test]
    fn malformed_timestamp_names_line() {
        let err = parse_manifest("0:00 A\nnonsense B\n").unwrap_err();
        match err {
            ManifestError::MalformedTimestamp { line, text } => {
                assert_eq!(line, 2);
                assert_eq!(text, "nonsense B");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn four_field_timestamp_is_rejected() {
        let err = parse_manifest("1:2:3:4 A\n").unwrap_err();
        assert!(matches!(err, ManifestError::MalformedTimestamp { .. }));
    }

    #[test]
    fn meta_line_without_colon_fails() {
        let err = parse_manifest("[Meta]\nArtist Some Artist\n").unwrap_err();
        match err {
            ManifestError::MalformedMeta { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn comments_and_blanks_are_skipped() {
        let text = "# header comment\n\n0:00 A\n\n# middle\n0:10\n";
        let manifest = parse_manifest(text).unwrap();
        assert_eq!(manifest.tracks.len(), 2);
    }
}
