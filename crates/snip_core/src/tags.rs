//! ID3 tagging for produced track files.
//!
//! Tags carry album, artist, genre, title, date, and a "track N of total"
//! pair. The frame set is built separately from the write so it can be
//! inspected without touching the filesystem.

use std::path::Path;

use id3::{Frame, Tag, TagLike, Version};

use crate::manifest::Manifest;
use crate::plan::TrackPlan;

/// Error types for tagging.
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    /// The manifest is missing a tag the output file needs.
    #[error("Manifest metadata is missing \"{0}\"")]
    MissingMeta(&'static str),

    /// The tag could not be written to the output file.
    #[error("Failed to write tags: {0}")]
    Write(#[from] id3::Error),
}

/// Type alias for tagging results.
pub type TagResult<T> = Result<T, TagError>;

fn require_meta<'a>(manifest: &'a Manifest, key: &'static str) -> TagResult<&'a str> {
    manifest.meta_value(key).ok_or(TagError::MissingMeta(key))
}

/// Build the ID3 tag for one track.
pub fn build_tag(manifest: &Manifest, plan: &TrackPlan, track_count: usize) -> TagResult<Tag> {
    let album = require_meta(manifest, "Album")?;
    let artist = require_meta(manifest, "Artist")?;
    let genre = require_meta(manifest, "Genre")?;
    let year = require_meta(manifest, "Year")?;

    let mut tag = Tag::new();
    tag.set_album(album);
    tag.set_artist(artist);
    tag.set_genre(genre);
    tag.set_title(plan.title.clone());
    tag.set_track(plan.number as u32);
    tag.set_total_tracks(track_count as u32);
    tag.add_frame(Frame::text("TDRC", year));

    Ok(tag)
}

/// Tag one produced file, or report what would be written when simulating.
///
/// Simulate mode performs no I/O at all; failures otherwise propagate and
/// end the run.
pub fn tag_track(
    path: &Path,
    manifest: &Manifest,
    plan: &TrackPlan,
    track_count: usize,
    simulate: bool,
) -> TagResult<()> {
    if simulate {
        println!(
            "Would tag \"{}\": {} ({} of {})",
            path.display(),
            plan.title,
            plan.number,
            track_count
        );
        return Ok(());
    }

    let tag = build_tag(manifest, plan, track_count)?;
    tag.write_to_path(path, Version::Id3v24)?;

    tracing::info!("Tagged {}", path.display());
    Ok(())
}
