//! Encode command construction and execution.
//!
//! One command per track plan: seek to the track start, read for the track
//! duration, strip video, and encode at the configured bitrate and sample
//! rate. Audio filters (loudness correction, edge fades) join into a single
//! filter chain. Command construction is pure; execution goes through the
//! shared command runner, or is echoed in simulate mode.

use std::path::Path;

use crate::command::{self, CommandResult};
use crate::config::EncodeSettings;
use crate::manifest::format_timestamp;
use crate::plan::TrackPlan;

/// Build the encode arguments for one track.
pub fn build_encode_args(
    media: &Path,
    output: &Path,
    plan: &TrackPlan,
    settings: &EncodeSettings,
    audio_filters: &[String],
) -> Vec<String> {
    let mut args = vec![
        "-ss".to_string(),
        format_timestamp(plan.start),
        "-i".to_string(),
        media.display().to_string(),
        "-t".to_string(),
        format_timestamp(plan.duration),
        "-vn".to_string(),
        "-acodec".to_string(),
        "libmp3lame".to_string(),
        "-ar".to_string(),
        settings.sample_rate.to_string(),
        "-b:a".to_string(),
        settings.bitrate.clone(),
        "-y".to_string(),
    ];

    if !audio_filters.is_empty() {
        args.push("-af".to_string());
        args.push(audio_filters.join(","));
    }

    args.push(output.display().to_string());
    args
}

/// Build the edge-fade filters that apply to this plan.
///
/// A fade-in attaches only to overall track 1; a fade-out only to the last
/// overall track (`track_count` counts all extractable tracks, not just the
/// selected ones). A fade longer than the track clamps to the track: the
/// fade starts at 0 and lasts the whole duration. Non-positive fade lengths
/// are ignored.
pub fn fade_filters(
    plan: &TrackPlan,
    track_count: usize,
    fade_in_secs: Option<f64>,
    fade_out_secs: Option<f64>,
) -> Vec<String> {
    let mut filters = Vec::new();

    if let Some(secs) = fade_in_secs {
        if secs > 0.0 && plan.number == 1 {
            filters.push(format!("afade=t=in:st=0:d={}", secs));
        }
    }

    if let Some(secs) = fade_out_secs {
        if secs > 0.0 && plan.number == track_count {
            let track_secs = plan.duration.as_secs_f64();
            let length = secs.min(track_secs);
            let start = track_secs - length;
            filters.push(format!("afade=t=out:st={}:d={}", start, length));
        }
    }

    filters
}

/// Extract one track, or echo the command when simulating.
///
/// In simulate mode the encoder is never spawned; the constructed command
/// line goes to stdout and the call reports success.
pub fn extract_track(
    media: &Path,
    output: &Path,
    plan: &TrackPlan,
    settings: &EncodeSettings,
    audio_filters: &[String],
    simulate: bool,
) -> CommandResult<()> {
    let args = build_encode_args(media, output, plan, settings, audio_filters);

    if simulate {
        println!("{}", command::render("ffmpeg", &args));
        return Ok(());
    }

    command::run("ffmpeg", &args)?;
    tracing::info!(
        "Extracted track {} to {}",
        plan.number,
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn plan(number: usize, duration_secs: u64) -> TrackPlan {
        TrackPlan {
            number,
            title: format!("Track {number}"),
            start: Duration::from_secs(60 * number as u64),
            duration: Duration::from_secs(duration_secs),
        }
    }

    #[test]
    fn encode_args_cover_interval_and_format() {
        let settings = EncodeSettings::default();
        let args = build_encode_args(
            Path::new("set.mp4"),
            Path::new("01 X - A.mp3"),
            &plan(1, 225),
            &settings,
            &[],
        );

        assert_eq!(
            args,
            vec![
                "-ss", "00:01:00", "-i", "set.mp4", "-t", "00:03:45", "-vn", "-acodec",
                "libmp3lame", "-ar", "44100", "-b:a", "320k", "-y", "01 X - A.mp3",
            ]
        );
    }

    #[test]
    fn no_filters_means_no_filter_flag() {
        let args = build_encode_args(
            Path::new("in.mp4"),
            Path::new("out.mp3"),
            &plan(1, 10),
            &EncodeSettings::default(),
            &[],
        );
        assert!(!args.contains(&"-af".to_string()));
    }

    #[test]
    fn filters_join_into_one_chain() {
        let filters = vec!["loudnorm=I=-6".to_string(), "afade=t=in:st=0:d=3".to_string()];
        let args = build_encode_args(
            Path::new("in.mp4"),
            Path::new("out.mp3"),
            &plan(1, 10),
            &EncodeSettings::default(),
            &filters,
        );

        let af = args.iter().position(|a| a == "-af").unwrap();
        assert_eq!(args[af + 1], "loudnorm=I=-6,afade=t=in:st=0:d=3");
        // Output path stays last.
        assert_eq!(args.last().map(String::as_str), Some("out.mp3"));
    }

    #[test]
    fn fade_in_applies_to_first_overall_track_only() {
        assert_eq!(
            fade_filters(&plan(1, 100), 5, Some(3.0), None),
            vec!["afade=t=in:st=0:d=3"]
        );
        assert!(fade_filters(&plan(2, 100), 5, Some(3.0), None).is_empty());
    }

    #[test]
    fn fade_out_applies_to_last_overall_track_only() {
        assert_eq!(
            fade_filters(&plan(5, 100), 5, None, Some(4.0)),
            vec!["afade=t=out:st=96:d=4"]
        );
        // Last *selected* is not enough; track 3 of 5 gets nothing.
        assert!(fade_filters(&plan(3, 100), 5, None, Some(4.0)).is_empty());
    }

    #[test]
    fn fade_longer_than_track_clamps_to_track() {
        let filters = fade_filters(&plan(2, 10), 2, None, Some(30.0));
        assert_eq!(filters, vec!["afade=t=out:st=0:d=10"]);
    }

    #[test]
    fn both_fades_on_a_single_track_album() {
        let filters = fade_filters(&plan(1, 100), 1, Some(2.0), Some(5.0));
        assert_eq!(
            filters,
            vec!["afade=t=in:st=0:d=2", "afade=t=out:st=95:d=5"]
        );
    }

    #[test]
    fn non_positive_fades_are_ignored() {
        assert!(fade_filters(&plan(1, 100), 1, Some(0.0), Some(-1.0)).is_empty());
    }
}
