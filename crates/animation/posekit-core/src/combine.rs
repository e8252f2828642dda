//! Clip combiner: concatenate clips end to end into one longer clip.

use log::debug;

use crate::config::Config;
use crate::data::Clip;

pub const DEFAULT_COMBINED_NAME: &str = "combined";
pub const DEFAULT_MIN_COMBINE: usize = 2;

/// Concatenate `clips` in order. Each clip's tracks are copied with their
/// times shifted by the summed durations of the clips before it; tracks that
/// target the same bone are kept as separate, time-disjoint tracks.
///
/// Returns `None` when fewer than `min_count` (never less than 2) clips are given.
pub fn combine_clips(clips: &[&Clip], min_count: usize, name: &str) -> Option<Clip> {
    if clips.len() < min_count.max(DEFAULT_MIN_COMBINE) {
        return None;
    }

    let track_count = clips.iter().map(|c| c.tracks.len()).sum();
    let mut tracks = Vec::with_capacity(track_count);
    let mut time_offset = 0.0_f32;
    for clip in clips {
        tracks.extend(clip.tracks.iter().map(|t| t.with_time_offset(time_offset)));
        time_offset += clip.duration;
    }

    debug!(
        "combined {} clips into '{}' ({} tracks, {:.3}s)",
        clips.len(),
        name,
        tracks.len(),
        time_offset
    );
    Some(Clip::new(name, time_offset, tracks))
}

/// Combine with the default name and minimum count.
pub fn combine(clips: &[&Clip]) -> Option<Clip> {
    combine_clips(clips, DEFAULT_MIN_COMBINE, DEFAULT_COMBINED_NAME)
}

/// Combine using the tunables from `cfg`.
pub fn combine_with_config(clips: &[&Clip], cfg: &Config) -> Option<Clip> {
    combine_clips(clips, cfg.min_combine, &cfg.combined_name)
}
