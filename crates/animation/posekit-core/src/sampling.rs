//! Track sampling and skeleton posing.
//!
//! Model:
//! - Each Track has ordered sample times in seconds.
//! - Before the first sample the first value holds; after the last, the last value holds.
//! - Linear rotation segments use shortest-arc slerp; position/scale lerp per component.
//! - Step holds the left value; cubic spline evaluates the Hermite segment
//!   from the stored in/out tangents. Rotation results are always renormalized.
//!
//! API:
//! - sample_track(&Track, t) -> Option<TrackSample>
//! - sample_pose(&mut Skeleton, &Clip, t, LoopMode): write one sampled track per
//!   (node, property) into the node with the matching name. When a channel has
//!   several tracks (combined clips), the one whose time range covers `t` drives it.

use hashbrown::hash_map::Entry;
use hashbrown::HashMap;
use log::debug;

use crate::config::LoopMode;
use crate::data::{Clip, Interpolation, Track, TrackProperty};
use crate::interp::functions::{hermite, lerp_f32, normalize4, slerp_quat};
use crate::interp::quat_to_euler_xyz;
use crate::skeleton::Skeleton;

/// Value of one track at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TrackSample {
    /// Unit quaternion `[x, y, z, w]`.
    Rotation([f32; 4]),
    Position([f32; 3]),
    Scale([f32; 3]),
}

/// Map playback time into clip-local time.
pub fn clip_time(time: f32, duration: f32, mode: LoopMode) -> f32 {
    if !time.is_finite() || duration <= 0.0 {
        return 0.0;
    }
    match mode {
        LoopMode::Once => time.clamp(0.0, duration),
        LoopMode::Repeat => time.rem_euclid(duration),
    }
}

#[inline]
fn read<const N: usize>(values: &[f32], start: usize) -> Option<[f32; N]> {
    let slice = values.get(start..start + N)?;
    let mut out = [0.0; N];
    out.copy_from_slice(slice);
    Some(out)
}

/// Locate `t` among `times`: `(left, right, local_t)`. `left == right` means hold.
fn find_segment(times: &[f32], t: f32) -> (usize, usize, f32) {
    let n = times.len();
    let next = times.partition_point(|&x| x <= t);
    if next == 0 {
        return (0, 0, 0.0);
    }
    if next >= n {
        return (n - 1, n - 1, 0.0);
    }
    let (i0, i1) = (next - 1, next);
    let span = times[i1] - times[i0];
    if span <= 0.0 {
        return (i1, i1, 0.0);
    }
    (i0, i1, ((t - times[i0]) / span).clamp(0.0, 1.0))
}

fn sample_n<const N: usize>(track: &Track, t: f32) -> Option<[f32; N]> {
    let times = &track.times;
    if times.is_empty() {
        return None;
    }
    let (i0, i1, u) = find_segment(times, t);
    match track.interpolation {
        Interpolation::CubicSpline => {
            // Layout per sample: [in-tangent, value, out-tangent].
            let stride = 3 * N;
            let p0 = read::<N>(&track.values, i0 * stride + N)?;
            if i0 == i1 {
                return Some(p0);
            }
            let m0 = read::<N>(&track.values, i0 * stride + 2 * N)?;
            let p1 = read::<N>(&track.values, i1 * stride + N)?;
            let m1 = read::<N>(&track.values, i1 * stride)?;
            let dt = times[i1] - times[i0];
            let mut out = [0.0; N];
            for c in 0..N {
                out[c] = hermite(p0[c], m0[c] * dt, p1[c], m1[c] * dt, u);
            }
            Some(out)
        }
        Interpolation::Step => read::<N>(&track.values, i0 * N),
        Interpolation::Linear => {
            let a = read::<N>(&track.values, i0 * N)?;
            if i0 == i1 {
                return Some(a);
            }
            let b = read::<N>(&track.values, i1 * N)?;
            let mut out = [0.0; N];
            for c in 0..N {
                out[c] = lerp_f32(a[c], b[c], u);
            }
            Some(out)
        }
    }
}

/// Sample a single track at clip-local time `t` (seconds).
/// Returns `None` for empty or truncated tracks.
pub fn sample_track(track: &Track, t: f32) -> Option<TrackSample> {
    match track.property {
        TrackProperty::Rotation => {
            let q = if track.interpolation == Interpolation::Linear {
                if track.times.is_empty() {
                    return None;
                }
                let (i0, i1, u) = find_segment(&track.times, t);
                let a = read::<4>(&track.values, i0 * 4)?;
                let b = read::<4>(&track.values, i1 * 4)?;
                slerp_quat(a, b, u)
            } else {
                sample_n::<4>(track, t)?
            };
            Some(TrackSample::Rotation(normalize4(q)))
        }
        TrackProperty::Position => sample_n::<3>(track, t).map(TrackSample::Position),
        TrackProperty::Scale => sample_n::<3>(track, t).map(TrackSample::Scale),
    }
}

#[derive(Default)]
struct NodeUpdate {
    rotation: Option<[f32; 4]>,
    position: Option<[f32; 3]>,
    scale: Option<[f32; 3]>,
}

/// Where `t` falls relative to a track's sampled range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Coverage {
    /// `t` is before the first sample.
    Pending,
    /// `t` is after the last sample.
    Elapsed,
    /// `t` lies within `[first, last]`.
    Active,
}

fn coverage(track: &Track, t: f32) -> Option<Coverage> {
    let first = *track.times.first()?;
    let last = track.last_time();
    Some(if t < first {
        Coverage::Pending
    } else if t <= last {
        Coverage::Active
    } else {
        Coverage::Elapsed
    })
}

/// Whether `candidate` should drive a channel instead of `held`.
///
/// A track covering `t` beats one that has elapsed, which beats one still
/// pending. Among covering or elapsed tracks the latest start wins; among
/// pending ones the earliest start wins.
fn supersedes(candidate: (&Track, Coverage), held: (&Track, Coverage)) -> bool {
    let (track, cov) = candidate;
    let (held_track, held_cov) = held;
    if cov != held_cov {
        return cov > held_cov;
    }
    let start = track.times[0];
    let held_start = held_track.times[0];
    match cov {
        Coverage::Active | Coverage::Elapsed => start >= held_start,
        Coverage::Pending => start < held_start,
    }
}

/// Pick one track per (target, property) for clip-local time `t`.
/// Combined clips hold several time-disjoint tracks per channel.
fn select_tracks(clip: &Clip, t: f32) -> HashMap<(&str, TrackProperty), (&Track, Coverage)> {
    let mut chosen: HashMap<(&str, TrackProperty), (&Track, Coverage)> = HashMap::new();
    for track in &clip.tracks {
        let Some(cov) = coverage(track, t) else {
            continue;
        };
        match chosen.entry((track.target_name.as_str(), track.property)) {
            Entry::Vacant(slot) => {
                slot.insert((track, cov));
            }
            Entry::Occupied(mut slot) => {
                if supersedes((track, cov), *slot.get()) {
                    slot.insert((track, cov));
                }
            }
        }
    }
    chosen
}

/// Pose `skeleton` with `clip` at playback time `time`.
/// Tracks whose target is not in the skeleton are ignored. Returns the number
/// of nodes that were written.
pub fn sample_pose(skeleton: &mut Skeleton, clip: &Clip, time: f32, mode: LoopMode) -> usize {
    let t = clip_time(time, clip.duration, mode);

    let mut updates: HashMap<&str, NodeUpdate> = HashMap::new();
    for ((target, _), (track, _)) in select_tracks(clip, t) {
        let Some(sample) = sample_track(track, t) else {
            continue;
        };
        let entry = updates.entry(target).or_default();
        match sample {
            TrackSample::Rotation(q) => entry.rotation = Some(q),
            TrackSample::Position(p) => entry.position = Some(p),
            TrackSample::Scale(s) => entry.scale = Some(s),
        }
    }

    let mut written = 0;
    skeleton.for_each_node_mut(|node| {
        let Some(update) = updates.get(node.name.as_str()) else {
            return;
        };
        if let Some(q) = update.rotation {
            node.rotation = quat_to_euler_xyz(q);
        }
        if let Some(p) = update.position {
            node.position = p.map(f64::from);
        }
        if let Some(s) = update.scale {
            node.scale = s.map(f64::from);
        }
        written += 1;
    });
    debug!(
        "posed {} nodes from '{}' at t={:.3}s (clip time {:.3}s)",
        written, clip.name, time, t
    );
    written
}
