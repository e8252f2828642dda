//! Core configuration for posekit-core.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How playback time outside `[0, duration]` is mapped back into the clip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    /// Clamp to the first/last sample.
    Once,
    /// Wrap around the clip duration.
    #[default]
    Repeat,
}

/// Tunables for quantization, combination and pose sampling.
/// Every field has a default, so partial JSON objects are accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Angles with a smaller magnitude count as "no rotation" (radians).
    pub zero_epsilon: f64,
    /// Absolute tolerance when matching an angle against the fraction table.
    pub fraction_tolerance: f64,
    /// Fractional digits of the decimal fallback.
    pub decimal_places: usize,

    /// Name given to clips produced by the combiner.
    pub combined_name: String,
    /// Minimum number of clips the combiner accepts.
    pub min_combine: usize,

    /// Playback time used when posing a skeleton for export without an explicit time.
    pub pose_sample_time: f32,
    pub loop_mode: LoopMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            zero_epsilon: 1e-4,
            fraction_tolerance: 1e-3,
            decimal_places: 4,
            combined_name: "combined".to_string(),
            min_combine: 2,
            pose_sample_time: 0.1,
            loop_mode: LoopMode::Repeat,
        }
    }
}

impl Config {
    /// Parse a (possibly partial) JSON configuration object.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}
