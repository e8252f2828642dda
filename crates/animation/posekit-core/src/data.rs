//! Canonical clip data model: tracks of per-bone samples bundled into named clips.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Animated property of a bone. Each kind fixes the channel width of its values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackProperty {
    /// Quaternion samples `[x, y, z, w]`.
    Rotation,
    /// Translation samples `[x, y, z]`.
    Position,
    /// Scale samples `[x, y, z]`.
    Scale,
}

impl TrackProperty {
    #[inline]
    pub fn width(self) -> usize {
        match self {
            TrackProperty::Rotation => 4,
            TrackProperty::Position | TrackProperty::Scale => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrackProperty::Rotation => "rotation",
            TrackProperty::Position => "position",
            TrackProperty::Scale => "scale",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    #[default]
    Linear,
    Step,
    /// Three values per sample: in-tangent, value, out-tangent.
    CubicSpline,
}

impl Interpolation {
    #[inline]
    fn values_per_sample(self) -> usize {
        match self {
            Interpolation::CubicSpline => 3,
            Interpolation::Linear | Interpolation::Step => 1,
        }
    }
}

/// Time series for one (bone, property) pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Bone name this track drives (lookup key, not a reference).
    #[serde(rename = "target")]
    pub target_name: String,
    pub property: TrackProperty,
    #[serde(default)]
    pub interpolation: Interpolation,
    /// Sample times in seconds, non-decreasing.
    pub times: Vec<f32>,
    /// Flat channel-major samples, `times.len() * width` entries (x3 for cubic spline).
    pub values: Vec<f32>,
}

impl Track {
    pub fn new(
        target_name: impl Into<String>,
        property: TrackProperty,
        times: Vec<f32>,
        values: Vec<f32>,
    ) -> Self {
        Self {
            target_name: target_name.into(),
            property,
            interpolation: Interpolation::Linear,
            times,
            values,
        }
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Values per sample: channel width times the interpolation stride.
    #[inline]
    pub fn stride(&self) -> usize {
        self.property.width() * self.interpolation.values_per_sample()
    }

    pub fn last_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Copy of this track with every sample time moved forward by `offset`.
    /// Target, property, interpolation and values are carried over verbatim.
    pub fn with_time_offset(&self, offset: f32) -> Track {
        Track {
            target_name: self.target_name.clone(),
            property: self.property,
            interpolation: self.interpolation,
            times: self.times.iter().map(|t| t + offset).collect(),
            values: self.values.clone(),
        }
    }

    /// Check the times/values correspondence and time ordering.
    pub fn validate(&self) -> Result<()> {
        let expected = self.times.len() * self.stride();
        if self.values.len() != expected {
            return Err(CoreError::MalformedTrack {
                target: self.target_name.clone(),
                times: self.times.len(),
                values: self.values.len(),
                width: self.property.width(),
                expected,
            });
        }
        let mut last = f32::NEG_INFINITY;
        for (index, &t) in self.times.iter().enumerate() {
            if !t.is_finite() || t < last {
                return Err(CoreError::NonMonotonicTimes {
                    target: self.target_name.clone(),
                    index,
                });
            }
            last = t;
        }
        Ok(())
    }
}

/// A named bundle of tracks. Treated as immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub name: String,
    /// Seconds; never shorter than the last sample of any track.
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl Clip {
    pub fn new(name: impl Into<String>, duration: f32, tracks: Vec<Track>) -> Self {
        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }

    /// Build a clip whose duration is the latest sample time over all tracks.
    pub fn from_tracks(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        let duration = tracks.iter().map(Track::last_time).fold(0.0_f32, f32::max);
        Self::new(name, duration, tracks)
    }

    pub fn max_time(&self) -> f32 {
        self.tracks
            .iter()
            .map(Track::last_time)
            .fold(0.0_f32, f32::max)
    }

    /// Validate every track and the duration invariant.
    pub fn validate(&self) -> Result<()> {
        for track in &self.tracks {
            track.validate()?;
        }
        let max_time = self.max_time();
        if !self.duration.is_finite() || self.duration < max_time {
            return Err(CoreError::DurationTooShort {
                clip: self.name.clone(),
                duration: self.duration,
                max_time,
            });
        }
        Ok(())
    }
}
