//! Error types for posekit-core.
//!
//! Precondition failures (no skeleton loaded, too few clips to combine) are not
//! errors; those operations return `None` instead.

use crate::ids::ClipId;

/// Errors raised while validating or resolving animation data.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum CoreError {
    /// Sample times and values do not correspond 1:1.
    #[error("Malformed track '{target}': {times} times need {expected} values (width {width}), got {values}")]
    MalformedTrack {
        target: String,
        times: usize,
        values: usize,
        width: usize,
        expected: usize,
    },

    /// A sample time is lower than its predecessor or not finite.
    #[error("Track '{target}' has a decreasing or non-finite time at sample {index}")]
    NonMonotonicTimes { target: String, index: usize },

    /// The declared clip duration does not cover its tracks.
    #[error("Clip '{clip}' declares duration {duration} but samples reach {max_time}")]
    DurationTooShort {
        clip: String,
        duration: f32,
        max_time: f32,
    },

    /// Clip id not present in the session's clip set.
    #[error("Clip not found: {id:?}")]
    UnknownClip { id: ClipId },

    /// JSON input that could not be decoded.
    #[error("Parse error: {reason}")]
    Parse { reason: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Parse {
            reason: err.to_string(),
        }
    }
}
