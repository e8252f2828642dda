//! posekit core (engine-agnostic)
//!
//! Data model for skinned rigs and their clips, plus the two transformations
//! the tool exists for:
//! - clip combination: stitch clips end to end into one longer clip;
//! - pose export: snapshot bone rotations into an animation script, with
//!   angles snapped to common fractions of pi.
//!
//! `Session` ties them together for a host UI or CLI. Nothing here performs I/O.

pub mod combine;
pub mod config;
pub mod data;
pub mod error;
pub mod ids;
pub mod interp;
pub mod pose;
pub mod quantize;
pub mod rig_document;
pub mod sampling;
pub mod session;
pub mod skeleton;

// Re-exports for consumers (importers, CLI)
pub use combine::{combine, combine_clips, combine_with_config};
pub use config::{Config, LoopMode};
pub use data::{Clip, Interpolation, Track, TrackProperty};
pub use error::{CoreError, Result};
pub use ids::ClipId;
pub use interp::quat_to_euler_xyz;
pub use pose::{export_pose, ExportDocument, PoseInstruction, Sign};
pub use quantize::{quantize, QuantizedAngle, Quantizer};
pub use rig_document::{
    clip_to_json, parse_clip_json, parse_rig_document_json, rig_document_to_json, RigDocument,
};
pub use sampling::{sample_pose, sample_track, TrackSample};
pub use session::{export_base_name, Playback, Session};
pub use skeleton::{Axis, Euler, Node, Skeleton};
