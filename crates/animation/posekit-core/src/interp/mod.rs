//! Interpolation helpers used by pose sampling.
//!
//! Component-wise lerp for positions and scales, shortest-arc slerp for
//! rotations, cubic Hermite for glTF cubic-spline samples, and the
//! quaternion to Euler XYZ conversion applied when posing bones.

pub mod functions;

pub use functions::{hermite, lerp_f32, quat_to_euler_xyz, slerp_quat};
