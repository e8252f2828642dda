//! Interpolation helpers:
//! - lerp_f32 (applied per component)
//! - slerp_quat (shortest arc, NLERP fallback for nearly parallel inputs)
//! - hermite (glTF cubic-spline segment)
//! - quat_to_euler_xyz

use crate::skeleton::Euler;

/// Below this sin(theta), slerp degenerates and NLERP is used instead.
const SLERP_EPS: f32 = 1e-6;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
fn dot4(a: [f32; 4], b: [f32; 4]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

#[inline]
pub fn normalize4(mut q: [f32; 4]) -> [f32; 4] {
    let len2 = dot4(q, q);
    if len2 > 0.0 {
        let inv_len = len2.sqrt().recip();
        for c in &mut q {
            *c *= inv_len;
        }
    }
    q
}

/// Quaternion SLERP (x,y,z,w) along the shortest arc.
/// If dot < 0, the second quaternion is negated first.
pub fn slerp_quat(a: [f32; 4], mut b: [f32; 4], t: f32) -> [f32; 4] {
    let mut d = dot4(a, b);
    if d < 0.0 {
        b = [-b[0], -b[1], -b[2], -b[3]];
        d = -d;
    }
    let d = d.min(1.0);
    let theta = d.acos();
    let sin_theta = theta.sin();
    if sin_theta < SLERP_EPS {
        return normalize4([
            lerp_f32(a[0], b[0], t),
            lerp_f32(a[1], b[1], t),
            lerp_f32(a[2], b[2], t),
            lerp_f32(a[3], b[3], t),
        ]);
    }
    let wa = ((1.0 - t) * theta).sin() / sin_theta;
    let wb = (t * theta).sin() / sin_theta;
    normalize4([
        a[0] * wa + b[0] * wb,
        a[1] * wa + b[1] * wb,
        a[2] * wa + b[2] * wb,
        a[3] * wa + b[3] * wb,
    ])
}

/// Cubic Hermite between `p0` and `p1` with out-tangent `m0` and in-tangent `m1`,
/// tangents already scaled by the segment length.
#[inline]
pub fn hermite(p0: f32, m0: f32, p1: f32, m1: f32, t: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    (2.0 * t3 - 3.0 * t2 + 1.0) * p0
        + (t3 - 2.0 * t2 + t) * m0
        + (-2.0 * t3 + 3.0 * t2) * p1
        + (t3 - t2) * m1
}

/// Convert a unit quaternion (x,y,z,w) into Euler angles applied in x-y-z order.
/// Near gimbal lock (|m13| ~ 1) the z angle is pinned to zero.
pub fn quat_to_euler_xyz(q: [f32; 4]) -> Euler {
    let [x, y, z, w] = normalize4(q).map(f64::from);

    let m11 = 1.0 - 2.0 * (y * y + z * z);
    let m12 = 2.0 * (x * y - w * z);
    let m13 = 2.0 * (x * z + w * y);
    let m22 = 1.0 - 2.0 * (x * x + z * z);
    let m23 = 2.0 * (y * z - w * x);
    let m32 = 2.0 * (y * z + w * x);
    let m33 = 1.0 - 2.0 * (x * x + y * y);

    let ry = m13.clamp(-1.0, 1.0).asin();
    if m13.abs() < 0.999_999_9 {
        Euler::new((-m23).atan2(m33), ry, (-m12).atan2(m11))
    } else {
        Euler::new(m32.atan2(m22), ry, 0.0)
    }
}
