//! Point and vector aliases

use nalgebra::{Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// Read the point stored at `slot` in a flat `x, y, z, x, y, z, ...` buffer.
///
/// Panics if `slot * 3 + 2` is past the end of `positions`.
#[inline]
pub fn point_from_flat(positions: &[f32], slot: usize) -> Point3f {
    let offset = slot * 3;
    Point3f::new(positions[offset], positions[offset + 1], positions[offset + 2])
}
