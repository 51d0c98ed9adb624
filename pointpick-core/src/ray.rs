//! Rays and ray queries against points and boxes

use crate::aabb::Aabb;
use crate::point::{Point3f, Vector3f};
use crate::transform::Transform3D;
use serde::{Deserialize, Serialize};

/// A half-line starting at `origin` and extending along `direction`.
///
/// The direction is kept at unit length so that the parameter `t` of
/// [`Ray::at`] and every distance query are measured in the units of the
/// space the ray lives in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Point3f,
    pub direction: Vector3f,
}

impl Ray {
    /// Create a ray, normalizing `direction`. A zero direction is kept as-is.
    pub fn new(origin: Point3f, direction: Vector3f) -> Self {
        Self {
            origin,
            direction: direction.try_normalize(0.0).unwrap_or(direction),
        }
    }

    /// Point at parameter `t` along the ray
    pub fn at(&self, t: f32) -> Point3f {
        self.origin + self.direction * t
    }

    /// Parameter of the orthogonal projection of `point` onto the ray's line
    fn project(&self, point: &Point3f) -> f32 {
        (point - self.origin).dot(&self.direction)
    }

    /// Closest point on the ray to `point`; the origin when `point` lies behind it
    pub fn closest_point_to_point(&self, point: &Point3f) -> Point3f {
        let t = self.project(point);
        if t < 0.0 {
            return self.origin;
        }
        self.at(t)
    }

    pub fn distance_sq_to_point(&self, point: &Point3f) -> f32 {
        (self.closest_point_to_point(point) - point).norm_squared()
    }

    pub fn distance_to_point(&self, point: &Point3f) -> f32 {
        self.distance_sq_to_point(point).sqrt()
    }

    /// First point where the ray meets `aabb` (slab method).
    ///
    /// A ray starting inside the box yields its exit point. Boxes lying
    /// entirely behind the origin are not hit.
    pub fn intersect_box(&self, aabb: &Aabb) -> Option<Point3f> {
        if aabb.is_empty() {
            return None;
        }

        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let origin = self.origin[axis];
            let direction = self.direction[axis];
            let (lo, hi) = (aabb.min[axis], aabb.max[axis]);

            if direction == 0.0 {
                // parallel to this slab
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / direction;
            let mut t0 = (lo - origin) * inv;
            let mut t1 = (hi - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        if t_max < 0.0 {
            return None;
        }

        Some(self.at(if t_min >= 0.0 { t_min } else { t_max }))
    }

    pub fn intersects_box(&self, aabb: &Aabb) -> bool {
        self.intersect_box(aabb).is_some()
    }

    /// Map the ray into another space. The direction is transformed without
    /// translation and re-normalized.
    pub fn apply_transform(&self, transform: &Transform3D) -> Ray {
        Ray::new(
            transform.transform_point(&self.origin),
            transform.transform_vector(&self.direction),
        )
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Point3f::origin(),
            direction: -Vector3f::z(),
        }
    }
}
