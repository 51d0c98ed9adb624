//! Point cloud picking
//!
//! The world-space ray is moved into the cloud's local space, checked
//! against the geometry's bounding box, and then every point is tested for
//! its distance to the ray. Hits are mapped back to world space.

use crate::raycaster::{Raycast, Raycaster};
use pointpick_core::{Point3f, PointCloud, Ray, Result};

/// A world-space ray together with the picking radius around it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickRequest {
    pub ray: Ray,
    /// Picking radius at unit scale, in world units
    pub threshold: f32,
}

impl PickRequest {
    pub fn new(ray: Ray, threshold: f32) -> Self {
        Self { ray, threshold }
    }
}

/// One point hit by a pick
#[derive(Debug, Clone)]
pub struct Intersection<'a> {
    /// Distance from the world ray origin to `point`
    pub distance: f32,
    /// Local-space distance between the source point and the ray
    pub distance_to_ray: f32,
    /// Point on the ray closest to the source point, in world space
    pub point: Point3f,
    /// Index of the source point in its geometry
    pub index: usize,
    /// Always `None`: points have no faces
    pub face: Option<usize>,
    pub object: &'a PointCloud,
}

/// Ray/point-cloud intersection test
pub struct PointPicker;

impl PointPicker {
    /// Every point of `object` lying strictly closer than the request's
    /// threshold to its ray, in no particular order.
    ///
    /// The threshold is divided by the mean of the cloud's local scale
    /// factors, so it only approximates a world-space radius under
    /// non-uniform scale.
    ///
    /// # Errors
    /// [`pointpick_core::Error::SingularTransform`] if the cloud's world
    /// matrix cannot be inverted.
    ///
    /// # Panics
    /// If an indexed geometry references a point slot past the end of its
    /// position buffer. Use [`pointpick_core::PointGeometry::validate`] on
    /// untrusted buffers.
    pub fn pick<'a>(
        object: &'a PointCloud,
        request: &PickRequest,
    ) -> Result<Vec<Intersection<'a>>> {
        let mut intersects = Vec::new();
        Self::pick_into(object, request, &mut intersects)?;
        Ok(intersects)
    }

    /// Like [`PointPicker::pick`], appending the hits to `intersects`
    pub fn pick_into<'a>(
        object: &'a PointCloud,
        request: &PickRequest,
        intersects: &mut Vec<Intersection<'a>>,
    ) -> Result<()> {
        let matrix_world = object.node.matrix_world();
        let ray = request.ray.apply_transform(&matrix_world.try_inverse()?);
        let geometry = &object.geometry;

        let local_threshold = request.threshold / object.node.average_scale();

        // Grown by the threshold so points near the box faces are not lost.
        if let Some(aabb) = &geometry.bounding_box {
            if !ray.intersects_box(&aabb.expanded_by_scalar(local_threshold)) {
                log::trace!("ray misses bounding box of '{}'", object.node.name);
                return Ok(());
            }
        }

        let before = intersects.len();
        for (local_point, index) in geometry.points() {
            let distance_to_ray = ray.distance_to_point(&local_point);
            if distance_to_ray >= local_threshold {
                continue;
            }

            let point = matrix_world.transform_point(&ray.closest_point_to_point(&local_point));
            intersects.push(Intersection {
                distance: nalgebra::distance(&request.ray.origin, &point),
                distance_to_ray,
                point,
                index,
                face: None,
                object,
            });
        }

        log::debug!(
            "picked {} of {} points of '{}'",
            intersects.len() - before,
            geometry.point_count(),
            object.node.name
        );
        Ok(())
    }
}

impl Raycast for PointCloud {
    fn raycast<'a>(
        &'a self,
        raycaster: &Raycaster,
        intersects: &mut Vec<Intersection<'a>>,
    ) -> Result<()> {
        PointPicker::pick_into(self, &raycaster.pick_request(), intersects)
    }
}
