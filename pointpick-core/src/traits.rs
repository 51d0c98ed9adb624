//! Core traits for pointpick

use crate::aabb::Aabb;
use crate::point::Point3f;

/// Trait for scene objects with a spatial extent
pub trait Bounded {
    /// World-space bounding box, or `None` if the object has no extent
    fn bounding_box(&self) -> Option<Aabb>;

    /// Center of the bounding box
    fn center(&self) -> Option<Point3f> {
        self.bounding_box().map(|aabb| aabb.center())
    }
}
