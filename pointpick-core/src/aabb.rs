//! Axis-aligned bounding boxes

use crate::point::{Point3f, Vector3f};
use serde::{Deserialize, Serialize};

/// An axis-aligned box in some coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Point3f,
    pub max: Point3f,
}

impl Aabb {
    pub fn new(min: Point3f, max: Point3f) -> Self {
        Self { min, max }
    }

    /// A box containing nothing; expanding it by a point yields that point.
    pub fn empty() -> Self {
        Self {
            min: Point3f::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3f::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    /// Smallest box containing every point, or `None` for an empty input
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3f>,
    {
        let mut aabb = Self::empty();
        for point in points {
            aabb.expand_by_point(&point);
        }

        if aabb.is_empty() {
            None
        } else {
            Some(aabb)
        }
    }

    pub fn expand_by_point(&mut self, point: &Point3f) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// Copy of the box grown by `margin` on every side
    pub fn expanded_by_scalar(&self, margin: f32) -> Self {
        let margin = Vector3f::repeat(margin);
        Self {
            min: self.min - margin,
            max: self.max + margin,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    pub fn contains_point(&self, point: &Point3f) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    pub fn center(&self) -> Point3f {
        nalgebra::center(&self.min, &self.max)
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
