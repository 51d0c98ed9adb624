//! Raycasting over many scene objects

use crate::picking::{Intersection, PickRequest};
use pointpick_core::{Camera, Ray, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Picking parameters for point clouds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointCloudParams {
    /// World-space picking radius at unit scale
    pub threshold: f32,
}

impl Default for PointCloudParams {
    fn default() -> Self {
        Self { threshold: 1.0 }
    }
}

/// Per-object-type picking parameters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RaycasterParams {
    pub point_cloud: PointCloudParams,
}

/// Scene objects that can be hit by a [`Raycaster`]
pub trait Raycast {
    /// Append this object's hits to `intersects`, unordered
    fn raycast<'a>(
        &'a self,
        raycaster: &Raycaster,
        intersects: &mut Vec<Intersection<'a>>,
    ) -> Result<()>;
}

/// A world-space ray cast into the scene
#[derive(Debug, Clone, PartialEq)]
pub struct Raycaster {
    pub ray: Ray,
    /// Hits closer than this are dropped
    pub near: f32,
    /// Hits further than this are dropped
    pub far: f32,
    pub params: RaycasterParams,
}

impl Raycaster {
    pub fn new(ray: Ray) -> Self {
        Self {
            ray,
            near: 0.0,
            far: f32::INFINITY,
            params: RaycasterParams::default(),
        }
    }

    /// Ray from the camera through a cursor position in normalized device
    /// coordinates
    pub fn from_camera(camera: &Camera, x: f32, y: f32) -> Result<Self> {
        Ok(Self::new(camera.ray_from_ndc(x, y)?))
    }

    pub fn with_range(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    pub fn with_params(mut self, params: RaycasterParams) -> Self {
        self.params = params;
        self
    }

    /// Request handed to the point picker
    pub fn pick_request(&self) -> PickRequest {
        PickRequest::new(self.ray, self.params.point_cloud.threshold)
    }

    /// Hits on a single object, nearest first
    pub fn intersect_object<'a, T: Raycast>(&self, object: &'a T) -> Result<Vec<Intersection<'a>>> {
        let mut intersects = Vec::new();
        object.raycast(self, &mut intersects)?;
        Ok(self.finish(intersects))
    }

    /// Hits on all `objects`, nearest first.
    ///
    /// Objects are tested in parallel. Each object is read only; nothing in
    /// the scene may be mutated while this runs.
    pub fn intersect_objects<'a, T: Raycast + Sync>(
        &self,
        objects: &'a [T],
    ) -> Result<Vec<Intersection<'a>>> {
        let per_object = objects
            .par_iter()
            .map(|object| -> Result<Vec<Intersection<'a>>> {
                let mut intersects = Vec::new();
                object.raycast(self, &mut intersects)?;
                Ok(intersects)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(self.finish(per_object.into_iter().flatten().collect()))
    }

    fn finish<'a>(&self, mut intersects: Vec<Intersection<'a>>) -> Vec<Intersection<'a>> {
        intersects.retain(|hit| hit.distance >= self.near && hit.distance <= self.far);
        intersects.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        intersects
    }
}
