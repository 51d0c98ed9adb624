//! Camera utilities for turning screen positions into rays

use crate::error::Result;
use crate::point::{Point3f, Vector3f};
use crate::ray::Ray;
use crate::transform::Transform3D;
use nalgebra::{Matrix4, Perspective3};

/// A perspective camera looking from `position` towards `target`
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3f,
    pub target: Point3f,
    pub up: Vector3f,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Create a new camera
    pub fn new(
        position: Point3f,
        target: Point3f,
        up: Vector3f,
        fov: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            target,
            up,
            fov,
            aspect_ratio,
            near,
            far,
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let perspective = Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far);
        perspective.into_inner()
    }

    /// World-space ray through a point given in normalized device
    /// coordinates, `(-1, -1)` bottom left to `(1, 1)` top right.
    ///
    /// Fails if the view-projection matrix is singular.
    pub fn ray_from_ndc(&self, x: f32, y: f32) -> Result<Ray> {
        let unproject =
            Transform3D::from(self.projection_matrix() * self.view_matrix()).try_inverse()?;
        let on_near_plane = unproject.transform_point(&Point3f::new(x, y, -1.0));
        let on_far_plane = unproject.transform_point(&Point3f::new(x, y, 1.0));
        Ok(Ray::new(self.position, on_far_plane - on_near_plane))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Point3f::new(0.0, 0.0, 5.0),
            Point3f::new(0.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            std::f32::consts::FRAC_PI_4,
            16.0 / 9.0,
            0.1,
            100.0,
        )
    }
}
