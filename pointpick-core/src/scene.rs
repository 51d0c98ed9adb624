//! Scene graph node transforms

use crate::point::Vector3f;
use crate::transform::Transform3D;
use nalgebra::UnitQuaternion;
use serde::{Deserialize, Serialize};

/// Placement of an object in the scene: a local translation, rotation and
/// scale relative to its parent, plus the cached local-to-world matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,
    pub position: Vector3f,
    pub rotation: UnitQuaternion<f32>,
    pub scale: Vector3f,
    pub visible: bool,
    matrix_world: Transform3D,
}

impl SceneNode {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            position: Vector3f::zeros(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3f::new(1.0, 1.0, 1.0),
            visible: true,
            matrix_world: Transform3D::identity(),
        }
    }

    /// Local-to-parent transform, `T * R * S`
    pub fn local_matrix(&self) -> Transform3D {
        Transform3D::from_translation_rotation_scale(self.position, self.rotation, self.scale)
    }

    /// Recompute the local-to-world matrix. Pass the parent's world matrix,
    /// or `None` for a root node.
    pub fn update_matrix_world(&mut self, parent: Option<&Transform3D>) {
        let local = self.local_matrix();
        self.matrix_world = match parent {
            Some(parent) => *parent * local,
            None => local,
        };
    }

    /// Local-to-world matrix as of the last [`SceneNode::update_matrix_world`]
    pub fn matrix_world(&self) -> &Transform3D {
        &self.matrix_world
    }

    /// Override the world matrix directly, e.g. when the scene graph is
    /// maintained elsewhere.
    pub fn set_matrix_world(&mut self, matrix_world: Transform3D) {
        self.matrix_world = matrix_world;
    }

    /// Mean of the local scale factors along X, Y and Z
    pub fn average_scale(&self) -> f32 {
        (self.scale.x + self.scale.y + self.scale.z) / 3.0
    }
}

impl Default for SceneNode {
    fn default() -> Self {
        Self::new()
    }
}
