//! Point cloud scene objects

use crate::aabb::Aabb;
use crate::geometry::PointGeometry;
use crate::material::PointsMaterial;
use crate::point::Point3f;
use crate::scene::SceneNode;
use crate::traits::Bounded;
use std::sync::Arc;

/// A set of points placed in the scene.
///
/// Geometry and material are shared: cloning a `PointCloud` copies its node
/// and flags but both clones point at the same geometry and material.
#[derive(Debug, Clone)]
pub struct PointCloud {
    pub node: SceneNode,
    pub geometry: Arc<PointGeometry>,
    pub material: Arc<PointsMaterial>,
    pub sort_particles: bool,
}

/// Former name of [`PointCloud`]
#[deprecated(note = "ParticleSystem has been renamed to PointCloud")]
pub type ParticleSystem = PointCloud;

impl PointCloud {
    pub fn new(
        geometry: impl Into<Arc<PointGeometry>>,
        material: impl Into<Arc<PointsMaterial>>,
    ) -> Self {
        Self {
            node: SceneNode::new(),
            geometry: geometry.into(),
            material: material.into(),
            sort_particles: false,
        }
    }

    /// Create a cloud with a randomly colored material
    pub fn with_geometry(geometry: impl Into<Arc<PointGeometry>>) -> Self {
        Self::new(geometry, PointsMaterial::random())
    }

    pub fn len(&self) -> usize {
        self.geometry.point_count()
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }
}

impl Default for PointCloud {
    fn default() -> Self {
        Self::with_geometry(PointGeometry::default())
    }
}

impl Bounded for PointCloud {
    /// World-space box around the transformed corners of the local box
    fn bounding_box(&self) -> Option<Aabb> {
        let local = match self.geometry.bounding_box {
            Some(aabb) => aabb,
            None => Aabb::from_points(self.geometry.points().map(|(p, _)| p))?,
        };

        let world = self.node.matrix_world();
        Aabb::from_points((0..8).map(|corner| {
            let pick = |bit: usize, axis: usize| {
                if corner & bit == 0 {
                    local.min[axis]
                } else {
                    local.max[axis]
                }
            };
            world.transform_point(&Point3f::new(pick(1, 0), pick(2, 1), pick(4, 2)))
        }))
    }
}
