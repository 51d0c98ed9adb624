//! Point cloud materials

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Appearance of a rendered point cloud. Picking never reads it; it is
/// carried so clones can share it with their source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsMaterial {
    pub color: [u8; 3],
    pub size: f32,
    pub size_attenuation: bool,
}

impl PointsMaterial {
    pub fn new(color: [u8; 3]) -> Self {
        Self {
            color,
            size: 1.0,
            size_attenuation: true,
        }
    }

    /// Material with a random color, used when a cloud is created without one
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        Self::new([rng.gen(), rng.gen(), rng.gen()])
    }
}

impl Default for PointsMaterial {
    fn default() -> Self {
        Self::new([255, 255, 255])
    }
}
