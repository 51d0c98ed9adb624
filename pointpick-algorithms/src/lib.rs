//! # pointpick algorithms
//!
//! Ray picking for point clouds.
//!
//! [`PointPicker`] tests a single point cloud against a world-space ray and
//! reports every point the ray passes within a threshold of.
//! [`Raycaster`] runs that test over many objects and sorts the hits by
//! distance along the ray.

pub mod picking;
pub mod raycaster;

// Re-export commonly used items
pub use picking::*;
pub use raycaster::*;
