//! # pointpick
//!
//! Ray picking for point clouds in a 3D scene graph.
//!
//! This is the umbrella crate that re-exports the core types and the
//! picking algorithms. Use the individual crates for finer control over
//! dependencies.
//!
//! ## Quick Start
//!
//! ```rust
//! use pointpick::prelude::*;
//!
//! # fn main() -> pointpick::Result<()> {
//! let geometry = PointGeometry::from_vertices(vec![
//!     Point3f::new(0.0, 0.0, 0.0),
//!     Point3f::new(0.0, 0.0, 5.0),
//!     Point3f::new(3.0, 0.0, 5.0),
//! ])
//! .with_bounding_box();
//! let cloud = PointCloud::with_geometry(geometry);
//!
//! let raycaster = Raycaster::new(Ray::new(Point3f::new(0.0, 0.0, -1.0), Vector3f::z()));
//! let hits = raycaster.intersect_object(&cloud)?;
//! assert_eq!(hits.len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables algorithms
//! - `algorithms`: Point picking and the raycaster

// Re-export core functionality
pub use pointpick_core::*;

#[cfg(feature = "algorithms")]
pub use pointpick_algorithms as algorithms;

/// Convenient imports for common use cases
pub mod prelude {
    pub use pointpick_core::*;

    #[cfg(feature = "algorithms")]
    pub use pointpick_algorithms::*;
}
