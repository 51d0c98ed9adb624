//! Core data structures and traits for pointpick
//!
//! This crate provides the math primitives (points, transforms, rays, boxes)
//! and scene data (point geometry layouts, scene nodes, point clouds) that
//! ray picking runs on.

pub mod aabb;
pub mod camera;
pub mod error;
pub mod geometry;
pub mod material;
pub mod point;
pub mod point_cloud;
pub mod ray;
pub mod scene;
pub mod traits;
pub mod transform;

pub use aabb::*;
pub use camera::*;
pub use error::*;
pub use geometry::*;
pub use material::*;
pub use point::*;
pub use point_cloud::*;
pub use ray::*;
pub use scene::*;
pub use traits::*;
pub use transform::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix4, UnitQuaternion};
