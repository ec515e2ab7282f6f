//! Core data structures and traits for metasurf
//!
//! This crate provides the geometry types shared by the isosurface engine and
//! its consumers: point and vector aliases, axis-aligned bounds, the output
//! triangle mesh, and the influence sources that shape the scalar field.

pub mod point;
pub mod bounds;
pub mod mesh;
pub mod source;
pub mod traits;
pub mod error;

pub use point::*;
pub use bounds::*;
pub use mesh::*;
pub use source::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};
