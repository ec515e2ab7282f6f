//! # metasurf isosurface
//!
//! Marching cubes extraction of implicit surfaces around skeleton sources.
//!
//! Every influence source contributes a smooth, compactly supported potential.
//! The potentials are combined with a [`Blend`], sampled on a regular voxel
//! grid spanning all sources, and the grid is polygonised with the classic
//! marching cubes lookup tables. The result is an indexed triangle mesh with
//! shared vertices and per-vertex normals taken from the field gradient.
//!
//! ```
//! use metasurf_core::{Point3f, SphereSource};
//! use metasurf_isosurface::{Blend, Isosurface, IsosurfaceConfig};
//!
//! let sources = [
//!     SphereSource::new(Point3f::new(0.0, 0.0, 0.0), 1.0),
//!     SphereSource::new(Point3f::new(0.6, 0.0, 0.0), 1.0),
//! ];
//!
//! let mut isosurface = Isosurface::default();
//! isosurface
//!     .calculate(&sources, IsosurfaceConfig::new(0.1, Blend::Sum, 0.2))
//!     .unwrap();
//!
//! assert_eq!(isosurface.vertices().len(), isosurface.normals().len());
//! assert!(isosurface.triangle_count() > 0);
//! ```

pub mod config;
pub mod field;
pub mod isosurface;
pub mod tables;
pub mod triangulate;

// Re-export commonly used items
pub use config::*;
pub use field::*;
pub use isosurface::*;
pub use triangulate::*;
