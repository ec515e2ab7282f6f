//! Point types and related functionality

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use bytemuck::{Pod, Zeroable};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// One entry of an interleaved render vertex stream: position then normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct MeshVertex {
    pub position: Point3f,
    pub normal: Vector3f,
}

unsafe impl Pod for MeshVertex {}
unsafe impl Zeroable for MeshVertex {}

impl MeshVertex {
    pub fn new(position: Point3f, normal: Vector3f) -> Self {
        Self { position, normal }
    }
}

/// Exact-equality key for a position.
///
/// Compares the raw bit patterns of the coordinates, with `-0.0` folded onto
/// `+0.0`, so it can be hashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionKey([u32; 3]);

impl PositionKey {
    pub fn new(position: &Point3f) -> Self {
        // Adding +0.0 turns -0.0 into +0.0 and leaves every other value alone.
        Self([
            (position.x + 0.0).to_bits(),
            (position.y + 0.0).to_bits(),
            (position.z + 0.0).to_bits(),
        ])
    }
}
