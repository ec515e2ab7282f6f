//! Triangulation of a single marching cube

use crate::tables::{EDGE_CONNECTION, EDGE_DIRECTION, EDGE_TABLE, MAX_TRIANGLES, TRIANGLE_TABLE};
use metasurf_core::{Error, Point3f};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the crossing point on an intersected edge is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Interpolation {
    /// Linear interpolation to where the field reaches the target:
    /// `t = (target - v1) / (v2 - v1)`
    #[default]
    Threshold,
    /// Ratio of the raw corner values, ignoring the target:
    /// `t = v1 / (v1 + v2)`
    ValueRatio,
}

impl Interpolation {
    /// Parameter along the edge from the corner holding `v1` (t = 0) to the
    /// corner holding `v2` (t = 1). A vanishing denominator gives the midpoint.
    pub fn parameter(self, v1: f32, v2: f32, target: f32) -> f32 {
        let (numerator, denominator) = match self {
            Interpolation::Threshold => (target - v1, v2 - v1),
            Interpolation::ValueRatio => (v1, v2 + v1),
        };

        if denominator.abs() < 1e-6 {
            0.5
        } else {
            numerator / denominator
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Interpolation::Threshold => "threshold",
            Interpolation::ValueRatio => "value-ratio",
        };
        f.write_str(name)
    }
}

impl FromStr for Interpolation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "threshold" => Ok(Interpolation::Threshold),
            "value-ratio" => Ok(Interpolation::ValueRatio),
            other => Err(Error::InvalidConfig(format!(
                "unknown interpolation '{}', expected one of: threshold, value-ratio",
                other
            ))),
        }
    }
}

/// One cube of the grid: absolute corner positions, corner samples, and the
/// configuration index (bit i set when corner i is at or below the target)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub positions: [Point3f; 8],
    pub values: [f32; 8],
    pub flag_index: usize,
}

impl Cell {
    /// Classify the corners against `target`
    pub fn new(positions: [Point3f; 8], values: [f32; 8], target: f32) -> Self {
        let flag_index = values
            .iter()
            .enumerate()
            .filter(|&(_, &value)| value <= target)
            .fold(0, |flags, (corner, _)| flags | 1 << corner);

        Self {
            positions,
            values,
            flag_index,
        }
    }

    /// 12-bit mask of the edges the surface crosses
    pub fn edge_flags(&self) -> u16 {
        EDGE_TABLE[self.flag_index]
    }

    /// Crossing point on `edge`.
    ///
    /// Endpoints are taken in increasing axis order, so the cubes on either
    /// side of a shared edge compute a bit-identical point.
    pub fn edge_vertex(&self, edge: usize, target: f32, interpolation: Interpolation) -> Point3f {
        let [mut p1, mut p2] = EDGE_CONNECTION[edge];
        if EDGE_DIRECTION[edge].iter().sum::<f32>() < 0.0 {
            std::mem::swap(&mut p1, &mut p2);
        }

        let t = interpolation.parameter(self.values[p1], self.values[p2], target);
        self.positions[p1] + (self.positions[p2] - self.positions[p1]) * t
    }
}

/// A triangle as three absolute corner positions
pub type Triangle = [Point3f; 3];

/// The up to five triangles produced by one cube
#[derive(Debug, Clone, Copy)]
pub struct CellTriangles {
    triangles: [Triangle; MAX_TRIANGLES],
    count: usize,
}

impl CellTriangles {
    fn empty() -> Self {
        Self {
            triangles: [[Point3f::origin(); 3]; MAX_TRIANGLES],
            count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn as_slice(&self) -> &[Triangle] {
        &self.triangles[..self.count]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.as_slice().iter()
    }
}

impl<'a> IntoIterator for &'a CellTriangles {
    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Triangulate one cube using the lookup tables.
///
/// Cubes entirely inside or outside produce nothing. Otherwise every crossed
/// edge is interpolated once and the triangle table row for the cube's
/// configuration is emitted in table order.
pub fn triangulate(cell: &Cell, target: f32, interpolation: Interpolation) -> CellTriangles {
    let mut result = CellTriangles::empty();

    let edge_flags = cell.edge_flags();
    if edge_flags == 0 {
        return result;
    }

    let mut edge_vertices = [Point3f::origin(); 12];
    for (edge, vertex) in edge_vertices.iter_mut().enumerate() {
        if edge_flags & (1 << edge) != 0 {
            *vertex = cell.edge_vertex(edge, target, interpolation);
        }
    }

    for row in TRIANGLE_TABLE[cell.flag_index].chunks_exact(3).take(MAX_TRIANGLES) {
        if row[0] < 0 {
            break;
        }

        result.triangles[result.count] = [
            edge_vertices[row[0] as usize],
            edge_vertices[row[1] as usize],
            edge_vertices[row[2] as usize],
        ];
        result.count += 1;
    }

    result
}
