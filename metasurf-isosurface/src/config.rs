//! Configuration for isosurface extraction

use crate::field::Blend;
use crate::triangulate::Interpolation;
use metasurf_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the isosurface engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IsosurfaceConfig {
    /// Edge length of one marching cube. Should be smaller than the smallest
    /// source radius; halving it multiplies the work by eight.
    pub cube_size: f32,
    /// How the contributions of several sources are combined
    pub blend: Blend,
    /// Isovalue separating outside (`<= target`) from inside
    pub target: f32,
    /// How edge crossings are placed
    pub interpolation: Interpolation,
}

impl Default for IsosurfaceConfig {
    fn default() -> Self {
        Self {
            cube_size: 0.2,
            blend: Blend::Sum,
            target: 0.8,
            interpolation: Interpolation::Threshold,
        }
    }
}

impl IsosurfaceConfig {
    /// Create a configuration with the default interpolation
    pub fn new(cube_size: f32, blend: Blend, target: f32) -> Self {
        Self {
            cube_size,
            blend,
            target,
            ..Default::default()
        }
    }

    pub fn with_cube_size(mut self, cube_size: f32) -> Self {
        self.cube_size = cube_size;
        self
    }

    pub fn with_blend(mut self, blend: Blend) -> Self {
        self.blend = blend;
        self
    }

    pub fn with_target(mut self, target: f32) -> Self {
        self.target = target;
        self
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Reject configurations that cannot produce meaningful geometry
    pub fn validate(&self) -> Result<()> {
        if !self.cube_size.is_finite() || self.cube_size <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "cube size must be positive and finite, got {}",
                self.cube_size
            )));
        }
        if !self.target.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "target value must be finite, got {}",
                self.target
            )));
        }
        Ok(())
    }
}
