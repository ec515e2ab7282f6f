//! Axis-aligned bounding boxes

use crate::point::*;
use serde::{Deserialize, Serialize};

/// An axis-aligned box spanning `min..=max`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Point3f,
    pub max: Point3f,
}

impl Aabb {
    /// Create a box from two corners
    pub fn new(min: Point3f, max: Point3f) -> Self {
        Self { min, max }
    }

    /// The empty box: `min` at +MAX and `max` at -MAX, so any union replaces it
    pub fn empty() -> Self {
        Self {
            min: Point3f::new(f32::MAX, f32::MAX, f32::MAX),
            max: Point3f::new(-f32::MAX, -f32::MAX, -f32::MAX),
        }
    }

    /// Whether no point has been added yet
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Grow the box to include another box
    pub fn union(&mut self, other: &Aabb) {
        self.min.x = self.min.x.min(other.min.x);
        self.min.y = self.min.y.min(other.min.y);
        self.min.z = self.min.z.min(other.min.z);

        self.max.x = self.max.x.max(other.max.x);
        self.max.y = self.max.y.max(other.max.y);
        self.max.z = self.max.z.max(other.max.z);
    }

    /// Grow the box to include a point
    pub fn include_point(&mut self, point: &Point3f) {
        self.union(&Aabb::new(*point, *point));
    }

    /// Edge lengths along each axis
    pub fn span(&self) -> Vector3f {
        self.max - self.min
    }

    /// Center of the box
    pub fn center(&self) -> Point3f {
        Point3f::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }

    /// A copy grown by `amount` on every side
    pub fn inflated(&self, amount: f32) -> Self {
        let offset = Vector3f::new(amount, amount, amount);
        Self {
            min: self.min - offset,
            max: self.max + offset,
        }
    }

    /// Whether the point lies inside or on the boundary
    pub fn contains(&self, point: &Point3f) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Whether every axis is strictly longer than `length`
    pub fn exceeds(&self, length: f32) -> bool {
        let span = self.span();
        span.x > length && span.y > length && span.z > length
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
