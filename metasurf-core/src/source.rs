//! Concrete influence source shapes

use crate::point::*;
use crate::traits::InfluenceSource;
use serde::{Deserialize, Serialize};

/// A point skeleton node: influence falls off with distance from `center`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereSource {
    pub center: Point3f,
    pub radius: f32,
}

impl SphereSource {
    /// Create a new sphere source
    pub fn new(center: Point3f, radius: f32) -> Self {
        Self { center, radius }
    }
}

impl InfluenceSource for SphereSource {
    fn position(&self) -> Point3f {
        self.center
    }

    fn radius(&self) -> f32 {
        self.radius
    }

    fn distance_to(&self, point: &Point3f) -> f32 {
        (*point - self.center).magnitude()
    }
}

/// A bone skeleton node: influence falls off with distance from the segment
/// `start..end`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapsuleSource {
    pub start: Point3f,
    pub end: Point3f,
    pub radius: f32,
}

impl CapsuleSource {
    /// Create a new capsule source
    pub fn new(start: Point3f, end: Point3f, radius: f32) -> Self {
        Self { start, end, radius }
    }

    /// Point on the segment closest to `point`
    pub fn closest_point(&self, point: &Point3f) -> Point3f {
        let axis = self.end - self.start;
        let length_sq = axis.magnitude_squared();
        if length_sq <= f32::EPSILON {
            return self.start;
        }

        let t = ((*point - self.start).dot(&axis) / length_sq).clamp(0.0, 1.0);
        self.start + axis * t
    }
}

impl InfluenceSource for CapsuleSource {
    fn position(&self) -> Point3f {
        Point3f::from((self.start.coords + self.end.coords) / 2.0)
    }

    fn radius(&self) -> f32 {
        self.radius
    }

    fn distance_to(&self, point: &Point3f) -> f32 {
        (*point - self.closest_point(point)).magnitude()
    }

    fn extends_from(&self) -> Point3f {
        Point3f::new(
            self.start.x.min(self.end.x) - self.radius,
            self.start.y.min(self.end.y) - self.radius,
            self.start.z.min(self.end.z) - self.radius,
        )
    }

    fn extends_to(&self) -> Point3f {
        Point3f::new(
            self.start.x.max(self.end.x) + self.radius,
            self.start.y.max(self.end.y) + self.radius,
            self.start.z.max(self.end.z) + self.radius,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sphere_distance() {
        let sphere = SphereSource::new(Point3f::new(1.0, 0.0, 0.0), 2.0);
        assert_relative_eq!(sphere.distance_to(&Point3f::new(4.0, 4.0, 0.0)), 5.0);
        assert_eq!(sphere.distance_to(&sphere.center), 0.0);
        assert_eq!(sphere.position(), sphere.center);
        assert_eq!(sphere.radius(), 2.0);
    }

    #[test]
    fn test_capsule_distance() {
        let capsule = CapsuleSource::new(
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(4.0, 0.0, 0.0),
            1.0,
        );

        // Beside the segment
        assert_relative_eq!(capsule.distance_to(&Point3f::new(2.0, 3.0, 0.0)), 3.0);
        // Past either end the distance is to the endpoint
        assert_relative_eq!(capsule.distance_to(&Point3f::new(7.0, 4.0, 0.0)), 5.0);
        assert_relative_eq!(capsule.distance_to(&Point3f::new(-3.0, 0.0, 4.0)), 5.0);
        assert_eq!(capsule.position(), Point3f::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_capsule_extents() {
        let capsule = CapsuleSource::new(
            Point3f::new(2.0, -1.0, 0.0),
            Point3f::new(-2.0, 1.0, 0.5),
            0.5,
        );

        assert_eq!(capsule.extends_from(), Point3f::new(-2.5, -1.5, -0.5));
        assert_eq!(capsule.extends_to(), Point3f::new(2.5, 1.5, 1.0));
    }

    #[test]
    fn test_degenerate_capsule_is_a_sphere() {
        let p = Point3f::new(1.0, 1.0, 1.0);
        let capsule = CapsuleSource::new(p, p, 1.0);
        let sphere = SphereSource::new(p, 1.0);
        let query = Point3f::new(2.0, 3.0, -1.0);

        assert_relative_eq!(capsule.distance_to(&query), sphere.distance_to(&query));
        assert_eq!(capsule.extent(), sphere.extent());
    }
}
