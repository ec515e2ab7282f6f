//! Core traits for metasurf

use crate::{bounds::Aabb, mesh::*, point::*};

/// A skeleton primitive that contributes to the scalar potential field.
///
/// The engine only ever reads these five quantities. The default extents are
/// the cube of half-size `radius()` around `position()`; shapes that reach
/// further override them.
pub trait InfluenceSource {
    /// Anchor point of the source
    fn position(&self) -> Point3f;

    /// Influence radius, strictly positive
    fn radius(&self) -> f32;

    /// Distance from `point` to the source's skeleton, never negative
    fn distance_to(&self, point: &Point3f) -> f32;

    /// Lower corner of the region the source influences
    fn extends_from(&self) -> Point3f {
        let r = self.radius();
        self.position() - Vector3f::new(r, r, r)
    }

    /// Upper corner of the region the source influences
    fn extends_to(&self) -> Point3f {
        let r = self.radius();
        self.position() + Vector3f::new(r, r, r)
    }

    /// Both extents as a box
    fn extent(&self) -> Aabb {
        Aabb::new(self.extends_from(), self.extends_to())
    }
}

impl<T: InfluenceSource + ?Sized> InfluenceSource for &T {
    fn position(&self) -> Point3f {
        (**self).position()
    }

    fn radius(&self) -> f32 {
        (**self).radius()
    }

    fn distance_to(&self, point: &Point3f) -> f32 {
        (**self).distance_to(point)
    }

    fn extends_from(&self) -> Point3f {
        (**self).extends_from()
    }

    fn extends_to(&self) -> Point3f {
        (**self).extends_to()
    }
}

impl<T: InfluenceSource + ?Sized> InfluenceSource for Box<T> {
    fn position(&self) -> Point3f {
        (**self).position()
    }

    fn radius(&self) -> f32 {
        (**self).radius()
    }

    fn distance_to(&self, point: &Point3f) -> f32 {
        (**self).distance_to(point)
    }

    fn extends_from(&self) -> Point3f {
        (**self).extends_from()
    }

    fn extends_to(&self) -> Point3f {
        (**self).extends_to()
    }
}

/// Trait for drawable/renderable objects
pub trait Drawable {
    /// Get the bounding box of the object
    fn bounding_box(&self) -> Aabb;

    /// Get the center point of the object
    fn center(&self) -> Point3f {
        self.bounding_box().center()
    }
}

impl Drawable for TriangleMesh {
    fn bounding_box(&self) -> Aabb {
        if self.vertices.is_empty() {
            return Aabb::new(Point3f::origin(), Point3f::origin());
        }

        let mut aabb = Aabb::empty();
        for vertex in &self.vertices {
            aabb.include_point(vertex);
        }
        aabb
    }
}
