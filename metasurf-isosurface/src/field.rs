//! Scalar potential field over a set of influence sources
//!
//! Every source contributes a compactly supported falloff that is 1 at the
//! skeleton and reaches exactly 0 at one radius. [`Blend`] decides how the
//! contributions of several sources are combined, and [`ScalarField`] holds
//! the field sampled on the corners of the voxel grid.

use itertools::iproduct;
use metasurf_core::{Error, InfluenceSource, Point3f, Vector3f};
use ndarray::Array3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Falloff of a single source at `distance` from its skeleton.
///
/// With `r = distance / radius` and `d = 10 * radius` this is
/// `(r⁴ - 2r² + 1) / (1 + d·r²)` inside the radius and 0 outside.
pub fn falloff(distance: f32, radius: f32) -> f32 {
    let r = distance / radius;
    if r <= 1.0 {
        let d = radius * 10.0;
        let r2 = r * r;
        (r2 * r2 - 2.0 * r2 + 1.0) / (1.0 + d * r2)
    } else {
        0.0
    }
}

/// Strategy for combining the contributions of several sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Blend {
    /// Sum of all contributions; nearby sources melt into each other
    #[default]
    Sum,
    /// Strongest contribution only; sources union without blending
    Max,
    /// Only the first source in the list is evaluated
    First,
}

impl Blend {
    /// Fold per-source contributions into one potential.
    ///
    /// `First` pulls a single item, so the remaining contributions are never
    /// computed when the iterator is lazy.
    pub fn combine<I>(self, contributions: I) -> f32
    where
        I: IntoIterator<Item = f32>,
    {
        let mut contributions = contributions.into_iter();
        match self {
            Blend::Sum => contributions.sum(),
            Blend::Max => contributions.fold(0.0, f32::max),
            Blend::First => contributions.next().unwrap_or(0.0),
        }
    }
}

impl fmt::Display for Blend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Blend::Sum => "sum",
            Blend::Max => "max",
            Blend::First => "first",
        };
        f.write_str(name)
    }
}

impl FromStr for Blend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sum" => Ok(Blend::Sum),
            "max" => Ok(Blend::Max),
            "first" => Ok(Blend::First),
            other => Err(Error::InvalidConfig(format!(
                "unknown blend '{}', expected one of: sum, max, first",
                other
            ))),
        }
    }
}

/// The combined potential of a borrowed source list
#[derive(Debug, Clone, Copy)]
pub struct PotentialField<'a, S> {
    sources: &'a [S],
    blend: Blend,
}

impl<'a, S: InfluenceSource> PotentialField<'a, S> {
    pub fn new(sources: &'a [S], blend: Blend) -> Self {
        Self { sources, blend }
    }

    /// Potential at an absolute position, never negative
    pub fn value_at(&self, point: &Point3f) -> f32 {
        self.blend.combine(
            self.sources
                .iter()
                .map(|source| falloff(source.distance_to(point), source.radius())),
        )
    }

    /// Surface normal at `point` from a central difference with the given step.
    ///
    /// The potential falls off away from the skeleton, so the negated gradient
    /// points out of the surface. Flat regions yield `+Z`.
    pub fn normal_at(&self, point: &Point3f, step: f32) -> Vector3f {
        let dx = Vector3f::new(step, 0.0, 0.0);
        let dy = Vector3f::new(0.0, step, 0.0);
        let dz = Vector3f::new(0.0, 0.0, step);

        let normal = Vector3f::new(
            self.value_at(&(*point - dx)) - self.value_at(&(*point + dx)),
            self.value_at(&(*point - dy)) - self.value_at(&(*point + dy)),
            self.value_at(&(*point - dz)) - self.value_at(&(*point + dz)),
        );

        normal
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(|| Vector3f::new(0.0, 0.0, 1.0))
    }
}

/// Potential sampled on the corners of a regular voxel grid.
///
/// Samples live in one `[z, y, x]` array in standard layout, so the flat
/// index of `(x, y, z)` is `z * width * height + y * width + x`.
#[derive(Debug, Clone)]
pub struct ScalarField {
    values: Array3<f32>,
    origin: Point3f,
    cube_size: f32,
}

impl ScalarField {
    /// Value held by a slot that has not been sampled yet
    pub const UNSET: f32 = -1.0;

    /// Allocate an unsampled grid of `cells` cubes per axis (`[x, y, z]`),
    /// which has one more corner than cubes along each axis
    pub fn new(origin: Point3f, cube_size: f32, cells: [usize; 3]) -> Self {
        let shape = (cells[2] + 1, cells[1] + 1, cells[0] + 1);
        Self {
            values: Array3::from_elem(shape, Self::UNSET),
            origin,
            cube_size,
        }
    }

    /// Corner samples per axis as `[width, height, depth]`
    pub fn dimensions(&self) -> [usize; 3] {
        let (depth, height, width) = self.values.dim();
        [width, height, depth]
    }

    /// Cubes per axis as `[x, y, z]`
    pub fn cells(&self) -> [usize; 3] {
        let [width, height, depth] = self.dimensions();
        [width - 1, height - 1, depth - 1]
    }

    pub fn origin(&self) -> Point3f {
        self.origin
    }

    pub fn cube_size(&self) -> f32 {
        self.cube_size
    }

    /// Flat index of a lattice coordinate
    pub fn flat_index(&self, x: usize, y: usize, z: usize) -> usize {
        let [width, height, _] = self.dimensions();
        z * width * height + y * width + x
    }

    /// Absolute position of a lattice coordinate
    pub fn position(&self, x: usize, y: usize, z: usize) -> Point3f {
        Point3f::new(
            self.origin.x + x as f32 * self.cube_size,
            self.origin.y + y as f32 * self.cube_size,
            self.origin.z + z as f32 * self.cube_size,
        )
    }

    /// Sample at a lattice coordinate
    pub fn value(&self, x: usize, y: usize, z: usize) -> f32 {
        self.values[[z, y, x]]
    }

    /// All samples in flat index order
    pub fn as_slice(&self) -> &[f32] {
        self.values
            .as_slice()
            .expect("scalar field is allocated in standard layout")
    }

    /// Whether every slot has been sampled
    pub fn is_filled(&self) -> bool {
        self.values.iter().all(|&value| value != Self::UNSET)
    }

    /// Evaluate `potential` at every corner, z outermost.
    ///
    /// # Panics
    ///
    /// If a slot is written twice.
    pub fn sample<F>(&mut self, potential: F)
    where
        F: Fn(&Point3f) -> f32,
    {
        let [width, height, depth] = self.dimensions();
        for (z, y, x) in iproduct!(0..depth, 0..height, 0..width) {
            let position = self.position(x, y, z);
            let slot = &mut self.values[[z, y, x]];
            assert!(
                *slot == Self::UNSET,
                "scalar field slot ({}, {}, {}) sampled twice",
                x,
                y,
                z
            );
            *slot = potential(&position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use metasurf_core::SphereSource;

    fn two_spheres() -> Vec<SphereSource> {
        vec![
            SphereSource::new(Point3f::new(0.0, 0.0, 0.0), 1.0),
            SphereSource::new(Point3f::new(0.5, 0.0, 0.0), 1.0),
        ]
    }

    #[test]
    fn test_falloff_shape() {
        assert_relative_eq!(falloff(0.0, 2.0), 1.0);
        assert_eq!(falloff(2.0, 2.0), 0.0);
        assert_eq!(falloff(2.5, 2.0), 0.0);

        // r = 0.5, d = 20: (0.0625 - 0.5 + 1) / (1 + 5)
        assert_relative_eq!(falloff(1.0, 2.0), 0.5625 / 6.0);

        let mut previous = falloff(0.0, 1.0);
        for i in 1..=20 {
            let value = falloff(i as f32 * 0.05, 1.0);
            assert!(value <= previous);
            assert!(value >= 0.0);
            previous = value;
        }
    }

    #[test]
    fn test_blend_combine() {
        let values = [0.25, 0.5, 0.125];
        assert_relative_eq!(Blend::Sum.combine(values), 0.875);
        assert_relative_eq!(Blend::Max.combine(values), 0.5);
        assert_relative_eq!(Blend::First.combine(values), 0.25);

        for blend in [Blend::Sum, Blend::Max, Blend::First] {
            assert_eq!(blend.combine(std::iter::empty()), 0.0);
        }
    }

    #[test]
    fn test_blend_parse() {
        for blend in [Blend::Sum, Blend::Max, Blend::First] {
            assert_eq!(blend.to_string().parse::<Blend>(), Ok(blend));
        }
        assert_eq!("MAX".parse::<Blend>(), Ok(Blend::Max));
        assert!("smooth".parse::<Blend>().is_err());
    }

    #[test]
    fn test_potential_blends_all_sources() {
        let sources = two_spheres();
        let point = Point3f::new(0.25, 0.0, 0.0);
        let single = falloff(0.25, 1.0);

        let sum = PotentialField::new(&sources, Blend::Sum).value_at(&point);
        let max = PotentialField::new(&sources, Blend::Max).value_at(&point);
        let first = PotentialField::new(&sources, Blend::First).value_at(&point);

        assert_relative_eq!(sum, 2.0 * single);
        assert_relative_eq!(max, single);
        assert_relative_eq!(first, single);

        // Only the second sphere reaches this point
        let far = Point3f::new(1.25, 0.0, 0.0);
        assert!(PotentialField::new(&sources, Blend::Sum).value_at(&far) > 0.0);
        assert_eq!(PotentialField::new(&sources, Blend::First).value_at(&far), 0.0);
    }

    #[test]
    fn test_potential_of_empty_list() {
        let sources: Vec<SphereSource> = Vec::new();
        let field = PotentialField::new(&sources, Blend::Sum);
        assert_eq!(field.value_at(&Point3f::origin()), 0.0);
        assert_eq!(field.normal_at(&Point3f::origin(), 0.1), Vector3f::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_normal_points_outward() {
        let sources = [SphereSource::new(Point3f::new(1.0, -1.0, 0.5), 2.0)];
        let field = PotentialField::new(&sources, Blend::Sum);

        for direction in [
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.0, -1.0, 0.0),
            Vector3f::new(0.0, 0.0, 1.0),
            Vector3f::new(1.0, 1.0, -1.0).normalize(),
        ] {
            let point = sources[0].center + direction * 0.7;
            let normal = field.normal_at(&point, 0.05);
            assert_relative_eq!(normal.magnitude(), 1.0, epsilon = 1e-5);
            assert!(normal.dot(&direction) > 0.99, "normal {:?} for {:?}", normal, direction);
        }
    }

    #[test]
    fn test_scalar_field_layout() {
        let field = ScalarField::new(Point3f::new(-1.0, 0.0, 2.0), 0.5, [3, 2, 1]);

        assert_eq!(field.dimensions(), [4, 3, 2]);
        assert_eq!(field.cells(), [3, 2, 1]);
        assert_eq!(field.as_slice().len(), 4 * 3 * 2);
        assert_eq!(field.flat_index(1, 2, 1), 12 + 2 * 4 + 1);
        assert_eq!(field.position(2, 1, 1), Point3f::new(0.0, 0.5, 2.5));
        assert!(!field.is_filled());
    }

    #[test]
    fn test_scalar_field_sample() {
        let mut field = ScalarField::new(Point3f::origin(), 1.0, [2, 2, 2]);
        field.sample(|p| p.x + 10.0 * p.y + 100.0 * p.z);

        assert!(field.is_filled());
        for (x, y, z) in iproduct!(0..3, 0..3, 0..3) {
            let expected = x as f32 + 10.0 * y as f32 + 100.0 * z as f32;
            assert_eq!(field.value(x, y, z), expected);
            assert_eq!(field.as_slice()[field.flat_index(x, y, z)], expected);
        }
    }

    #[test]
    #[should_panic(expected = "sampled twice")]
    fn test_scalar_field_rejects_resampling() {
        let mut field = ScalarField::new(Point3f::origin(), 1.0, [1, 1, 1]);
        field.sample(|_| 0.5);
        field.sample(|_| 0.5);
    }
}
