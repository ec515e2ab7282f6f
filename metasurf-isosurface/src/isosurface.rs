//! Isosurface engine: skeleton sources in, indexed triangle mesh out
//!
//! [`Isosurface`] owns the output buffers and keeps them between calls, so a
//! renderer can read them after every rebuild. Each rebuild computes the
//! bounding volume of the sources, samples the potential on every corner of
//! the voxel grid, marches every cube, and merges the triangle corners that
//! neighbouring cubes share.

use crate::config::IsosurfaceConfig;
use crate::field::{PotentialField, ScalarField};
use crate::tables::CUBE_OFFSETS;
use crate::triangulate::{triangulate, Cell};
use itertools::iproduct;
use metasurf_core::{
    Aabb, Error, InfluenceSource, MeshVertex, Point3f, PositionKey, Result, TriangleMesh,
    Vector3f,
};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// Union of the extents of all sources. Empty for an empty list.
pub fn bounding_volume<S: InfluenceSource>(sources: &[S]) -> Aabb {
    sources.iter().fold(Aabb::empty(), |mut bounds, source| {
        bounds.union(&source.extent());
        bounds
    })
}

/// Every source needs a positive, finite radius for its falloff to be defined
fn validate_sources<S: InfluenceSource>(sources: &[S]) -> Result<()> {
    for (index, source) in sources.iter().enumerate() {
        let radius = source.radius();
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::InvalidData(format!(
                "source {} has radius {}, expected a positive finite value",
                index, radius
            )));
        }
    }
    Ok(())
}

/// Number of cubes along an axis of length `span`
fn cube_count(span: f32, cube_size: f32) -> usize {
    (span / cube_size) as usize + 1
}

/// Marching cubes mesher over a skeleton potential field
#[derive(Debug, Clone, Default)]
pub struct Isosurface {
    config: IsosurfaceConfig,
    bounds: Aabb,
    vertices: Vec<Point3f>,
    normals: Vec<Vector3f>,
    triangles: Vec<[u32; 3]>,
    vertex_hash: HashMap<PositionKey, u32>,
}

impl Isosurface {
    /// Create an empty engine with the given configuration
    pub fn new(config: IsosurfaceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Default::default()
        })
    }

    /// Rebuild the mesh from scratch with a new configuration.
    ///
    /// An empty source list, or sources whose combined extent is not larger
    /// than one cube along every axis, produce empty buffers. An invalid
    /// configuration or source is rejected before anything is generated and
    /// leaves the engine empty with its previous configuration.
    pub fn calculate<S: InfluenceSource>(
        &mut self,
        sources: &[S],
        config: IsosurfaceConfig,
    ) -> Result<()> {
        self.clear();

        if let Err(err) = config.validate() {
            warn!("Rejected isosurface configuration: {}", err);
            return Err(err);
        }
        if let Err(err) = validate_sources(sources) {
            warn!("Rejected isosurface sources: {}", err);
            return Err(err);
        }

        self.config = config;
        self.rebuild(sources);
        Ok(())
    }

    /// Rebuild the mesh for a new set of sources with the stored configuration.
    ///
    /// This is a full rebuild: all buffers and the vertex map are cleared
    /// first, so the result reflects only `sources`.
    pub fn update<S: InfluenceSource>(&mut self, sources: &[S]) -> Result<()> {
        self.clear();

        if let Err(err) = validate_sources(sources) {
            warn!("Rejected isosurface sources: {}", err);
            return Err(err);
        }

        self.rebuild(sources);
        Ok(())
    }

    /// Drop all generated geometry, keeping the configuration
    pub fn clear(&mut self) {
        self.bounds = Aabb::empty();
        self.vertices.clear();
        self.normals.clear();
        self.triangles.clear();
        self.vertex_hash.clear();
    }

    pub fn config(&self) -> &IsosurfaceConfig {
        &self.config
    }

    /// Bounding volume used by the last rebuild
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Vertex positions
    pub fn vertices(&self) -> &[Point3f] {
        &self.vertices
    }

    /// Unit normals, one per vertex
    pub fn normals(&self) -> &[Vector3f] {
        &self.normals
    }

    /// Triangles as indices into [`vertices`](Self::vertices)
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Interleaved position + normal stream for upload
    pub fn vertex_buffer(&self) -> Vec<MeshVertex> {
        self.vertices
            .iter()
            .zip(&self.normals)
            .map(|(position, normal)| MeshVertex::new(*position, *normal))
            .collect()
    }

    /// Flattened triangle index stream for upload
    pub fn index_buffer(&self) -> Vec<u32> {
        self.triangles.iter().flatten().copied().collect()
    }

    /// Copy the buffers into a [`TriangleMesh`]
    pub fn to_mesh(&self) -> TriangleMesh {
        let faces = self
            .triangles
            .iter()
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
            .collect();

        let mut mesh = TriangleMesh::from_vertices_and_faces(self.vertices.clone(), faces);
        mesh.set_normals(self.normals.clone());
        mesh
    }

    fn rebuild<S: InfluenceSource>(&mut self, sources: &[S]) {
        let IsosurfaceConfig {
            cube_size,
            blend,
            target,
            interpolation,
        } = self.config;

        self.bounds = bounding_volume(sources);
        if sources.is_empty() || !self.bounds.exceeds(cube_size) {
            debug!(
                "Skipping isosurface: {} sources, bounds {:?} not larger than cube size {}",
                sources.len(),
                self.bounds.span(),
                cube_size
            );
            return;
        }

        let span = self.bounds.span();
        let cells = [
            cube_count(span.x, cube_size),
            cube_count(span.y, cube_size),
            cube_count(span.z, cube_size),
        ];
        debug!(
            "Building isosurface: {} sources, {:?} cubes of size {}, blend {}, target {}",
            sources.len(),
            cells,
            cube_size,
            blend,
            target
        );

        let field = PotentialField::new(sources, blend);
        let mut grid = ScalarField::new(self.bounds.min, cube_size, cells);
        grid.sample(|position| field.value_at(position));
        debug_assert!(grid.is_filled());
        trace!("Sampled {} scalar field corners", grid.as_slice().len());

        for (z, y, x) in iproduct!(0..cells[2], 0..cells[1], 0..cells[0]) {
            let positions =
                CUBE_OFFSETS.map(|[dx, dy, dz]| grid.position(x + dx, y + dy, z + dz));
            let values = CUBE_OFFSETS.map(|[dx, dy, dz]| grid.value(x + dx, y + dy, z + dz));
            let cell = Cell::new(positions, values, target);

            for triangle in &triangulate(&cell, target, interpolation) {
                let indices = [
                    self.vertex_index(&triangle[0], &field),
                    self.vertex_index(&triangle[1], &field),
                    self.vertex_index(&triangle[2], &field),
                ];
                self.triangles.push(indices);
            }
        }

        debug_assert_eq!(self.vertices.len(), self.normals.len());
        debug!(
            "Isosurface built: {} vertices, {} triangles",
            self.vertices.len(),
            self.triangles.len()
        );
    }

    /// Index of the vertex at `position`, appending it (with its normal) the
    /// first time the position is seen
    fn vertex_index<S: InfluenceSource>(
        &mut self,
        position: &Point3f,
        field: &PotentialField<'_, S>,
    ) -> u32 {
        match self.vertex_hash.entry(PositionKey::new(position)) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let index = self.vertices.len() as u32;
                self.vertices.push(*position);
                self.normals.push(field.normal_at(position, self.config.cube_size));
                entry.insert(index);
                index
            }
        }
    }
}

/// Convenience function: extract the isosurface of `sources` into a mesh
pub fn extract_isosurface<S: InfluenceSource>(
    sources: &[S],
    config: IsosurfaceConfig,
) -> Result<TriangleMesh> {
    let mut isosurface = Isosurface::default();
    isosurface.calculate(sources, config)?;
    Ok(isosurface.to_mesh())
}
