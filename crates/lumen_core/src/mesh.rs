//! Indexed triangle meshes.
//!
//! The renderer never intersects an indexed mesh directly: it asks for a
//! triangle soup (every three consecutive vertices form one triangle) and
//! subdivides that into a tree of containers.

use std::f32::consts::PI;

use lumen_math::{Aabb, Vec3};

/// A mesh consisting of vertex positions and triangle indices.
///
/// Triangles are wound counter-clockwise when seen from the side their
/// normal points to.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Axis-aligned bounding box
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a new mesh from positions and indices.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let bounds = Aabb::enclosing(positions.iter());
        Self {
            positions,
            indices,
            bounds,
        }
    }

    /// Latitude/longitude sphere centred on the origin.
    ///
    /// `segments` runs around the Y axis, `rings` from pole to pole. Both are
    /// raised to sensible minimums. Degenerate triangles at the poles are
    /// left out.
    pub fn uv_sphere(radius: f32, segments: u32, rings: u32) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);

        let mut positions = Vec::with_capacity(((rings + 1) * segments) as usize);
        for i in 0..=rings {
            let theta = PI * i as f32 / rings as f32;
            for j in 0..segments {
                let phi = 2.0 * PI * j as f32 / segments as f32;
                positions.push(
                    Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin()) * radius,
                );
            }
        }

        let vertex = |i: u32, j: u32| i * segments + (j % segments);
        let mut indices = Vec::new();
        for i in 0..rings {
            for j in 0..segments {
                let a = vertex(i, j);
                let b = vertex(i, j + 1);
                let c = vertex(i + 1, j);
                let d = vertex(i + 1, j + 1);
                if i != 0 {
                    indices.extend_from_slice(&[a, b, c]);
                }
                if i != rings - 1 {
                    indices.extend_from_slice(&[b, d, c]);
                }
            }
        }

        Self::new(positions, indices)
    }

    /// Get the mesh center (center of bounding box).
    pub fn center(&self) -> Vec3 {
        self.bounds.centroid()
    }

    /// Get the mesh size (diagonal length of bounding box).
    pub fn size(&self) -> f32 {
        (self.bounds.half_extents() * 2.0).length()
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Scale then translate every vertex in place.
    pub fn transform(&mut self, scale: f32, offset: Vec3) {
        for p in &mut self.positions {
            *p = *p * scale + offset;
        }
        self.bounds = Aabb::enclosing(self.positions.iter());
    }

    /// Flatten into a triangle soup: every three consecutive vertices are one
    /// triangle. Triangles referencing missing vertices are skipped.
    pub fn triangle_soup(&self) -> Vec<Vec3> {
        let mut soup = Vec::with_capacity(self.indices.len());

        for chunk in self.indices.chunks_exact(3) {
            let i0 = chunk[0] as usize;
            let i1 = chunk[1] as usize;
            let i2 = chunk[2] as usize;

            if i0 >= self.positions.len() || i1 >= self.positions.len() || i2 >= self.positions.len() {
                log::warn!(
                    "Invalid triangle indices: [{}, {}, {}], vertex count: {}",
                    i0,
                    i1,
                    i2,
                    self.positions.len()
                );
                continue;
            }

            soup.extend_from_slice(&[self.positions[i0], self.positions[i1], self.positions[i2]]);
        }

        soup
    }
}
