//! # Procedural Geometry Generation
//!
//! Generates the primitive shapes used by the demo scene, so no model files
//! are needed.
//!
//! - **Sphere**: UV sphere for the color, texture and liquid spheres
//! - **Plane**: subdivided horizontal plane for the water surface
//! - **Cube**: small marker for the light helper
//!
//! ```no_run
//! use aquasphere::gfx::geometry::{generate_cube, generate_plane, generate_sphere};
//!
//! let sphere = generate_sphere(1.0, 48, 32);
//! let water = generate_plane(40.0, 40.0, 8, 8);
//! let marker = generate_cube(0.3);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::{node::Mesh, vertex::Vertex3D};

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves positions, normals and UVs into a scene mesh
    pub fn into_mesh(self) -> Mesh {
        let vertices = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex3D {
                position: *position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                uv: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect();

        Mesh::new(vertices, self.indices)
    }
}
