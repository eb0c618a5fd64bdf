//! # Procedural Geometry Generation
//!
//! This module provides functions to generate the primitive shapes the
//! scene is built from, eliminating the need for external model files.
//!
//! ## Supported Primitives
//!
//! - **Plane**: Flat XZ plane facing +Y
//! - **Box**: Unit cube, each face addressable on its own
//! - **Cylinder**: Unit cylinder standing on the origin, sides and caps addressable
//! - **Torus**: Ring in the XY plane
//! - **Sphere**: UV sphere, upper and lower halves addressable
//!
//! All shapes are Y-up with counter-clockwise winding seen from outside.
//!
//! ## Usage
//!
//! ```rust
//! use deskscene::gfx::geometry::{generate_cube, generate_cylinder, parts};
//!
//! let cube = generate_cube();
//! let front = cube.part(parts::FRONT).unwrap();
//! assert_eq!(front.len(), 6);
//!
//! let cylinder = generate_cylinder(24);
//! assert!(cylinder.part(parts::SIDES).is_some());
//! ```

pub mod primitives;

use std::ops::Range;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Named index range inside a [`GeometryData`]
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryPart {
    pub name: &'static str,
    pub indices: Range<u32>,
}

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
    /// Sub-surfaces that can be drawn on their own
    pub parts: Vec<GeometryPart>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Index range covering the whole mesh
    pub fn all_indices(&self) -> Range<u32> {
        0..self.indices.len() as u32
    }

    /// Index range of a named part
    pub fn part(&self, name: &str) -> Option<Range<u32>> {
        self.parts
            .iter()
            .find(|part| part.name == name)
            .map(|part| part.indices.clone())
    }

    pub(crate) fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u32 {
        self.vertices.push(position);
        self.normals.push(normal);
        self.tex_coords.push(uv);
        self.vertices.len() as u32 - 1
    }

    /// Records every index pushed since `start` as the part `name`
    pub(crate) fn mark_part(&mut self, name: &'static str, start: usize) {
        self.parts.push(GeometryPart {
            name,
            indices: start as u32..self.indices.len() as u32,
        });
    }

    /// Interleaves the attribute streams into the renderer's vertex format
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                tex_coords: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect()
    }
}
