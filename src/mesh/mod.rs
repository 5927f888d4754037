// src/mesh/mod.rs
//! Triangle mesh exchange
//!
//! An external collaborator to the render engines: meshes are loaded and
//! written by user-supplied render/update callables. The engine core never
//! depends on this module.

pub mod vtk;

// Re-export commonly used types
pub use vtk::{load_vtk, write_vtk};

use crate::utils::errors::{EngineError, Result};

/// An indexed triangle mesh
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh {
    name: Option<String>,
    vertices: Vec<[f64; 3]>,
    triangles: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Build a mesh, validating that every triangle references a real vertex
    pub fn new(
        name: Option<String>,
        vertices: Vec<[f64; 3]>,
        triangles: Vec<[u32; 3]>,
    ) -> Result<Self> {
        let vertex_count = vertices.len();
        for (index, triangle) in triangles.iter().enumerate() {
            for &corner in triangle {
                if corner as usize >= vertex_count {
                    return Err(EngineError::MeshData(format!(
                        "triangle {} references vertex {}, mesh has {} vertices",
                        index, corner, vertex_count
                    )));
                }
            }
        }

        Ok(Self {
            name,
            vertices,
            triangles,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn vertices(&self) -> &[[f64; 3]] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}
