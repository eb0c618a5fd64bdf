//! # Scene Management Module
//!
//! Static scene content and the assembler that turns it into draws.
//!
//! ## Key Components
//!
//! - [`SceneDescription`] - texture assets, light rig and the ordered object list
//! - [`SceneObject`] - mesh draw, transform, surface, UV scale and material of one draw
//! - [`SceneManager`] - one-time preparation and per-frame submission
//! - [`PrimitiveMeshes`] - the [`MeshLibrary`] built from generated geometry
//! - [`Vertex3D`] - vertex format with position, normal and texture coordinates
//! - [`desk`] - the desk arrangement

pub mod desk;
pub mod mesh_library;
pub mod object;
pub mod scene_manager;
pub mod vertex;

// Re-export main types
pub use mesh_library::{
    BoxSide, CylinderParts, DrawCall, MeshDraw, MeshKind, MeshLibrary, PrimitiveMeshes,
};
pub use object::{SceneObject, Surface};
pub use scene_manager::{FrameStats, PrepareReport, SceneDescription, SceneManager, TextureAsset};
pub use vertex::Vertex3D;
