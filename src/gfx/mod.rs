//! # Graphics Module
//!
//! Everything between static scene content and the GPU:
//!
//! - **Geometry** ([`geometry`]) - procedural primitive meshes
//! - **Resources** ([`resources`]) - texture and material registries
//! - **Shader** ([`shader`]) - the uniform sink every per-draw write goes through
//! - **Lighting** ([`lighting`]) - the fixed directional/spot/point light set
//! - **Transform** ([`transform`]) - model matrix composition
//! - **Scene** ([`scene`]) - scene description and the assembler that drives a frame
//!
//! ## Usage
//!
//! ```no_run
//! use deskscene::config::SceneConfig;
//! use deskscene::gfx::resources::MemoryTextureDevice;
//! use deskscene::gfx::scene::{desk::desk_scene, PrimitiveMeshes, SceneManager};
//! use deskscene::gfx::shader::RecordingSink;
//!
//! let scene = desk_scene();
//! let mut manager = SceneManager::new(
//!     SceneConfig::default(),
//!     MemoryTextureDevice::new(),
//!     RecordingSink::new(),
//!     PrimitiveMeshes::new(),
//! );
//! manager.prepare(&scene).unwrap();
//! let stats = manager.render(&scene);
//! ```

pub mod geometry;
pub mod lighting;
pub mod resources;
pub mod scene;
pub mod shader;
pub mod transform;

// Re-export commonly used types
pub use lighting::LightRig;
pub use transform::Transform;
