//! # Desk Scene Prelude
//!
//! Commonly used types in one import:
//!
//! ```rust
//! use deskscene::prelude::*;
//!
//! let object = SceneObject::new("plank", MeshDraw::Box)
//!     .with_transform(Transform::default().with_scale(1.0, 7.0, 1.0))
//!     .with_texture("plank")
//!     .with_material("wood");
//! assert_eq!(object.mesh.kind(), MeshKind::Box);
//! ```

pub use crate::config::SceneConfig;
pub use crate::error::{Result, SceneError};

pub use crate::gfx::lighting::{
    Attenuation, DirectionalLight, LightColors, LightRig, LightSource, PointLight, SpotLight,
};
pub use crate::gfx::resources::{
    Material, MaterialRegistry, MemoryTextureDevice, TextureDevice, TextureRegistry,
    WgpuTextureDevice,
};
pub use crate::gfx::scene::{
    BoxSide, CylinderParts, FrameStats, MeshDraw, MeshKind, MeshLibrary, PrimitiveMeshes,
    SceneDescription, SceneManager, SceneObject, Surface,
};
pub use crate::gfx::shader::{RecordingSink, ShaderState, UniformSink};
pub use crate::gfx::transform::Transform;

// Re-export common external dependencies
pub use cgmath::{Vector2, Vector3, Vector4};
