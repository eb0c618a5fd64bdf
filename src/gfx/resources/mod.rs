// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Texture and material registries plus the wgpu texture backend.

pub mod material;
pub mod texture_registry;
pub mod texture_resource;

// Re-export main types
pub use material::{Material, MaterialRegistry};
pub use texture_registry::{
    DecodedImage, MemoryTextureDevice, TextureDevice, TextureHandle, TextureRegistry, TextureSlot,
};
pub use texture_resource::{TextureResource, WgpuTextureDevice};
