// src/lib.rs
//! Desk Scene
//!
//! Scene state registry and per-draw shader configuration for a small,
//! fixed 3D scene built from primitive meshes, rendered with wgpu.

pub mod config;
pub mod error;
pub mod gfx;
pub mod prelude;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use config::SceneConfig;
pub use error::{Result, SceneError};
