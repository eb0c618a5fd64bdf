//! WGPU utility functions and helpers
//!
//! Small wrappers shared by the texture device and the shader state.

pub mod binding_types;
pub mod uniform_buffer;

pub use uniform_buffer::{DynamicUniformBuffer, UniformBuffer};
