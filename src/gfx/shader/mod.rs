//! # Shader State Gateway
//!
//! Every per-draw uniform write (model matrix, colour, texture selection,
//! UV scale, material, lights) flows through the [`UniformSink`] trait.
//! After an object's writes the scene calls [`UniformSink::commit`] and then
//! issues the draw, so a sink can capture the state that draw must see.
//!
//! Two implementations ship with the crate:
//!
//! - [`ShaderState`] - mirrors the scene shader's uniform block on the CPU
//!   and keeps one snapshot per committed draw for a dynamic-offset buffer
//! - [`RecordingSink`] - records every write in order, for tests and tracing
//!
//! The WGSL side of the block lives in [`wgsl`].

pub mod recording;
pub mod shader_state;
pub mod wgsl;

use cgmath::{Matrix4, Vector2, Vector3, Vector4};

pub use recording::{RecordingSink, UniformValue};
pub use shader_state::{ShaderFrameBuffer, ShaderState, ShaderUniforms};
pub use wgsl::{scene_shader_source, CameraUniforms};

/// Uniform names understood by the scene shader
pub mod names {
    pub const MODEL: &str = "model";
    pub const OBJECT_COLOR: &str = "objectColor";
    pub const OBJECT_TEXTURE: &str = "objectTexture";
    pub const USE_TEXTURE: &str = "bUseTexture";
    pub const USE_LIGHTING: &str = "bUseLighting";
    pub const UV_SCALE: &str = "UVscale";

    pub const MATERIAL: &str = "material";
    pub const MATERIAL_DIFFUSE: &str = "material.diffuseColor";
    pub const MATERIAL_SPECULAR: &str = "material.specularColor";
    pub const MATERIAL_SHININESS: &str = "material.shininess";

    pub const AMBIENT_LIGHT: &str = "ambientLight";
    pub const DIRECTIONAL_LIGHT: &str = "directionalLight";
    pub const SPOT_LIGHT: &str = "spotLight";
    pub const POINT_LIGHTS: &str = "pointLights";

    /// `directionalLight.diffuse`, `spotLight.cutOff`, ...
    pub fn field(block: &str, field: &str) -> String {
        format!("{}.{}", block, field)
    }

    /// `pointLights[2].position`, ...
    pub fn indexed_field(array: &str, index: usize, field: &str) -> String {
        format!("{}[{}].{}", array, index, field)
    }
}

/// Named-uniform setters for the active shader program
///
/// Implementors apply each write immediately. There is no batching and
/// no dirty tracking at this level.
pub trait UniformSink {
    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>);
    fn set_vec2(&mut self, name: &str, value: Vector2<f32>);
    fn set_vec3(&mut self, name: &str, value: Vector3<f32>);
    fn set_vec4(&mut self, name: &str, value: Vector4<f32>);
    fn set_float(&mut self, name: &str, value: f32);
    fn set_bool(&mut self, name: &str, value: bool);
    fn set_int(&mut self, name: &str, value: i32);

    /// Selects the texture unit a sampler reads from
    fn set_sampler(&mut self, name: &str, unit: u32) {
        self.set_int(name, unit as i32);
    }

    /// Marks the current state as the one the next draw uses
    fn commit(&mut self) {}
}

impl<T: UniformSink + ?Sized> UniformSink for &mut T {
    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>) {
        (**self).set_mat4(name, value)
    }

    fn set_vec2(&mut self, name: &str, value: Vector2<f32>) {
        (**self).set_vec2(name, value)
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) {
        (**self).set_vec3(name, value)
    }

    fn set_vec4(&mut self, name: &str, value: Vector4<f32>) {
        (**self).set_vec4(name, value)
    }

    fn set_float(&mut self, name: &str, value: f32) {
        (**self).set_float(name, value)
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        (**self).set_bool(name, value)
    }

    fn set_int(&mut self, name: &str, value: i32) {
        (**self).set_int(name, value)
    }

    fn set_sampler(&mut self, name: &str, unit: u32) {
        (**self).set_sampler(name, unit)
    }

    fn commit(&mut self) {
        (**self).commit()
    }
}
