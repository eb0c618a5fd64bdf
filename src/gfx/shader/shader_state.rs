//! CPU mirror of the scene shader's uniform block
//!
//! [`ShaderUniforms`] has the exact layout of the `SceneUniforms` struct in
//! `scene.wgsl` (WGSL uniform address space rules, every `vec3` padded to
//! 16 bytes). [`ShaderState`] resolves uniform names onto its fields so the
//! rest of the crate can keep addressing uniforms by name.
//!
//! Each [`UniformSink::commit`] appends a copy of the block to the frame.
//! The frame is uploaded in one write to a [`ShaderFrameBuffer`] and draw
//! `i` binds it at `offset(i)`, so every draw sees its own state.

use cgmath::{Matrix4, SquareMatrix, Vector2, Vector3, Vector4};

use super::{names, UniformSink};
use crate::gfx::lighting::MAX_POINT_LIGHTS;
use crate::wgpu_utils::DynamicUniformBuffer;

/// `material` struct
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialBlock {
    pub diffuse_color: [f32; 3],
    pub shininess: f32,
    pub specular_color: [f32; 3],
    _padding: f32,
}

/// `directionalLight` struct
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalBlock {
    pub direction: [f32; 3],
    pub active: u32,
    pub ambient: [f32; 3],
    _padding0: f32,
    pub diffuse: [f32; 3],
    _padding1: f32,
    pub specular: [f32; 3],
    _padding2: f32,
}

/// `spotLight` struct
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpotBlock {
    pub position: [f32; 3],
    pub constant: f32,
    pub direction: [f32; 3],
    pub linear: f32,
    pub ambient: [f32; 3],
    pub quadratic: f32,
    pub diffuse: [f32; 3],
    pub cut_off: f32,
    pub specular: [f32; 3],
    pub outer_cut_off: f32,
    pub active: u32,
    _padding: [u32; 3],
}

/// One entry of the `pointLights` array
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointBlock {
    pub position: [f32; 3],
    pub constant: f32,
    pub ambient: [f32; 3],
    pub linear: f32,
    pub diffuse: [f32; 3],
    pub quadratic: f32,
    pub specular: [f32; 3],
    pub active: u32,
}

/// Uniform block content, mirrored by `SceneUniforms` in `scene.wgsl`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShaderUniforms {
    pub model: [[f32; 4]; 4],
    pub object_color: [f32; 4],
    pub uv_scale: [f32; 2],
    pub use_texture: u32,
    pub use_lighting: u32,
    pub object_texture: i32,
    _padding0: [u32; 3],
    pub ambient_light: [f32; 3],
    _padding1: f32,
    pub material: MaterialBlock,
    pub directional_light: DirectionalBlock,
    pub spot_light: SpotBlock,
    pub point_lights: [PointBlock; MAX_POINT_LIGHTS],
}
// Total: 64 + 16 + 8 + 4 + 4 + 4 + 12 + 16 + 32 + 64 + 96 + 4 * 64 = 576 bytes

impl Default for ShaderUniforms {
    fn default() -> Self {
        Self {
            model: Matrix4::identity().into(),
            object_color: [1.0, 1.0, 1.0, 1.0],
            uv_scale: [1.0, 1.0],
            use_texture: 0,
            use_lighting: 0,
            object_texture: 0,
            _padding0: [0; 3],
            ambient_light: [0.0; 3],
            _padding1: 0.0,
            material: MaterialBlock::default(),
            directional_light: DirectionalBlock::default(),
            spot_light: SpotBlock::default(),
            point_lights: [PointBlock::default(); MAX_POINT_LIGHTS],
        }
    }
}

/// Per-draw copies of the block, one per committed draw
pub type ShaderFrameBuffer = DynamicUniformBuffer<ShaderUniforms>;

/// Struct a dotted uniform name addresses
#[derive(Debug, Clone, Copy, PartialEq)]
enum Block {
    Root,
    Material,
    Directional,
    Spot,
    Point(usize),
}

fn split_name(name: &str) -> Option<(Block, &str)> {
    let Some((block, field)) = name.split_once('.') else {
        return Some((Block::Root, name));
    };

    let block = match block {
        names::MATERIAL => Block::Material,
        names::DIRECTIONAL_LIGHT => Block::Directional,
        names::SPOT_LIGHT => Block::Spot,
        indexed => {
            let index: usize = indexed
                .strip_prefix(names::POINT_LIGHTS)?
                .strip_prefix('[')?
                .strip_suffix(']')?
                .parse()
                .ok()?;
            if index >= MAX_POINT_LIGHTS {
                return None;
            }
            Block::Point(index)
        }
    };

    Some((block, field))
}

/// Uniform sink backed by a [`ShaderUniforms`] block
#[derive(Debug, Clone, Default)]
pub struct ShaderState {
    uniforms: ShaderUniforms,
    frame: Vec<ShaderUniforms>,
}

impl ShaderState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current block content
    pub fn uniforms(&self) -> &ShaderUniforms {
        &self.uniforms
    }

    /// Blocks committed since the last take, in draw order
    pub fn frame(&self) -> &[ShaderUniforms] {
        &self.frame
    }

    pub fn take_frame(&mut self) -> Vec<ShaderUniforms> {
        std::mem::take(&mut self.frame)
    }

    /// Creates a frame buffer with room for `draws` blocks
    pub fn create_frame_buffer(device: &wgpu::Device, draws: usize) -> ShaderFrameBuffer {
        DynamicUniformBuffer::new(device, draws)
    }

    /// Moves the committed blocks into `buffer` and starts a new frame
    ///
    /// Returns true when `buffer` grew; bind groups over it must be rebuilt.
    pub fn upload_frame(
        &mut self,
        buffer: &mut ShaderFrameBuffer,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> bool {
        let frame = self.take_frame();
        buffer.write_all(device, queue, &frame)
    }

    fn unknown(name: &str, kind: &str) {
        log::warn!("Uniform '{}' ({}) is not part of the scene shader", name, kind);
    }

    fn vec3_slot(&mut self, name: &str) -> Option<&mut [f32; 3]> {
        let u = &mut self.uniforms;
        let slot = match split_name(name)? {
            (Block::Root, names::AMBIENT_LIGHT) => &mut u.ambient_light,
            (Block::Material, "diffuseColor") => &mut u.material.diffuse_color,
            (Block::Material, "specularColor") => &mut u.material.specular_color,
            (Block::Directional, "direction") => &mut u.directional_light.direction,
            (Block::Directional, "ambient") => &mut u.directional_light.ambient,
            (Block::Directional, "diffuse") => &mut u.directional_light.diffuse,
            (Block::Directional, "specular") => &mut u.directional_light.specular,
            (Block::Spot, "position") => &mut u.spot_light.position,
            (Block::Spot, "direction") => &mut u.spot_light.direction,
            (Block::Spot, "ambient") => &mut u.spot_light.ambient,
            (Block::Spot, "diffuse") => &mut u.spot_light.diffuse,
            (Block::Spot, "specular") => &mut u.spot_light.specular,
            (Block::Point(i), "position") => &mut u.point_lights[i].position,
            (Block::Point(i), "ambient") => &mut u.point_lights[i].ambient,
            (Block::Point(i), "diffuse") => &mut u.point_lights[i].diffuse,
            (Block::Point(i), "specular") => &mut u.point_lights[i].specular,
            _ => return None,
        };
        Some(slot)
    }

    fn float_slot(&mut self, name: &str) -> Option<&mut f32> {
        let u = &mut self.uniforms;
        let slot = match split_name(name)? {
            (Block::Material, "shininess") => &mut u.material.shininess,
            (Block::Spot, "cutOff") => &mut u.spot_light.cut_off,
            (Block::Spot, "outerCutOff") => &mut u.spot_light.outer_cut_off,
            (Block::Spot, "constant") => &mut u.spot_light.constant,
            (Block::Spot, "linear") => &mut u.spot_light.linear,
            (Block::Spot, "quadratic") => &mut u.spot_light.quadratic,
            (Block::Point(i), "constant") => &mut u.point_lights[i].constant,
            (Block::Point(i), "linear") => &mut u.point_lights[i].linear,
            (Block::Point(i), "quadratic") => &mut u.point_lights[i].quadratic,
            _ => return None,
        };
        Some(slot)
    }

    fn flag_slot(&mut self, name: &str) -> Option<&mut u32> {
        let u = &mut self.uniforms;
        let slot = match split_name(name)? {
            (Block::Root, names::USE_TEXTURE) => &mut u.use_texture,
            (Block::Root, names::USE_LIGHTING) => &mut u.use_lighting,
            (Block::Directional, "bActive") => &mut u.directional_light.active,
            (Block::Spot, "bActive") => &mut u.spot_light.active,
            (Block::Point(i), "bActive") => &mut u.point_lights[i].active,
            _ => return None,
        };
        Some(slot)
    }
}

impl UniformSink for ShaderState {
    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>) {
        match name {
            names::MODEL => self.uniforms.model = value.into(),
            _ => Self::unknown(name, "mat4"),
        }
    }

    fn set_vec2(&mut self, name: &str, value: Vector2<f32>) {
        match name {
            names::UV_SCALE => self.uniforms.uv_scale = value.into(),
            _ => Self::unknown(name, "vec2"),
        }
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) {
        match self.vec3_slot(name) {
            Some(slot) => *slot = value.into(),
            None => Self::unknown(name, "vec3"),
        }
    }

    fn set_vec4(&mut self, name: &str, value: Vector4<f32>) {
        match name {
            names::OBJECT_COLOR => self.uniforms.object_color = value.into(),
            _ => Self::unknown(name, "vec4"),
        }
    }

    fn set_float(&mut self, name: &str, value: f32) {
        match self.float_slot(name) {
            Some(slot) => *slot = value,
            None => Self::unknown(name, "float"),
        }
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        match self.flag_slot(name) {
            Some(slot) => *slot = value as u32,
            None => Self::unknown(name, "bool"),
        }
    }

    fn commit(&mut self) {
        self.frame.push(self.uniforms);
    }

    fn set_int(&mut self, name: &str, value: i32) {
        if name == names::OBJECT_TEXTURE {
            self.uniforms.object_texture = value;
            return;
        }
        // Flags are plain ints on the shader side
        match self.flag_slot(name) {
            Some(slot) => *slot = (value != 0) as u32,
            None => Self::unknown(name, "int"),
        }
    }
}
