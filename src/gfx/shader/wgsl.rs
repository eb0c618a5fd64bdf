//! WGSL source for the scene shader
//!
//! `scene.wgsl` declares one texture binding per unit, so the source is
//! generated for the unit count the texture device exposes. The layout of
//! its `SceneUniforms` struct is mirrored by [`super::ShaderUniforms`].

use cgmath::{perspective, Deg, Matrix4, Point3, SquareMatrix, Vector3};

const TEMPLATE: &str = include_str!("scene.wgsl");
const TEXTURE_BINDINGS: &str = "//{{TEXTURE_BINDINGS}}";
const TEXTURE_CASES: &str = "//{{TEXTURE_CASES}}";
const SAMPLER_BINDING: &str = "{{SAMPLER_BINDING}}";

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Scene shader for `texture_units` units
///
/// Texture `i` is bound at `@group(1) @binding(i)` and the sampler at
/// `@binding(texture_units)`. An `objectTexture` outside `0..texture_units`
/// samples plain white.
pub fn scene_shader_source(texture_units: usize) -> String {
    let bindings: String = (0..texture_units)
        .map(|unit| {
            format!(
                "@group(1) @binding({unit}) var texture_{unit}: texture_2d<f32>;\n"
            )
        })
        .collect();
    let cases: String = (0..texture_units)
        .map(|unit| {
            format!(
                "        case {unit}: {{ color = textureSample(texture_{unit}, scene_sampler, uv); }}\n"
            )
        })
        .collect();

    TEMPLATE
        .replace(TEXTURE_BINDINGS, &bindings)
        .replace(TEXTURE_CASES, &cases)
        .replace(SAMPLER_BINDING, &texture_units.to_string())
}

pub fn create_scene_shader(device: &wgpu::Device, texture_units: usize) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Scene Shader"),
        source: wgpu::ShaderSource::Wgsl(scene_shader_source(texture_units).into()),
    })
}

/// `Camera` block at `@group(2) @binding(0)`
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct CameraUniforms {
    /// Eye position; w is padding for 16 byte alignment
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniforms {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }
}

impl CameraUniforms {
    /// Right-handed perspective camera at `eye` looking at `target`
    pub fn look_at(eye: Point3<f32>, target: Point3<f32>, fovy: Deg<f32>, aspect: f32) -> Self {
        let view = Matrix4::look_at_rh(eye, target, Vector3::unit_y());
        let proj = OPENGL_TO_WGPU_MATRIX * perspective(fovy, aspect, 0.1, 100.0);
        Self {
            view_position: [eye.x, eye.y, eye.z, 1.0],
            view_proj: (proj * view).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::shader::ShaderUniforms;

    #[test]
    fn test_every_unit_is_bound_and_sampled() {
        let source = scene_shader_source(3);
        for unit in 0..3 {
            assert!(source.contains(&format!(
                "@group(1) @binding({unit}) var texture_{unit}: texture_2d<f32>;"
            )));
            assert!(source.contains(&format!("case {unit}: {{ color = textureSample(texture_{unit},")));
        }
        assert!(!source.contains("texture_3"));
        assert!(source.contains("@group(1) @binding(3) var scene_sampler: sampler;"));
    }

    #[test]
    fn test_no_placeholders_left() {
        let source = scene_shader_source(16);
        assert!(!source.contains("{{"));
        assert!(source.contains("case 15:"));
        assert!(source.contains("@binding(16) var scene_sampler"));
    }

    #[test]
    fn test_block_members_in_rust_order() {
        // Field order of ShaderUniforms; a reorder on either side shows up here
        let members = [
            "model: mat4x4<f32>",
            "object_color: vec4<f32>",
            "uv_scale: vec2<f32>",
            "use_texture: u32",
            "use_lighting: u32",
            "object_texture: i32",
            "ambient_light: vec3<f32>",
            "material: Material",
            "directional_light: DirectionalLight",
            "spot_light: SpotLight",
            "point_lights: array<PointLight, MAX_POINT_LIGHTS>",
        ];
        let start = TEMPLATE.find("struct SceneUniforms").unwrap();
        let mut at = start;
        for member in members {
            let found = TEMPLATE[at..].find(member).unwrap_or_else(|| panic!("{} missing", member));
            at += found;
        }
        assert_eq!(std::mem::size_of::<ShaderUniforms>(), 576);
        assert!(TEMPLATE.contains(&format!(
            "const MAX_POINT_LIGHTS: u32 = {}u;",
            crate::gfx::lighting::MAX_POINT_LIGHTS
        )));
    }

    #[test]
    fn test_camera_block_size() {
        assert_eq!(std::mem::size_of::<CameraUniforms>(), 80);
    }

    #[test]
    fn test_look_at_puts_target_in_front() {
        let camera = CameraUniforms::look_at(
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(0.0, 0.0, 0.0),
            Deg(45.0),
            1.0,
        );
        let view_proj: Matrix4<f32> = camera.view_proj.into();
        let clip = view_proj * cgmath::Vector4::new(0.0, 0.0, 0.0, 1.0);
        let depth = clip.z / clip.w;
        assert!(clip.w > 0.0);
        assert!((0.0..=1.0).contains(&depth), "depth {}", depth);
        assert_eq!(camera.view_position, [0.0, 0.0, 5.0, 1.0]);
    }
}
