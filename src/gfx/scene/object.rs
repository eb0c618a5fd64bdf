use cgmath::{Vector2, Vector4};

use super::mesh_library::MeshDraw;
use crate::gfx::transform::Transform;

/// How an object's fragments get their base colour
#[derive(Debug, Clone, PartialEq)]
pub enum Surface {
    /// Sample the texture registered under this tag
    Texture(String),
    /// Flat RGBA colour, texture sampling off
    Color(Vector4<f32>),
}

/// One entry of the static draw list
///
/// Objects are plain values; the scene assembler reads one at a time and
/// never mutates them.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub mesh: MeshDraw,
    pub transform: Transform,
    pub surface: Surface,
    pub uv_scale: Vector2<f32>,
    pub material: Option<String>,
}

impl SceneObject {
    /// White, untextured object with identity transform and no material
    pub fn new(name: &str, mesh: MeshDraw) -> Self {
        Self {
            name: name.to_string(),
            mesh,
            transform: Transform::default(),
            surface: Surface::Color(Vector4::new(1.0, 1.0, 1.0, 1.0)),
            uv_scale: Vector2::new(1.0, 1.0),
            material: None,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_texture(mut self, tag: &str) -> Self {
        self.surface = Surface::Texture(tag.to_string());
        self
    }

    pub fn with_color(mut self, r: f32, g: f32, b: f32, a: f32) -> Self {
        self.surface = Surface::Color(Vector4::new(r, g, b, a));
        self
    }

    pub fn with_uv_scale(mut self, u: f32, v: f32) -> Self {
        self.uv_scale = Vector2::new(u, v);
        self
    }

    pub fn with_material(mut self, tag: &str) -> Self {
        self.material = Some(tag.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let object = SceneObject::new("crate", MeshDraw::Box);
        assert_eq!(object.uv_scale, Vector2::new(1.0, 1.0));
        assert!(object.material.is_none());
        assert!(matches!(object.surface, Surface::Color(_)));
    }

    #[test]
    fn test_builder() {
        let object = SceneObject::new("crate", MeshDraw::Box)
            .with_texture("plank")
            .with_uv_scale(2.0, 0.5)
            .with_material("wood");
        assert_eq!(object.surface, Surface::Texture("plank".to_string()));
        assert_eq!(object.uv_scale, Vector2::new(2.0, 0.5));
        assert_eq!(object.material.as_deref(), Some("wood"));
    }
}
