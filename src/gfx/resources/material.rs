//! Material system for Phong shading
//!
//! Provides material definitions and a tag-ordered registry. Materials are
//! populated once during scene preparation and read-only afterwards.
//! Objects reference them by tag; when several materials share a tag the
//! first one registered wins.

use cgmath::Vector3;

use crate::gfx::shader::{names, UniformSink};

/// Material tag used to look materials up
pub type MaterialTag = String;

/// Phong material: diffuse and specular reflectance plus a shininess exponent
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub tag: MaterialTag,
    pub diffuse_color: Vector3<f32>,
    pub specular_color: Vector3<f32>,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            tag: "default".to_string(),
            diffuse_color: Vector3::new(0.8, 0.8, 0.8),
            specular_color: Vector3::new(0.1, 0.1, 0.1),
            shininess: 1.0,
        }
    }
}

impl Material {
    /// Creates a new material
    ///
    /// # Arguments
    /// * `tag` - Name objects use to reference this material
    /// * `diffuse` - RGB diffuse reflectance
    /// * `specular` - RGB specular reflectance
    /// * `shininess` - Specular exponent, clamped to be non-negative
    pub fn new(tag: &str, diffuse: [f32; 3], specular: [f32; 3], shininess: f32) -> Self {
        Self {
            tag: tag.to_string(),
            diffuse_color: diffuse.into(),
            specular_color: specular.into(),
            shininess: shininess.max(0.0),
        }
    }

    /// Builder pattern: Set diffuse colour
    pub fn with_diffuse(mut self, r: f32, g: f32, b: f32) -> Self {
        self.diffuse_color = Vector3::new(r, g, b);
        self
    }

    /// Builder pattern: Set specular colour
    pub fn with_specular(mut self, r: f32, g: f32, b: f32) -> Self {
        self.specular_color = Vector3::new(r, g, b);
        self
    }

    /// Builder pattern: Set shininess
    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess.max(0.0);
        self
    }

    /// Writes the material uniforms
    pub fn apply(&self, sink: &mut impl UniformSink) {
        sink.set_vec3(names::MATERIAL_DIFFUSE, self.diffuse_color);
        sink.set_vec3(names::MATERIAL_SPECULAR, self.specular_color);
        sink.set_float(names::MATERIAL_SHININESS, self.shininess);
    }
}

/// Built-in material set
pub fn default_materials() -> Vec<Material> {
    vec![
        Material::new("wood", [0.3, 0.2, 0.1], [0.1, 0.1, 0.1], 0.3),
        Material::new("glass", [0.3, 0.3, 0.3], [0.6, 0.6, 0.6], 85.0),
        Material::new("plastic", [0.3, 0.3, 0.4], [0.05, 0.05, 0.05], 0.02),
        Material::new("gold", [0.3, 0.3, 0.2], [0.6, 0.5, 0.4], 22.0),
        Material::new("cement", [0.5, 0.5, 0.5], [0.4, 0.4, 0.4], 0.5),
        Material::new("tile", [0.3, 0.2, 0.1], [0.4, 0.5, 0.6], 25.0),
        Material::new("clay", [0.4, 0.4, 0.5], [0.1, 0.1, 0.1], 0.1),
        Material::new("plank", [0.6, 0.3, 0.1], [0.2, 0.1, 0.05], 25.0),
    ]
}

/// Ordered material storage
///
/// Lookup is a linear scan in registration order, so duplicate tags are
/// tolerated and the earliest registration shadows later ones.
#[derive(Debug, Default)]
pub struct MaterialRegistry {
    materials: Vec<Material>,
    defaults_registered: bool,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the built-in materials
    ///
    /// Only the first call has any effect.
    pub fn register_defaults(&mut self) {
        if self.defaults_registered {
            log::warn!("Default materials are already registered");
            return;
        }
        for material in default_materials() {
            self.add(material);
        }
        self.defaults_registered = true;
    }

    /// Adds a material to the registry
    pub fn add(&mut self, material: Material) {
        if self.get(&material.tag).is_some() {
            log::warn!(
                "Material '{}' is already registered; lookups keep returning the first one",
                material.tag
            );
        }
        self.materials.push(material);
    }

    /// First material registered under `tag`
    pub fn get(&self, tag: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.tag == tag)
    }

    /// Writes the material registered under `tag`
    ///
    /// On a miss nothing is written and the shader keeps its previous
    /// material; returns whether the tag resolved.
    pub fn apply(&self, tag: &str, sink: &mut impl UniformSink) -> bool {
        match self.get(tag) {
            Some(material) => {
                material.apply(sink);
                true
            }
            None => {
                log::warn!("Material '{}' not found; keeping previous material", tag);
                false
            }
        }
    }

    /// Registered tags in registration order, duplicates included
    pub fn tags(&self) -> Vec<&str> {
        self.materials.iter().map(|m| m.tag.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::shader::{RecordingSink, UniformValue};

    #[test]
    fn test_defaults() {
        let mut registry = MaterialRegistry::new();
        registry.register_defaults();

        for tag in ["wood", "glass", "plastic", "gold", "cement", "tile", "clay"] {
            assert!(registry.get(tag).is_some(), "missing {}", tag);
        }
        assert_eq!(registry.get("gold").unwrap().shininess, 22.0);
    }

    #[test]
    fn test_defaults_registered_once() {
        let mut registry = MaterialRegistry::new();
        registry.register_defaults();
        let count = registry.len();
        registry.register_defaults();
        assert_eq!(registry.len(), count);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let mut registry = MaterialRegistry::new();
        registry.register_defaults();
        assert!(registry.get("Wood").is_none());
        assert!(registry.get("").is_none());
    }

    #[test]
    fn test_first_registered_wins() {
        let mut registry = MaterialRegistry::new();
        registry.add(Material::new("metal", [1.0, 0.0, 0.0], [0.5; 3], 10.0));
        registry.add(Material::new("metal", [0.0, 1.0, 0.0], [0.1; 3], 99.0));

        let metal = registry.get("metal").unwrap();
        assert_eq!(metal.diffuse_color, Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(metal.shininess, 10.0);
        assert_eq!(registry.tags(), vec!["metal", "metal"]);
    }

    #[test]
    fn test_negative_shininess_clamped() {
        let material = Material::new("odd", [0.0; 3], [0.0; 3], -4.0);
        assert_eq!(material.shininess, 0.0);
    }

    #[test]
    fn test_apply_writes_material_uniforms() {
        let mut registry = MaterialRegistry::new();
        registry.register_defaults();

        let mut sink = RecordingSink::new();
        assert!(registry.apply("glass", &mut sink));
        assert_eq!(
            sink.names(),
            vec![
                "material.diffuseColor",
                "material.specularColor",
                "material.shininess"
            ]
        );
        assert_eq!(
            sink.last("material.shininess"),
            Some(&UniformValue::Float(85.0))
        );
    }

    #[test]
    fn test_apply_miss_writes_nothing() {
        let registry = MaterialRegistry::new();
        let mut sink = RecordingSink::new();
        assert!(!registry.apply("velvet", &mut sink));
        assert!(sink.is_empty());
    }
}
