//! # Scene Lighting
//!
//! Fixed Phong-style light set: one directional light, one spot light and
//! up to [`MAX_POINT_LIGHTS`] point lights. These bounds are the capacity of
//! the shader's lighting model, so every slot is always written; inactive
//! lights go out with `bActive = false` and the shader sees a deterministic
//! "off" state instead of whatever the previous program left behind.

use cgmath::{Deg, Vector3};

use crate::error::{Result, SceneError};
use crate::gfx::shader::{names, UniformSink};

/// Number of entries in the shader's `pointLights` array
pub const MAX_POINT_LIGHTS: usize = 4;

/// Distance attenuation `1 / (constant + linear * d + quadratic * d^2)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    pub fn new(constant: f32, linear: f32, quadratic: f32) -> Self {
        Self {
            constant,
            linear,
            quadratic,
        }
    }
}

impl Default for Attenuation {
    fn default() -> Self {
        Self::new(1.0, 0.09, 0.032)
    }
}

/// Ambient, diffuse and specular light colours
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightColors {
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
}

impl LightColors {
    pub fn new(ambient: [f32; 3], diffuse: [f32; 3], specular: [f32; 3]) -> Self {
        Self {
            ambient: ambient.into(),
            diffuse: diffuse.into(),
            specular: specular.into(),
        }
    }

    fn apply(&self, sink: &mut impl UniformSink, field: impl Fn(&str) -> String) {
        sink.set_vec3(&field("ambient"), self.ambient);
        sink.set_vec3(&field("diffuse"), self.diffuse);
        sink.set_vec3(&field("specular"), self.specular);
    }
}

impl Default for LightColors {
    fn default() -> Self {
        Self::new([0.0; 3], [0.0; 3], [0.0; 3])
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vector3<f32>,
    pub colors: LightColors,
    pub active: bool,
}

impl DirectionalLight {
    /// Creates an active directional light
    pub fn new(direction: [f32; 3], colors: LightColors) -> Self {
        Self {
            direction: direction.into(),
            colors,
            active: true,
        }
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vector3::new(0.0, -1.0, 0.0),
            colors: LightColors::default(),
            active: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vector3<f32>,
    pub colors: LightColors,
    pub attenuation: Attenuation,
    pub active: bool,
}

impl PointLight {
    /// Creates an active point light
    pub fn new(position: [f32; 3], colors: LightColors, attenuation: Attenuation) -> Self {
        Self {
            position: position.into(),
            colors,
            attenuation,
            active: true,
        }
    }
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            colors: LightColors::default(),
            attenuation: Attenuation::default(),
            active: false,
        }
    }
}

/// Cone light; cutoffs are stored as cosines, the form the shader compares against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub position: Vector3<f32>,
    pub direction: Vector3<f32>,
    pub colors: LightColors,
    pub attenuation: Attenuation,
    pub cut_off: f32,
    pub outer_cut_off: f32,
    pub active: bool,
}

impl SpotLight {
    /// Creates an active spot light with a 12.5°/17.5° cone
    pub fn new(position: [f32; 3], direction: [f32; 3], colors: LightColors) -> Self {
        Self {
            position: position.into(),
            direction: direction.into(),
            colors,
            attenuation: Attenuation::default(),
            active: true,
            ..Self::default()
        }
    }

    /// Builder pattern: Set inner and outer cone angles in degrees
    pub fn with_cutoff_degrees(mut self, inner: f32, outer: f32) -> Self {
        self.cut_off = cgmath::Angle::cos(Deg(inner));
        self.outer_cut_off = cgmath::Angle::cos(Deg(outer));
        self
    }

    /// Builder pattern: Set distance attenuation
    pub fn with_attenuation(mut self, attenuation: Attenuation) -> Self {
        self.attenuation = attenuation;
        self
    }
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            direction: Vector3::new(0.0, -1.0, 0.0),
            colors: LightColors::default(),
            attenuation: Attenuation::default(),
            cut_off: cgmath::Angle::cos(Deg(12.5f32)),
            outer_cut_off: cgmath::Angle::cos(Deg(17.5f32)),
            active: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightSource {
    Directional(DirectionalLight),
    Spot(SpotLight),
    Point(PointLight),
}

/// The complete light set written to the shader at scene preparation
#[derive(Debug, Clone, PartialEq)]
pub struct LightRig {
    pub enabled: bool,
    pub ambient: Vector3<f32>,
    pub directional: DirectionalLight,
    pub spot: SpotLight,
    pub points: [PointLight; MAX_POINT_LIGHTS],
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            enabled: true,
            ambient: Vector3::new(0.2, 0.2, 0.2),
            directional: DirectionalLight::default(),
            spot: SpotLight::default(),
            points: [PointLight::default(); MAX_POINT_LIGHTS],
        }
    }
}

impl LightRig {
    /// Creates a rig with every light switched off
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: Set the global ambient term
    pub fn with_ambient(mut self, r: f32, g: f32, b: f32) -> Self {
        self.ambient = Vector3::new(r, g, b);
        self
    }

    /// Places a light in its slot
    ///
    /// Directional and spot lights take their single slot if it is not
    /// already holding an active light; point lights take the first
    /// inactive entry of the array.
    pub fn add(&mut self, light: LightSource) -> Result<()> {
        match light {
            LightSource::Directional(directional) => {
                if self.directional.active {
                    return Err(Self::full("directional", 1));
                }
                self.directional = directional;
            }
            LightSource::Spot(spot) => {
                if self.spot.active {
                    return Err(Self::full("spot", 1));
                }
                self.spot = spot;
            }
            LightSource::Point(point) => {
                let slot = self
                    .points
                    .iter_mut()
                    .find(|p| !p.active)
                    .ok_or_else(|| Self::full("point", MAX_POINT_LIGHTS))?;
                *slot = point;
            }
        }
        Ok(())
    }

    fn full(kind: &'static str, capacity: usize) -> SceneError {
        log::error!("Light rig has no free {} slot (capacity {})", kind, capacity);
        SceneError::LightCapacityExceeded { kind, capacity }
    }

    /// Number of lights with their active flag set
    pub fn active_count(&self) -> usize {
        self.directional.active as usize
            + self.spot.active as usize
            + self.points.iter().filter(|p| p.active).count()
    }

    /// Writes every light's full parameter set, active or not
    pub fn apply(&self, sink: &mut impl UniformSink) {
        sink.set_bool(names::USE_LIGHTING, self.enabled);
        sink.set_vec3(names::AMBIENT_LIGHT, self.ambient);

        let dir = |field: &str| names::field(names::DIRECTIONAL_LIGHT, field);
        sink.set_vec3(&dir("direction"), self.directional.direction);
        self.directional.colors.apply(sink, dir);
        sink.set_bool(&dir("bActive"), self.directional.active);

        let spot = |field: &str| names::field(names::SPOT_LIGHT, field);
        sink.set_vec3(&spot("position"), self.spot.position);
        sink.set_vec3(&spot("direction"), self.spot.direction);
        self.spot.colors.apply(sink, spot);
        sink.set_float(&spot("cutOff"), self.spot.cut_off);
        sink.set_float(&spot("outerCutOff"), self.spot.outer_cut_off);
        sink.set_float(&spot("constant"), self.spot.attenuation.constant);
        sink.set_float(&spot("linear"), self.spot.attenuation.linear);
        sink.set_float(&spot("quadratic"), self.spot.attenuation.quadratic);
        sink.set_bool(&spot("bActive"), self.spot.active);

        for (index, point) in self.points.iter().enumerate() {
            let field = |field: &str| names::indexed_field(names::POINT_LIGHTS, index, field);
            sink.set_vec3(&field("position"), point.position);
            point.colors.apply(sink, field);
            sink.set_float(&field("constant"), point.attenuation.constant);
            sink.set_float(&field("linear"), point.attenuation.linear);
            sink.set_float(&field("quadratic"), point.attenuation.quadratic);
            sink.set_bool(&field("bActive"), point.active);
        }

        log::debug!("Wrote light rig ({} active lights)", self.active_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::shader::{RecordingSink, ShaderState, UniformValue};

    fn white_point(x: f32) -> LightSource {
        LightSource::Point(PointLight::new(
            [x, 8.0, 6.0],
            LightColors::new([0.05; 3], [0.8; 3], [1.0; 3]),
            Attenuation::new(1.0, 0.14, 0.07),
        ))
    }

    #[test]
    fn test_point_light_capacity() {
        let mut rig = LightRig::new();
        for i in 0..MAX_POINT_LIGHTS {
            rig.add(white_point(i as f32)).unwrap();
        }

        let err = rig.add(white_point(99.0)).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(rig.active_count(), MAX_POINT_LIGHTS);
    }

    #[test]
    fn test_second_directional_rejected() {
        let mut rig = LightRig::new();
        let sun = DirectionalLight::new([-0.3, -1.0, -0.5], LightColors::default());
        rig.add(LightSource::Directional(sun)).unwrap();
        assert!(rig.add(LightSource::Directional(sun)).is_err());
    }

    #[test]
    fn test_cutoffs_stored_as_cosines() {
        let spot = SpotLight::new([0.0; 3], [0.0, -1.0, 0.0], LightColors::default())
            .with_cutoff_degrees(60.0, 90.0);
        assert!((spot.cut_off - 0.5).abs() < 1e-6);
        assert!(spot.outer_cut_off.abs() < 1e-6);
    }

    #[test]
    fn test_snapshot_has_every_block() {
        let mut rig = LightRig::new();
        rig.add(LightSource::Directional(DirectionalLight::new(
            [-0.3, -1.0, -0.5],
            LightColors::new([0.2; 3], [0.8; 3], [1.0; 3]),
        )))
        .unwrap();
        for i in 0..MAX_POINT_LIGHTS {
            rig.add(white_point(i as f32)).unwrap();
        }

        let mut sink = RecordingSink::new();
        rig.apply(&mut sink);

        let point_blocks: Vec<_> = (0..8)
            .filter(|i| !sink.distinct_with_prefix(&format!("pointLights[{}].", i)).is_empty())
            .collect();
        assert_eq!(point_blocks, vec![0, 1, 2, 3]);
        for i in 0..MAX_POINT_LIGHTS {
            let block = sink.distinct_with_prefix(&format!("pointLights[{}].", i));
            assert_eq!(block.len(), 8);
            assert_eq!(
                sink.last(&format!("pointLights[{}].bActive", i)),
                Some(&UniformValue::Bool(true))
            );
        }

        assert_eq!(sink.distinct_with_prefix("directionalLight.").len(), 5);

        // Spot light is off but still fully present
        assert_eq!(sink.distinct_with_prefix("spotLight.").len(), 11);
        assert_eq!(
            sink.last("spotLight.bActive"),
            Some(&UniformValue::Bool(false))
        );
    }

    #[test]
    fn test_every_name_is_known_to_shader_state() {
        let mut rig = LightRig::new();
        rig.add(white_point(3.0)).unwrap();

        let mut state = ShaderState::new();
        rig.apply(&mut state);

        let u = state.uniforms();
        assert_eq!(u.use_lighting, 1);
        assert_eq!(u.ambient_light, [0.2, 0.2, 0.2]);
        assert_eq!(u.point_lights[0].position, [3.0, 8.0, 6.0]);
        assert_eq!(u.point_lights[0].linear, 0.14);
        assert_eq!(u.point_lights[0].active, 1);
        assert_eq!(u.point_lights[1].active, 0);
        assert_eq!(u.spot_light.active, 0);
        assert_eq!(u.spot_light.cut_off, rig.spot.cut_off);
    }
}
