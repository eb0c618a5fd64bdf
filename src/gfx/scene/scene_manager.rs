//! # Scene Assembler
//!
//! [`SceneManager`] owns the texture and material registries and drives the
//! two phases of a session:
//!
//! 1. **Preparation** (once): register and bind textures, register the
//!    default materials, write the light rig, load every mesh kind in use.
//! 2. **Frames** (repeated): for every object in list order push the model
//!    matrix, the texture or colour selection, the UV scale and the
//!    material, commit that state to the sink, then ask the mesh library to
//!    draw it. Commit `i` and draw request `i` belong together.
//!
//! Unresolved texture or material tags never abort a frame. The draw goes
//! ahead with whatever the shader last received and the miss is logged and
//! counted in [`FrameStats`].

use std::ops::AddAssign;
use std::path::PathBuf;

use cgmath::{Vector2, Vector4};

use super::mesh_library::{MeshKind, MeshLibrary};
use super::object::{SceneObject, Surface};
use crate::config::SceneConfig;
use crate::error::{Result, SceneError};
use crate::gfx::lighting::LightRig;
use crate::gfx::resources::material::MaterialRegistry;
use crate::gfx::resources::texture_registry::{TextureDevice, TextureRegistry};
use crate::gfx::shader::{names, UniformSink};

/// Image file to register, relative to [`SceneConfig::texture_dir`]
#[derive(Debug, Clone, PartialEq)]
pub struct TextureAsset {
    pub path: PathBuf,
    pub tag: String,
}

/// Static scene content: textures, lights and the ordered draw list
#[derive(Debug, Clone, Default)]
pub struct SceneDescription {
    pub textures: Vec<TextureAsset>,
    pub lights: LightRig,
    pub objects: Vec<SceneObject>,
}

impl SceneDescription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_texture(&mut self, path: impl Into<PathBuf>, tag: &str) {
        self.textures.push(TextureAsset {
            path: path.into(),
            tag: tag.to_string(),
        });
    }

    pub fn add_object(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    /// Distinct mesh kinds in order of first use
    pub fn mesh_kinds(&self) -> Vec<MeshKind> {
        let mut kinds = Vec::new();
        for object in &self.objects {
            let kind = object.mesh.kind();
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        kinds
    }
}

/// Outcome of [`SceneManager::prepare`]
#[derive(Debug, Default)]
pub struct PrepareReport {
    /// Tags that made it into the registry, in slot order
    pub textures_loaded: Vec<String>,
    /// Assets that were skipped and why
    pub textures_failed: Vec<(String, SceneError)>,
    pub materials: usize,
    pub active_lights: usize,
    pub meshes_loaded: Vec<MeshKind>,
}

/// Counters for one rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub draws: usize,
    pub texture_misses: usize,
    pub material_misses: usize,
}

impl AddAssign for FrameStats {
    fn add_assign(&mut self, other: Self) {
        self.draws += other.draws;
        self.texture_misses += other.texture_misses;
        self.material_misses += other.material_misses;
    }
}

/// Orchestrates scene preparation and per-frame draw submission
///
/// Generic over its three collaborators so the whole pipeline runs against
/// [`crate::gfx::shader::RecordingSink`],
/// [`crate::gfx::resources::MemoryTextureDevice`] and
/// [`crate::gfx::scene::PrimitiveMeshes`] in tests and against wgpu-backed
/// ones in the renderer.
pub struct SceneManager<D: TextureDevice, S: UniformSink, M: MeshLibrary> {
    config: SceneConfig,
    textures: TextureRegistry<D>,
    materials: MaterialRegistry,
    sink: S,
    meshes: M,
    lighting: bool,
    prepared: bool,
}

impl<D: TextureDevice, S: UniformSink, M: MeshLibrary> SceneManager<D, S, M> {
    pub fn new(config: SceneConfig, device: D, sink: S, meshes: M) -> Self {
        let textures = TextureRegistry::new(device, config.texture_units, config.flip_vertically);
        Self {
            lighting: config.lighting,
            config,
            textures,
            materials: MaterialRegistry::new(),
            sink,
            meshes,
            prepared: false,
        }
    }

    /// Runs the one-time setup for `scene`
    ///
    /// Images that fail to load are logged, reported and skipped. Running
    /// out of texture units aborts preparation with
    /// [`SceneError::TextureCapacityExceeded`]. Preparing again starts a
    /// new session: previously registered textures are released first.
    pub fn prepare(&mut self, scene: &SceneDescription) -> Result<PrepareReport> {
        if self.prepared || !self.textures.is_empty() {
            log::warn!("Scene already prepared; releasing previous textures");
            self.textures.release();
            self.prepared = false;
        }

        let mut report = PrepareReport::default();

        for asset in &scene.textures {
            let path = self.config.texture_dir.join(&asset.path);
            match self.textures.register(&path, &asset.tag) {
                Ok(_) => report.textures_loaded.push(asset.tag.clone()),
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    log::warn!("Skipping texture '{}': {}", asset.tag, err);
                    report.textures_failed.push((asset.tag.clone(), err));
                }
            }
        }
        self.textures.bind_all();

        self.materials.register_defaults();
        report.materials = self.materials.len();

        let mut lights = scene.lights.clone();
        lights.enabled = lights.enabled && self.config.lighting;
        self.lighting = lights.enabled;
        lights.apply(&mut self.sink);
        report.active_lights = lights.active_count();

        for kind in scene.mesh_kinds() {
            self.meshes.load(kind);
            report.meshes_loaded.push(kind);
        }

        self.prepared = true;
        log::info!(
            "Prepared scene: {} textures ({} skipped), {} materials, {} active lights, {} mesh kinds",
            report.textures_loaded.len(),
            report.textures_failed.len(),
            report.materials,
            report.active_lights,
            report.meshes_loaded.len()
        );

        Ok(report)
    }

    /// Pushes per-object state and draws every object in list order
    pub fn render(&mut self, scene: &SceneDescription) -> FrameStats {
        let mut stats = FrameStats::default();
        if !self.prepared {
            log::warn!("render called before prepare; nothing drawn");
            return stats;
        }

        self.sink.set_bool(names::USE_LIGHTING, self.lighting);
        for object in &scene.objects {
            stats += self.draw_object(object);
        }

        log::trace!("Frame: {:?}", stats);
        stats
    }

    /// Pushes one object's uniforms and issues its draw
    pub fn draw_object(&mut self, object: &SceneObject) -> FrameStats {
        let mut stats = FrameStats {
            draws: 1,
            ..Default::default()
        };

        object.transform.apply(&mut self.sink);

        match &object.surface {
            Surface::Texture(tag) => {
                if !self.set_shader_texture(tag) {
                    stats.texture_misses += 1;
                }
            }
            Surface::Color(color) => self.set_shader_color(*color),
        }

        self.set_uv_scale(object.uv_scale);

        if let Some(tag) = &object.material {
            if !self.set_shader_material(tag) {
                stats.material_misses += 1;
            }
        }

        log::debug!("Drawing '{}' as {:?}", object.name, object.mesh);
        self.sink.commit();
        self.meshes.draw(&object.mesh);
        stats
    }

    /// Selects the texture registered under `tag`
    ///
    /// On a miss nothing is written, so the previous selection stays active.
    pub fn set_shader_texture(&mut self, tag: &str) -> bool {
        match self.textures.slot_of(tag) {
            Some(slot) => {
                self.sink.set_bool(names::USE_TEXTURE, true);
                self.sink.set_sampler(names::OBJECT_TEXTURE, slot);
                true
            }
            None => {
                log::warn!("Texture '{}' not found; keeping previous texture state", tag);
                false
            }
        }
    }

    /// Switches texture sampling off and draws with a flat colour
    pub fn set_shader_color(&mut self, color: Vector4<f32>) {
        self.sink.set_bool(names::USE_TEXTURE, false);
        self.sink.set_vec4(names::OBJECT_COLOR, color);
    }

    pub fn set_uv_scale(&mut self, scale: Vector2<f32>) {
        self.sink.set_vec2(names::UV_SCALE, scale);
    }

    pub fn set_shader_material(&mut self, tag: &str) -> bool {
        self.materials.apply(tag, &mut self.sink)
    }

    /// Releases every texture; a later [`Self::prepare`] starts over
    pub fn shutdown(&mut self) {
        if !self.textures.is_empty() {
            log::info!("Releasing {} textures", self.textures.len());
        }
        self.textures.release();
        self.prepared = false;
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    /// Value written to `bUseLighting`: the rig's switch and the config's
    pub fn lighting_enabled(&self) -> bool {
        self.lighting
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn textures(&self) -> &TextureRegistry<D> {
        &self.textures
    }

    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn meshes(&self) -> &M {
        &self.meshes
    }

    pub fn meshes_mut(&mut self) -> &mut M {
        &mut self.meshes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::lighting::{DirectionalLight, LightColors, LightSource, PointLight};
    use crate::gfx::resources::texture_registry::test_images::TestDir;
    use crate::gfx::resources::texture_registry::MemoryTextureDevice;
    use crate::gfx::scene::mesh_library::{BoxSide, CylinderParts, MeshDraw, PrimitiveMeshes};
    use crate::gfx::shader::{RecordingSink, ShaderState, UniformValue};
    use crate::gfx::transform::Transform;

    type TestManager = SceneManager<MemoryTextureDevice, RecordingSink, PrimitiveMeshes>;

    fn manager(dir: &TestDir) -> TestManager {
        SceneManager::new(
            SceneConfig::default().with_texture_dir(&dir.path),
            MemoryTextureDevice::new(),
            RecordingSink::new(),
            PrimitiveMeshes::new(),
        )
    }

    fn two_object_scene(dir: &TestDir) -> SceneDescription {
        dir.rgb("wood.png", [120, 80, 40]);
        let mut scene = SceneDescription::new();
        scene.add_texture("wood.png", "wood");
        scene.add_object(
            SceneObject::new("table", MeshDraw::Box)
                .with_transform(Transform::default().with_scale(30.0, 1.0, 15.0))
                .with_texture("wood")
                .with_material("wood"),
        );
        scene.add_object(
            SceneObject::new("can", MeshDraw::Cylinder(CylinderParts::SIDES))
                .with_color(1.0, 0.0, 0.0, 1.0)
                .with_uv_scale(0.5, 0.5),
        );
        scene
    }

    #[test]
    fn test_prepare_loads_everything() {
        let dir = TestDir::new("prepare");
        let scene = two_object_scene(&dir);
        let mut manager = manager(&dir);

        let report = manager.prepare(&scene).unwrap();
        assert_eq!(report.textures_loaded, vec!["wood".to_string()]);
        assert!(report.textures_failed.is_empty());
        assert!(report.materials >= 7);
        assert_eq!(report.meshes_loaded, vec![MeshKind::Box, MeshKind::Cylinder]);
        assert!(manager.is_prepared());
        assert!(manager.textures().device().bound(0).is_some());
    }

    #[test]
    fn test_per_object_write_order() {
        let dir = TestDir::new("order");
        let scene = two_object_scene(&dir);
        let mut manager = manager(&dir);
        manager.prepare(&scene).unwrap();
        manager.sink_mut().clear();

        let stats = manager.render(&scene);
        assert_eq!(
            stats,
            FrameStats {
                draws: 2,
                texture_misses: 0,
                material_misses: 0
            }
        );
        assert_eq!(
            manager.sink().names(),
            vec![
                "bUseLighting",
                "model",
                "bUseTexture",
                "objectTexture",
                "UVscale",
                "material.diffuseColor",
                "material.specularColor",
                "material.shininess",
                "model",
                "bUseTexture",
                "objectColor",
                "UVscale",
            ]
        );
        assert_eq!(
            manager.sink().last("objectTexture"),
            Some(&UniformValue::Sampler(0))
        );
        assert_eq!(
            manager.sink().last("bUseTexture"),
            Some(&UniformValue::Bool(false))
        );

        let calls = manager.meshes_mut().take_draw_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].kind, MeshKind::Box);
        assert_eq!(calls[1].kind, MeshKind::Cylinder);
    }

    #[test]
    fn test_each_draw_sees_its_own_uniforms() {
        let dir = TestDir::new("per-draw");
        let scene = two_object_scene(&dir);
        let mut manager = SceneManager::new(
            SceneConfig::default().with_texture_dir(&dir.path),
            MemoryTextureDevice::new(),
            ShaderState::new(),
            PrimitiveMeshes::new(),
        );
        manager.prepare(&scene).unwrap();
        manager.render(&scene);

        let frame = manager.sink_mut().take_frame();
        let calls = manager.meshes_mut().take_draw_calls();
        assert_eq!(frame.len(), 2);
        assert_eq!(calls.iter().map(|c| c.draw).collect::<Vec<_>>(), vec![0, 1]);

        let table = &frame[calls[0].draw as usize];
        let table_model: [[f32; 4]; 4] = scene.objects[0].transform.matrix().into();
        assert_eq!(table.model, table_model);
        assert_eq!((table.use_texture, table.object_texture), (1, 0));
        assert_eq!(table.uv_scale, [1.0, 1.0]);

        let can = &frame[calls[1].draw as usize];
        assert_eq!(can.use_texture, 0);
        assert_eq!(can.object_color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(can.uv_scale, [0.5, 0.5]);
        assert_ne!(can.model, table.model);
        assert_eq!(can.use_lighting, 1);
    }

    #[test]
    fn test_one_commit_per_draw() {
        let dir = TestDir::new("commits");
        let scene = two_object_scene(&dir);
        let mut manager = manager(&dir);
        manager.prepare(&scene).unwrap();
        assert_eq!(manager.sink().commits(), 0);

        manager.sink_mut().clear();
        manager.render(&scene);
        // Commits follow each object's last write
        assert_eq!(manager.sink().writes_at_commits(), &[8, 12]);
    }

    #[test]
    fn test_missing_tags_keep_previous_state() {
        let dir = TestDir::new("stale");
        let mut scene = two_object_scene(&dir);
        scene.add_object(
            SceneObject::new("ghost", MeshDraw::BoxFace(BoxSide::Front))
                .with_texture("nowhere")
                .with_material("velvet"),
        );
        let mut manager = manager(&dir);
        manager.prepare(&scene).unwrap();
        manager.sink_mut().clear();

        let stats = manager.render(&scene);
        assert_eq!(stats.draws, 3);
        assert_eq!(stats.texture_misses, 1);
        assert_eq!(stats.material_misses, 1);

        // The ghost only wrote its transform and UV scale
        let names = manager.sink().names();
        assert_eq!(&names[names.len() - 2..], &["model", "UVscale"]);
        assert_eq!(
            manager.sink().last("bUseTexture"),
            Some(&UniformValue::Bool(false))
        );
        assert_eq!(manager.meshes().draw_calls().len(), 3);
    }

    #[test]
    fn test_failed_asset_is_skipped() {
        let dir = TestDir::new("skip");
        dir.gray("gray.png");
        let mut scene = two_object_scene(&dir);
        scene.add_texture("gray.png", "gray");
        scene.add_texture("absent.png", "absent");

        let mut manager = manager(&dir);
        let report = manager.prepare(&scene).unwrap();
        assert_eq!(report.textures_loaded, vec!["wood".to_string()]);
        let failed: Vec<_> = report.textures_failed.iter().map(|(tag, _)| tag.as_str()).collect();
        assert_eq!(failed, vec!["gray", "absent"]);
        assert!(matches!(
            report.textures_failed[0].1,
            SceneError::UnsupportedChannels { channels: 1, .. }
        ));
    }

    #[test]
    fn test_six_textures_get_distinct_slots() {
        let dir = TestDir::new("manager-six");
        let mut scene = SceneDescription::new();
        let tags = ["mugbase", "flag", "table", "plank", "plastic", "office"];
        for (i, tag) in tags.iter().enumerate() {
            let file = format!("{}.png", tag);
            dir.rgb(&file, [i as u8 * 40, 0, 0]);
            scene.add_texture(file, tag);
        }

        let mut manager = manager(&dir);
        manager.prepare(&scene).unwrap();

        let slots: Vec<_> = tags
            .iter()
            .map(|tag| manager.textures().slot_of(tag).unwrap())
            .collect();
        assert_eq!(slots, vec![0, 1, 2, 3, 4, 5]);
        for (slot, tag) in tags.iter().enumerate() {
            assert_eq!(
                manager.textures().device().bound(slot as u32),
                manager.textures().handle_of(tag)
            );
        }
    }

    #[test]
    fn test_capacity_overflow_aborts_prepare() {
        let dir = TestDir::new("manager-capacity");
        let mut scene = SceneDescription::new();
        for tag in ["a", "b", "c"] {
            let file = format!("{}.png", tag);
            dir.rgb(&file, [1, 2, 3]);
            scene.add_texture(file, tag);
        }

        let mut manager = SceneManager::new(
            SceneConfig::default()
                .with_texture_dir(&dir.path)
                .with_texture_units(2),
            MemoryTextureDevice::new(),
            RecordingSink::new(),
            PrimitiveMeshes::new(),
        );
        let err = manager.prepare(&scene).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(
            err,
            SceneError::TextureCapacityExceeded { capacity: 2, .. }
        ));
        assert!(!manager.is_prepared());
        assert_eq!(manager.render(&scene), FrameStats::default());
    }

    #[test]
    fn test_light_snapshot_has_every_block() {
        let dir = TestDir::new("lights");
        let mut scene = SceneDescription::new();
        let colors = LightColors::new([0.1; 3], [0.8; 3], [1.0; 3]);
        scene
            .lights
            .add(LightSource::Directional(DirectionalLight::new(
                [0.0, -1.0, 0.0],
                colors,
            )))
            .unwrap();
        for x in 0..4 {
            scene
                .lights
                .add(LightSource::Point(PointLight::new(
                    [x as f32, 8.0, 0.0],
                    colors,
                    Default::default(),
                )))
                .unwrap();
        }

        let mut manager = manager(&dir);
        let report = manager.prepare(&scene).unwrap();
        assert_eq!(report.active_lights, 5);

        let sink = manager.sink();
        assert_eq!(sink.distinct_with_prefix("pointLights[").len(), 4 * 8);
        assert_eq!(sink.distinct_with_prefix("directionalLight.").len(), 5);
        assert_eq!(sink.distinct_with_prefix("spotLight.").len(), 11);
        assert_eq!(
            sink.last("spotLight.bActive"),
            Some(&UniformValue::Bool(false))
        );
    }

    #[test]
    fn test_lighting_disabled_by_config() {
        let dir = TestDir::new("unlit");
        let scene = two_object_scene(&dir);
        let mut manager = SceneManager::new(
            SceneConfig::default()
                .with_texture_dir(&dir.path)
                .with_lighting(false),
            MemoryTextureDevice::new(),
            RecordingSink::new(),
            PrimitiveMeshes::new(),
        );
        manager.prepare(&scene).unwrap();
        assert!(!manager.lighting_enabled());
        manager.render(&scene);
        assert_eq!(
            manager.sink().last("bUseLighting"),
            Some(&UniformValue::Bool(false))
        );
    }

    #[test]
    fn test_lighting_flag_follows_rig_switch() {
        let dir = TestDir::new("rig-off");
        let mut scene = two_object_scene(&dir);
        scene.lights.enabled = false;
        let mut manager = manager(&dir);
        manager.prepare(&scene).unwrap();

        assert!(manager.config().lighting);
        assert!(!manager.lighting_enabled());
        manager.render(&scene);
        assert_eq!(
            manager.sink().last("bUseLighting"),
            Some(&UniformValue::Bool(false))
        );
    }

    #[test]
    fn test_render_before_prepare_draws_nothing() {
        let dir = TestDir::new("early");
        let scene = two_object_scene(&dir);
        let mut manager = manager(&dir);

        assert_eq!(manager.render(&scene), FrameStats::default());
        assert!(manager.sink().is_empty());
        assert!(manager.meshes().draw_calls().is_empty());
    }

    #[test]
    fn test_shutdown_releases_textures() {
        let dir = TestDir::new("shutdown");
        let scene = two_object_scene(&dir);
        let mut manager = manager(&dir);
        manager.prepare(&scene).unwrap();

        manager.shutdown();
        assert!(manager.textures().is_empty());
        assert_eq!(manager.textures().device().live_count(), 0);
        assert_eq!(manager.textures().device().released().len(), 1);
        assert!(!manager.is_prepared());
    }

    #[test]
    fn test_prepare_twice_starts_new_session() {
        let dir = TestDir::new("again");
        let scene = two_object_scene(&dir);
        let mut manager = manager(&dir);
        manager.prepare(&scene).unwrap();
        manager.prepare(&scene).unwrap();

        assert_eq!(manager.textures().len(), 1);
        assert_eq!(manager.textures().device().released().len(), 1);
    }
}
