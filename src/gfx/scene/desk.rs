//! The desk arrangement: a table top holding a mug, an office sign, a
//! trash can and a scrap-wood plank, under one directional light, one spot
//! light and four ceiling point lights.

use super::mesh_library::{BoxSide, CylinderParts, MeshDraw};
use super::object::SceneObject;
use super::scene_manager::SceneDescription;
use crate::gfx::lighting::{
    Attenuation, DirectionalLight, LightColors, LightRig, PointLight, SpotLight,
};
use crate::gfx::transform::Transform;

/// Texture files (relative to the texture directory) and their tags
pub const DESK_TEXTURES: [(&str, &str); 6] = [
    ("black.jpg", "mugbase"),
    ("teachflag.jpg", "flag"),
    ("Wood066_2K-JPG_Color.jpg", "table"),
    ("Wood048_1K-JPG_Color.jpg", "plank"),
    ("Plastic010_1K-JPG_Color.jpg", "plastic"),
    ("office.jpg", "office"),
];

const CEILING_LIGHTS: [[f32; 3]; 4] = [
    [-11.0, 8.0, 6.0],
    [-6.0, 8.0, 6.5],
    [3.0, 8.0, 4.0],
    [9.0, 8.0, 6.0],
];

pub fn desk_lights() -> LightRig {
    let mut rig = LightRig::new().with_ambient(0.2, 0.2, 0.2);

    rig.directional = DirectionalLight::new(
        [-0.3, -1.0, -0.5],
        LightColors::new([0.2; 3], [0.8; 3], [1.0; 3]),
    );

    rig.spot = SpotLight::new(
        [0.0, 10.0, 5.0],
        [0.0, -1.0, 0.0],
        LightColors::new([0.1; 3], [1.0, 0.9, 0.8], [1.0; 3]),
    )
    .with_cutoff_degrees(10.0, 30.0)
    .with_attenuation(Attenuation::new(1.0, 0.09, 0.032));

    let ceiling = LightColors::new([0.05; 3], [0.8; 3], [1.0; 3]);
    for (slot, position) in rig.points.iter_mut().zip(CEILING_LIGHTS) {
        *slot = PointLight::new(position, ceiling, Attenuation::new(1.0, 0.14, 0.07));
    }

    rig
}

pub fn desk_scene() -> SceneDescription {
    let mut scene = SceneDescription::new();
    for (file, tag) in DESK_TEXTURES {
        scene.add_texture(file, tag);
    }
    scene.lights = desk_lights();

    scene.add_object(
        SceneObject::new("table top", MeshDraw::Box)
            .with_transform(Transform::new([30.0, 1.0, 15.0], [0.0; 3], [0.0, -0.5, 3.0]))
            .with_texture("table")
            .with_material("wood"),
    );

    // Mug: printed side wall, plain bottom, torus handle
    let mug = Transform::new([1.0, 2.8, 1.0], [0.0, 120.0, 0.0], [-10.2, 0.1, 3.0]);
    scene.add_object(
        SceneObject::new("mug body", MeshDraw::Cylinder(CylinderParts::SIDES))
            .with_transform(mug)
            .with_texture("flag")
            .with_uv_scale(0.5, 0.5)
            .with_material("wood"),
    );
    scene.add_object(
        SceneObject::new("mug bottom", MeshDraw::Cylinder(CylinderParts::BOTTOM))
            .with_transform(mug)
            .with_texture("mugbase")
            .with_uv_scale(0.5, 0.5)
            .with_material("wood"),
    );
    scene.add_object(
        SceneObject::new("mug handle", MeshDraw::Torus)
            .with_transform(Transform::new([0.6, 0.9, 0.6], [0.0; 3], [-9.0, 1.5, 3.0]))
            .with_texture("mugbase")
            .with_material("wood"),
    );

    // Office sign: printed front face over a plain shell
    let sign = Transform::new([6.0, 5.0, 0.5], [0.0; 3], [-4.5, 2.5, 3.0]);
    scene.add_object(
        SceneObject::new("office sign front", MeshDraw::BoxFace(BoxSide::Front))
            .with_transform(sign)
            .with_texture("office")
            .with_material("wood"),
    );
    scene.add_object(
        SceneObject::new("office sign", MeshDraw::Box)
            .with_transform(sign)
            .with_texture("mugbase")
            .with_material("wood"),
    );

    // Trash can: upturned half sphere as the base, open cylinder wall
    scene.add_object(
        SceneObject::new("trash can base", MeshDraw::HalfSphere)
            .with_transform(Transform::new([2.53, 1.0, 2.53], [180.0, 0.0, 0.0], [4.5, 1.0, 3.0]))
            .with_texture("plastic")
            .with_material("plastic"),
    );
    scene.add_object(
        SceneObject::new("trash can", MeshDraw::Cylinder(CylinderParts::SIDES))
            .with_transform(Transform::new([2.5, 5.0, 2.5], [0.0; 3], [4.5, 0.97, 3.0]))
            .with_texture("plastic")
            .with_material("plastic"),
    );

    scene.add_object(
        SceneObject::new("plank", MeshDraw::Box)
            .with_transform(Transform::new([1.0, 7.0, 1.0], [0.0; 3], [10.0, 3.5, 3.0]))
            .with_texture("plank")
            .with_material("wood"),
    );

    scene
}
