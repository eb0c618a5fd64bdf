//! # Mesh Library
//!
//! Loads the primitive meshes once and turns per-object draw requests into
//! index ranges. Geometry stays opaque to the scene assembler: it only names
//! a [`MeshDraw`] and lets the library resolve which triangles that covers.

use std::ops::Range;

use crate::gfx::geometry::{
    generate_cube, generate_cylinder, generate_plane, generate_sphere, generate_torus, parts,
    GeometryData,
};
use crate::gfx::scene::vertex::Vertex3D;

/// Primitive mesh families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Plane,
    Box,
    Cylinder,
    Torus,
    Sphere,
}

impl MeshKind {
    pub const ALL: [MeshKind; 5] = [
        MeshKind::Plane,
        MeshKind::Box,
        MeshKind::Cylinder,
        MeshKind::Torus,
        MeshKind::Sphere,
    ];

    fn generate(self) -> GeometryData {
        match self {
            MeshKind::Plane => generate_plane(1.0, 1.0, 1, 1),
            MeshKind::Box => generate_cube(),
            MeshKind::Cylinder => generate_cylinder(36),
            MeshKind::Torus => generate_torus(36, 18, 1.0, 0.25),
            MeshKind::Sphere => generate_sphere(32, 16),
        }
    }
}

/// One face of the unit box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxSide {
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
}

impl BoxSide {
    fn part(self) -> &'static str {
        match self {
            BoxSide::Front => parts::FRONT,
            BoxSide::Back => parts::BACK,
            BoxSide::Left => parts::LEFT,
            BoxSide::Right => parts::RIGHT,
            BoxSide::Top => parts::TOP,
            BoxSide::Bottom => parts::BOTTOM,
        }
    }
}

/// Which surfaces of a cylinder to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CylinderParts {
    pub top: bool,
    pub bottom: bool,
    pub sides: bool,
}

impl CylinderParts {
    pub const ALL: Self = Self {
        top: true,
        bottom: true,
        sides: true,
    };
    pub const SIDES: Self = Self {
        top: false,
        bottom: false,
        sides: true,
    };
    pub const BOTTOM: Self = Self {
        top: false,
        bottom: true,
        sides: false,
    };
    pub const TOP: Self = Self {
        top: true,
        bottom: false,
        sides: false,
    };
}

impl Default for CylinderParts {
    fn default() -> Self {
        Self::ALL
    }
}

/// A draw request: mesh kind plus its per-kind face flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshDraw {
    Plane,
    Box,
    BoxFace(BoxSide),
    Cylinder(CylinderParts),
    Torus,
    Sphere,
    HalfSphere,
}

impl MeshDraw {
    /// Mesh that has to be loaded for this draw
    pub fn kind(&self) -> MeshKind {
        match self {
            MeshDraw::Plane => MeshKind::Plane,
            MeshDraw::Box | MeshDraw::BoxFace(_) => MeshKind::Box,
            MeshDraw::Cylinder(_) => MeshKind::Cylinder,
            MeshDraw::Torus => MeshKind::Torus,
            MeshDraw::Sphere | MeshDraw::HalfSphere => MeshKind::Sphere,
        }
    }
}

/// Mesh collaborator of the scene assembler
pub trait MeshLibrary {
    /// Makes `kind` drawable; repeated calls are no-ops
    fn load(&mut self, kind: MeshKind);

    /// Issues the draw described by `draw`
    fn draw(&mut self, draw: &MeshDraw);
}

impl<T: MeshLibrary + ?Sized> MeshLibrary for &mut T {
    fn load(&mut self, kind: MeshKind) {
        (**self).load(kind)
    }

    fn draw(&mut self, draw: &MeshDraw) {
        (**self).draw(draw)
    }
}

/// Indexed draw of a loaded mesh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCall {
    pub kind: MeshKind,
    pub indices: Range<u32>,
    /// Position of the originating request since the last take; selects the
    /// uniform block committed for that request
    pub draw: u32,
}

/// Generated primitive meshes with a queue of pending draw calls
///
/// Render passes drain the queue with [`PrimitiveMeshes::take_draw_calls`]
/// and issue `draw_indexed` for each range against the buffers built from
/// [`PrimitiveMeshes::vertices`] and [`PrimitiveMeshes::indices`].
/// Skipped requests still advance the request counter.
#[derive(Debug, Default)]
pub struct PrimitiveMeshes {
    meshes: Vec<(MeshKind, GeometryData)>,
    draw_calls: Vec<DrawCall>,
    requests: u32,
}

impl PrimitiveMeshes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self, kind: MeshKind) -> bool {
        self.geometry(kind).is_some()
    }

    /// Kinds in load order
    pub fn loaded_kinds(&self) -> Vec<MeshKind> {
        self.meshes.iter().map(|(kind, _)| *kind).collect()
    }

    pub fn geometry(&self, kind: MeshKind) -> Option<&GeometryData> {
        self.meshes
            .iter()
            .find(|(loaded, _)| *loaded == kind)
            .map(|(_, geometry)| geometry)
    }

    /// Interleaved vertices ready for a vertex buffer
    pub fn vertices(&self, kind: MeshKind) -> Option<Vec<Vertex3D>> {
        self.geometry(kind).map(GeometryData::to_vertices)
    }

    pub fn indices(&self, kind: MeshKind) -> Option<&[u32]> {
        self.geometry(kind).map(|geometry| geometry.indices.as_slice())
    }

    /// Draw calls queued since the last take
    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }

    /// Drains the queue and restarts request numbering at 0
    pub fn take_draw_calls(&mut self) -> Vec<DrawCall> {
        self.requests = 0;
        std::mem::take(&mut self.draw_calls)
    }

    /// Index ranges covered by `draw`, in submission order
    pub fn resolve(&self, draw: &MeshDraw) -> Option<Vec<Range<u32>>> {
        let geometry = self.geometry(draw.kind())?;
        let ranges: Vec<Range<u32>> = match draw {
            MeshDraw::BoxFace(side) => geometry.part(side.part()).into_iter().collect(),
            MeshDraw::Cylinder(flags) => [
                (flags.sides, parts::SIDES),
                (flags.bottom, parts::BOTTOM),
                (flags.top, parts::TOP),
            ]
            .into_iter()
            .filter(|(wanted, _)| *wanted)
            .filter_map(|(_, part)| geometry.part(part))
            .collect(),
            MeshDraw::HalfSphere => geometry.part(parts::UPPER).into_iter().collect(),
            MeshDraw::Plane | MeshDraw::Box | MeshDraw::Torus | MeshDraw::Sphere => {
                vec![geometry.all_indices()]
            }
        };
        Some(ranges)
    }
}

impl MeshLibrary for PrimitiveMeshes {
    fn load(&mut self, kind: MeshKind) {
        if self.is_loaded(kind) {
            return;
        }
        let geometry = kind.generate();
        log::debug!(
            "Generated {:?} mesh: {} vertices, {} triangles",
            kind,
            geometry.vertex_count(),
            geometry.triangle_count()
        );
        self.meshes.push((kind, geometry));
    }

    fn draw(&mut self, draw: &MeshDraw) {
        let kind = draw.kind();
        let request = self.requests;
        self.requests += 1;
        let Some(ranges) = self.resolve(draw) else {
            log::warn!("Skipping draw of {:?}: mesh {:?} is not loaded", draw, kind);
            return;
        };
        // Ranges of one request that continue each other become one call
        let mut merged: Vec<Range<u32>> = Vec::with_capacity(ranges.len());
        for range in ranges {
            match merged.last_mut() {
                Some(last) if last.end == range.start => last.end = range.end,
                _ => merged.push(range),
            }
        }
        self.draw_calls.extend(merged.into_iter().map(|indices| DrawCall {
            kind,
            indices,
            draw: request,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded() -> PrimitiveMeshes {
        let mut meshes = PrimitiveMeshes::new();
        for kind in MeshKind::ALL {
            meshes.load(kind);
        }
        meshes
    }

    #[test]
    fn test_load_is_idempotent() {
        let mut meshes = PrimitiveMeshes::new();
        meshes.load(MeshKind::Box);
        meshes.load(MeshKind::Box);
        assert_eq!(meshes.loaded_kinds(), vec![MeshKind::Box]);
    }

    #[test]
    fn test_unloaded_draw_is_skipped() {
        let mut meshes = PrimitiveMeshes::new();
        meshes.draw(&MeshDraw::Torus);
        assert!(meshes.draw_calls().is_empty());
    }

    #[test]
    fn test_box_face_draws_six_indices() {
        let mut meshes = loaded();
        meshes.draw(&MeshDraw::BoxFace(BoxSide::Front));
        meshes.draw(&MeshDraw::BoxFace(BoxSide::Back));
        // Adjacent faces from separate requests stay separate calls
        assert_eq!(
            meshes.take_draw_calls(),
            vec![
                DrawCall {
                    kind: MeshKind::Box,
                    indices: 0..6,
                    draw: 0,
                },
                DrawCall {
                    kind: MeshKind::Box,
                    indices: 6..12,
                    draw: 1,
                },
            ]
        );
        assert!(meshes.draw_calls().is_empty());
    }

    #[test]
    fn test_cylinder_parts() {
        let mut meshes = loaded();
        let cylinder = meshes.geometry(MeshKind::Cylinder).unwrap().clone();

        meshes.draw(&MeshDraw::Cylinder(CylinderParts::SIDES));
        assert_eq!(
            meshes.take_draw_calls()[0].indices,
            cylinder.part(parts::SIDES).unwrap()
        );

        // Sides, bottom and top are laid out back to back
        meshes.draw(&MeshDraw::Cylinder(CylinderParts::ALL));
        let calls = meshes.take_draw_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].indices, cylinder.all_indices());

        meshes.draw(&MeshDraw::Cylinder(CylinderParts {
            top: true,
            bottom: false,
            sides: true,
        }));
        let calls = meshes.take_draw_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].indices, cylinder.part(parts::TOP).unwrap());
        // Both ranges come from one request
        assert_eq!((calls[0].draw, calls[1].draw), (0, 0));
    }

    #[test]
    fn test_skipped_request_keeps_numbering() {
        let mut meshes = PrimitiveMeshes::new();
        meshes.load(MeshKind::Box);
        meshes.draw(&MeshDraw::Box);
        meshes.draw(&MeshDraw::Torus);
        meshes.draw(&MeshDraw::Box);

        let draws: Vec<_> = meshes.take_draw_calls().iter().map(|c| c.draw).collect();
        assert_eq!(draws, vec![0, 2]);

        meshes.draw(&MeshDraw::Box);
        assert_eq!(meshes.draw_calls()[0].draw, 0);
    }

    #[test]
    fn test_half_sphere_is_upper_half() {
        let mut meshes = loaded();
        let sphere = meshes.geometry(MeshKind::Sphere).unwrap().all_indices();
        meshes.draw(&MeshDraw::HalfSphere);
        let calls = meshes.take_draw_calls();
        assert_eq!(calls[0].indices.start, 0);
        assert_eq!(calls[0].indices.len() * 2, sphere.len());
    }

    #[test]
    fn test_vertices_available_after_load() {
        let meshes = loaded();
        let cube = meshes.vertices(MeshKind::Box).unwrap();
        assert_eq!(cube.len(), 24);
        assert!(PrimitiveMeshes::new().vertices(MeshKind::Box).is_none());
    }
}
