use std::sync::Arc;

use glam::{Vec2, Vec3, Vec4};

use crate::resources::bounds::BoundingBox;
use crate::resources::material::Material;

/// A single vertex as stored in mesh parts.
///
/// `repr(C)` + `Pod` so backends can hand the slice to the GPU unchanged.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
    pub color: Vec4,
}

impl Vertex {
    #[must_use]
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            normal,
            uv,
            color: Vec4::ONE,
        }
    }
}

/// One drawable batch: a vertex/index range sharing a single material.
#[derive(Debug, Clone, Default)]
pub struct MeshPart {
    pub vertices: Vec<Vertex>,
    /// Triangle list, three indices per face.
    pub indices: Vec<u32>,
    pub material: Material,
    pub bounding_box: BoundingBox,
}

impl MeshPart {
    #[must_use]
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            material: Material::new(),
            bounding_box: BoundingBox::EMPTY,
        }
    }

    /// Recomputes the bounding box from the current vertex positions.
    pub fn recalculate_bounding_box(&mut self) {
        let mut bbox = BoundingBox::EMPTY;
        for v in &self.vertices {
            bbox.add_point(v.position);
        }
        self.bounding_box = bbox;
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A static mesh: an ordered list of parts plus the enclosing box.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub name: String,
    pub parts: Vec<MeshPart>,
    pub bounding_box: BoundingBox,
}

impl Mesh {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parts: Vec::new(),
            bounding_box: BoundingBox::EMPTY,
        }
    }

    pub fn add_part(&mut self, part: MeshPart) {
        self.parts.push(part);
    }

    /// Recomputes part boxes and the mesh box from vertex data.
    pub fn recalculate_bounding_box(&mut self) {
        let mut bbox = BoundingBox::EMPTY;
        for part in &mut self.parts {
            part.recalculate_bounding_box();
            bbox = bbox.union(&part.bounding_box);
        }
        self.bounding_box = bbox;
    }
}

/// A mesh resource with one `Mesh` per animation frame.
///
/// A single-frame instance is the static-mesh case. Frame resolution snaps
/// to the integer frame; the blend hint (1/1000ths of a frame) is accepted
/// so interpolating resources can refine the choice, and ignored here.
#[derive(Debug, Clone)]
pub struct AnimatedMesh {
    pub name: String,
    pub frames: Vec<Arc<Mesh>>,
    /// Authored playback speed in frames per second.
    pub frames_per_second: f32,
    pub bounding_box: BoundingBox,
}

impl AnimatedMesh {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frames: Vec::new(),
            frames_per_second: 25.0,
            bounding_box: BoundingBox::EMPTY,
        }
    }

    /// Wraps a single static mesh as a one-frame animated resource.
    #[must_use]
    pub fn from_static(mesh: Mesh) -> Self {
        let bounding_box = mesh.bounding_box;
        Self {
            name: mesh.name.clone(),
            frames: vec![Arc::new(mesh)],
            frames_per_second: 25.0,
            bounding_box,
        }
    }

    pub fn add_frame(&mut self, frame: Mesh) {
        self.bounding_box = self.bounding_box.union(&frame.bounding_box);
        self.frames.push(Arc::new(frame));
    }

    /// Last valid frame index.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Resolves the mesh to draw for an integer frame index.
    ///
    /// `frame` is clamped into `[start, end]` and into the stored frame
    /// range. `_blend` is the sub-frame position in 1/1000ths.
    #[must_use]
    pub fn mesh_for_frame(
        &self,
        frame: i32,
        _blend: i32,
        start: i32,
        end: i32,
    ) -> Option<&Arc<Mesh>> {
        if self.frames.is_empty() {
            return None;
        }
        let clamped = frame.clamp(start.min(end), start.max(end)).max(0) as usize;
        self.frames.get(clamped.min(self.frames.len() - 1))
    }
}
