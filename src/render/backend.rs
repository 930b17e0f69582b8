//! Abstract render backend.
//!
//! The scene graph issues all drawing through this trait; texture upload,
//! matrix stacks and primitive submission are backend concerns. A headless
//! process uses [`NullBackend`], under which `draw_all` still runs the
//! animation and registration passes so gameplay-visible side effects
//! (bounding boxes, frame cursors, transforms) stay current.

use glam::{Mat4, Vec4};

use crate::resources::{Material, MeshPart};
use crate::scene::NodeKey;
use crate::scene::light::LightSample;

/// Which transform the backend should load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformSlot {
    World,
    View,
    Projection,
}

/// Drawing contract a graphics backend must satisfy.
pub trait RenderBackend {
    /// Loads `matrix` into the given transform slot.
    fn set_transform(&mut self, slot: TransformSlot, matrix: &Mat4);

    /// Makes `material` current for subsequent draws.
    fn set_material(&mut self, material: &Material);

    /// Draws one mesh part with the current transform and material state.
    fn draw_mesh_part(&mut self, part: &MeshPart);

    /// Sets the scene-wide ambient light color.
    fn set_ambient_light(&mut self, color: Vec4);

    /// Adds a dynamic light for this frame.
    fn submit_light(&mut self, light: &LightSample);

    /// Flushes the shadow volumes accumulated during the Shadow pass as one
    /// screen-space blend with `color`.
    fn draw_accumulated_shadow_volumes(&mut self, color: Vec4);

    /// Whether `material` must be drawn in a transparent pass. The default
    /// follows the material's own blend-mode classification.
    fn needs_transparent_pass(&self, material: &Material) -> bool {
        material.material_type.is_transparent()
    }

    /// Last known occlusion-query result for `node` in visible pixels.
    /// Backends without a pending result report `u32::MAX` ("unknown,
    /// assume visible"); only an explicit zero culls.
    fn occlusion_result(&self, node: NodeKey) -> u32 {
        let _ = node;
        u32::MAX
    }
}

/// Backend that draws nothing. For headless runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

impl NullBackend {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl RenderBackend for NullBackend {
    fn set_transform(&mut self, _slot: TransformSlot, _matrix: &Mat4) {}
    fn set_material(&mut self, _material: &Material) {}
    fn draw_mesh_part(&mut self, _part: &MeshPart) {}
    fn set_ambient_light(&mut self, _color: Vec4) {}
    fn submit_light(&mut self, _light: &LightSample) {}
    fn draw_accumulated_shadow_volumes(&mut self, _color: Vec4) {}
}
