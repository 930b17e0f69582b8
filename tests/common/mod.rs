//! Shared test helpers: a recording backend for draw-order assertions.
#![allow(dead_code)]

use std::collections::HashMap;

use glam::{Mat4, Vec4};

use arbor::scene::LightSample;
use arbor::{Material, MeshPart, NodeKey, RenderBackend, TransformSlot};

/// One backend call, as observed by [`TraceBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    Transform(TransformSlot, Mat4),
    /// Material made current, tagged by its diffuse color.
    Material(Vec4),
    /// Mesh part drawn, tagged by the current material's diffuse color.
    Draw(Vec4),
    Ambient(Vec4),
    Light(Vec4),
    ShadowVolumes(Vec4),
}

/// Backend that records every call instead of drawing.
#[derive(Debug, Default)]
pub struct TraceBackend {
    pub events: Vec<TraceEvent>,
    /// Scripted occlusion-query results; absent nodes report "unknown".
    pub occlusion: HashMap<NodeKey, u32>,
    current_material: Vec4,
}

impl TraceBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diffuse colors of drawn parts, in draw order.
    pub fn draw_colors(&self) -> Vec<Vec4> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TraceEvent::Draw(color) => Some(*color),
                _ => None,
            })
            .collect()
    }

    pub fn count_draws(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TraceEvent::Draw(_)))
            .count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl RenderBackend for TraceBackend {
    fn set_transform(&mut self, slot: TransformSlot, matrix: &Mat4) {
        self.events.push(TraceEvent::Transform(slot, *matrix));
    }

    fn set_material(&mut self, material: &Material) {
        self.current_material = material.diffuse_color;
        self.events.push(TraceEvent::Material(material.diffuse_color));
    }

    fn draw_mesh_part(&mut self, _part: &MeshPart) {
        self.events.push(TraceEvent::Draw(self.current_material));
    }

    fn set_ambient_light(&mut self, color: Vec4) {
        self.events.push(TraceEvent::Ambient(color));
    }

    fn submit_light(&mut self, light: &LightSample) {
        self.events.push(TraceEvent::Light(light.color));
    }

    fn draw_accumulated_shadow_volumes(&mut self, color: Vec4) {
        self.events.push(TraceEvent::ShadowVolumes(color));
    }

    fn occlusion_result(&self, node: NodeKey) -> u32 {
        self.occlusion.get(&node).copied().unwrap_or(u32::MAX)
    }
}
