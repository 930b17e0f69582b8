//! Render-pass buckets.
//!
//! Nodes are sorted into seven per-pass lists during the registration pass
//! and drained in fixed order during draw. Solid entries carry a
//! texture-identity key so draws group by texture (a state-change heuristic,
//! not a correctness requirement); transparent entries carry squared camera
//! distance and draw farthest first, which *is* required for blending.

use uuid::Uuid;

use crate::scene::NodeKey;

/// The render passes, in draw order.
///
/// `Automatic` is only valid as a registration request: the node lands in
/// `Solid` or `Transparent` depending on its materials. `None` is the tag
/// outside of any pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderPass {
    #[default]
    None,
    Camera,
    Light,
    Solid,
    Shadow,
    Transparent,
    TransparentEffect,
    Gui,
    /// Registration-only: resolve to Solid or Transparent by material scan.
    Automatic,
}

/// Solid-pass entry, sorted by the first material's texture identity.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SolidEntry {
    pub node: NodeKey,
    pub texture: Option<Uuid>,
}

/// Transparent-pass entry, sorted farthest-from-camera first.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DistanceEntry {
    pub node: NodeKey,
    pub distance_sq: f64,
}

/// The per-frame pass buckets.
///
/// All buckets are append-only between registration and draw, and fully
/// drained at the end of each frame.
#[derive(Debug, Default)]
pub struct RenderQueue {
    pub(crate) cameras: Vec<NodeKey>,
    pub(crate) lights: Vec<NodeKey>,
    pub(crate) solids: Vec<SolidEntry>,
    pub(crate) shadows: Vec<NodeKey>,
    pub(crate) transparents: Vec<DistanceEntry>,
    pub(crate) transparent_effects: Vec<DistanceEntry>,
    pub(crate) guis: Vec<NodeKey>,
}

impl RenderQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently registered for `pass`.
    #[must_use]
    pub fn len(&self, pass: RenderPass) -> usize {
        match pass {
            RenderPass::Camera => self.cameras.len(),
            RenderPass::Light => self.lights.len(),
            RenderPass::Solid => self.solids.len(),
            RenderPass::Shadow => self.shadows.len(),
            RenderPass::Transparent => self.transparents.len(),
            RenderPass::TransparentEffect => self.transparent_effects.len(),
            RenderPass::Gui => self.guis.len(),
            RenderPass::None | RenderPass::Automatic => 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
            && self.lights.is_empty()
            && self.solids.is_empty()
            && self.shadows.is_empty()
            && self.transparents.is_empty()
            && self.transparent_effects.is_empty()
            && self.guis.is_empty()
    }

    /// Registers a camera; a node already present this frame is not added
    /// again. Returns whether the bucket accepted the node.
    pub(crate) fn push_camera(&mut self, node: NodeKey) -> bool {
        if self.cameras.contains(&node) {
            return false;
        }
        self.cameras.push(node);
        true
    }

    /// Registers a light, deduplicated like cameras.
    pub(crate) fn push_light(&mut self, node: NodeKey) -> bool {
        if self.lights.contains(&node) {
            return false;
        }
        self.lights.push(node);
        true
    }

    pub(crate) fn push_solid(&mut self, node: NodeKey, texture: Option<Uuid>) {
        self.solids.push(SolidEntry { node, texture });
    }

    pub(crate) fn push_shadow(&mut self, node: NodeKey) {
        self.shadows.push(node);
    }

    pub(crate) fn push_transparent(&mut self, node: NodeKey, distance_sq: f64) {
        self.transparents.push(DistanceEntry { node, distance_sq });
    }

    pub(crate) fn push_transparent_effect(&mut self, node: NodeKey, distance_sq: f64) {
        self.transparent_effects
            .push(DistanceEntry { node, distance_sq });
    }

    pub(crate) fn push_gui(&mut self, node: NodeKey) {
        self.guis.push(node);
    }

    /// Groups solid entries by texture. Stable, so nodes sharing a texture
    /// keep their registration order.
    pub(crate) fn sort_solids(&mut self) {
        self.solids.sort_by_key(|e| e.texture);
    }

    /// Orders both transparent buckets farthest first.
    pub(crate) fn sort_transparents(&mut self) {
        self.transparents
            .sort_by(|a, b| b.distance_sq.total_cmp(&a.distance_sq));
        self.transparent_effects
            .sort_by(|a, b| b.distance_sq.total_cmp(&a.distance_sq));
    }

    pub(crate) fn clear(&mut self) {
        self.cameras.clear();
        self.lights.clear();
        self.solids.clear();
        self.shadows.clear();
        self.transparents.clear();
        self.transparent_effects.clear();
        self.guis.clear();
    }
}
