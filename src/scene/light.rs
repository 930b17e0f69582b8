use glam::{Affine3A, Vec3, Vec4};

/// Light component attached to a node.
#[derive(Debug, Clone)]
pub struct Light {
    pub color: Vec4,
    pub intensity: f32,
    pub kind: LightKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Emits in every direction up to `range`.
    Point { range: f32 },
    /// Parallel rays along the node's -Z axis.
    Directional,
}

impl Light {
    #[must_use]
    pub fn new_point(color: Vec4, intensity: f32, range: f32) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Point { range },
        }
    }

    #[must_use]
    pub fn new_directional(color: Vec4, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Directional,
        }
    }

    /// Resolves the world-space sample submitted to the backend during the
    /// Light pass.
    #[must_use]
    pub fn sample(&self, world_matrix: &Affine3A) -> LightSample {
        LightSample {
            color: self.color,
            intensity: self.intensity,
            position: world_matrix.translation.into(),
            direction: world_matrix.transform_vector3(-Vec3::Z).normalize_or_zero(),
            range: match self.kind {
                LightKind::Point { range } => range,
                LightKind::Directional => f32::INFINITY,
            },
            kind: self.kind,
        }
    }
}

/// World-space light data as handed to [`RenderBackend::submit_light`].
///
/// [`RenderBackend::submit_light`]: crate::render::RenderBackend::submit_light
#[derive(Debug, Clone, Copy)]
pub struct LightSample {
    pub color: Vec4,
    pub intensity: f32,
    pub position: Vec3,
    pub direction: Vec3,
    pub range: f32,
    pub kind: LightKind,
}
