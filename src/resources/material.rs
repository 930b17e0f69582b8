use std::sync::Arc;

use bitflags::bitflags;
use glam::Vec4;
use uuid::Uuid;

/// How a material is blended into the framebuffer.
///
/// The scheduler only cares about the solid/transparent split; the concrete
/// blend equation is the backend's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaterialType {
    /// Opaque, z-writing. Drawn in the Solid pass.
    #[default]
    Solid,
    /// Alpha-blended by the texture's alpha channel.
    TransparentAlphaChannel,
    /// Additive blending.
    TransparentAddColor,
    /// Alpha taken from per-vertex color.
    TransparentVertexAlpha,
}

impl MaterialType {
    /// Whether this blend mode requires a transparent render pass.
    ///
    /// Backends may override the decision through
    /// [`RenderBackend::needs_transparent_pass`](crate::render::RenderBackend::needs_transparent_pass);
    /// this is the default classification.
    #[must_use]
    pub fn is_transparent(self) -> bool {
        !matches!(self, MaterialType::Solid)
    }
}

bitflags! {
    /// Fixed-function state toggles carried by a material.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MaterialFlags: u32 {
        const LIGHTING         = 1 << 0;
        const BACKFACE_CULLING = 1 << 1;
        const Z_WRITE          = 1 << 2;
        const WIREFRAME        = 1 << 3;
        const FOG              = 1 << 4;
    }
}

impl Default for MaterialFlags {
    fn default() -> Self {
        MaterialFlags::LIGHTING | MaterialFlags::BACKFACE_CULLING | MaterialFlags::Z_WRITE
    }
}

/// A texture reference as seen by the scheduler: identity plus a debug name.
///
/// Pixel data, sampling state and GPU upload live behind the backend; the
/// core only needs a stable identity to group Solid-pass draws by texture.
#[derive(Debug)]
pub struct Texture {
    pub uuid: Uuid,
    pub name: String,
}

impl Texture {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// Material descriptor attached to mesh parts and scene nodes.
#[derive(Debug, Clone)]
pub struct Material {
    pub material_type: MaterialType,
    pub flags: MaterialFlags,
    /// Primary texture; `None` renders with the diffuse color only.
    pub texture: Option<Arc<Texture>>,
    pub diffuse_color: Vec4,
}

impl Material {
    #[must_use]
    pub fn new() -> Self {
        Self {
            material_type: MaterialType::Solid,
            flags: MaterialFlags::default(),
            texture: None,
            diffuse_color: Vec4::ONE,
        }
    }

    #[must_use]
    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    #[must_use]
    pub fn with_type(mut self, material_type: MaterialType) -> Self {
        self.material_type = material_type;
        self
    }

    /// Identity of the primary texture, used as the Solid-pass sort key.
    #[must_use]
    pub fn texture_id(&self) -> Option<Uuid> {
        self.texture.as_ref().map(|t| t.uuid)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}
