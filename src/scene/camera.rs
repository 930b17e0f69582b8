use glam::{Affine3A, Mat4, Vec3, Vec4, Vec4Swizzles};

use crate::resources::BoundingBox;

/// Camera component: projection parameters plus cached matrices.
///
/// The view matrix is derived from the owning node's world transform during
/// the animation pass; the frustum is rebuilt whenever view or projection
/// change.
#[derive(Debug, Clone)]
pub struct Camera {
    pub projection_type: ProjectionType,
    /// Vertical field of view in radians (perspective only).
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Half-height of the view volume (orthographic only).
    pub ortho_size: f32,

    // Cached matrices, read-only for the renderer.
    pub(crate) world_matrix: Affine3A,
    pub(crate) view_matrix: Mat4,
    pub(crate) projection_matrix: Mat4,
    pub(crate) view_projection_matrix: Mat4,
    pub(crate) frustum: Frustum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionType {
    Perspective,
    Orthographic,
}

impl Camera {
    #[must_use]
    pub fn new_perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            projection_type: ProjectionType::Perspective,
            fov: fov_degrees.to_radians(),
            aspect,
            near,
            far,
            ortho_size: 10.0,

            world_matrix: Affine3A::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            view_matrix: Mat4::IDENTITY,
            view_projection_matrix: Mat4::IDENTITY,
            frustum: Frustum::default(),
        };

        cam.update_projection_matrix();
        cam
    }

    #[must_use]
    pub fn new_orthographic(size: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            projection_type: ProjectionType::Orthographic,
            fov: 60f32.to_radians(),
            aspect,
            near,
            far,
            ortho_size: size,

            world_matrix: Affine3A::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            view_matrix: Mat4::IDENTITY,
            view_projection_matrix: Mat4::IDENTITY,
            frustum: Frustum::default(),
        };

        cam.update_projection_matrix();
        cam
    }

    /// Rebuilds the projection matrix from the lens parameters.
    pub fn update_projection_matrix(&mut self) {
        self.projection_matrix = match self.projection_type {
            ProjectionType::Perspective => {
                // Depth range [0, 1], right-handed.
                Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
            }
            ProjectionType::Orthographic => {
                let w = self.ortho_size * self.aspect;
                let h = self.ortho_size;
                Mat4::orthographic_rh(-w, w, -h, h, self.near, self.far)
            }
        };

        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
        self.frustum = Frustum::from_matrix(self.view_projection_matrix);
    }

    /// Derives view and view-projection from the owning node's world
    /// transform. Called by the animation pass.
    pub fn update_view_projection(&mut self, world_transform: &Affine3A) {
        self.world_matrix = *world_transform;
        self.view_matrix = Mat4::from(*world_transform).inverse();
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
        self.frustum = Frustum::from_matrix(self.view_projection_matrix);
    }

    /// World transform of the owning node as of the last animation pass.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.world_matrix
    }

    #[inline]
    #[must_use]
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    #[inline]
    #[must_use]
    pub fn view_projection_matrix(&self) -> &Mat4 {
        &self.view_projection_matrix
    }

    #[inline]
    #[must_use]
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    #[inline]
    #[must_use]
    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }
}

/// View frustum: six clip planes plus the eight corner points.
///
/// Planes store `(normal, d)` as `Vec4` with the normal pointing inward; a
/// point `p` is inside a plane when `dot(plane.xyz, p) + plane.w >= 0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Frustum {
    /// Left, Right, Bottom, Top, Near, Far.
    pub(crate) planes: [Vec4; 6],
    pub(crate) corners: [Vec3; 8],
}

impl Frustum {
    /// Extracts the frustum from a view-projection matrix.
    ///
    /// Gribb-Hartmann plane extraction, for a [0, 1] depth range:
    /// <https://www.gamedevs.org/uploads/fast-extraction-viewing-frustum-planes-from-world-view-projection-matrix.pdf>
    #[must_use]
    pub fn from_matrix(m: Mat4) -> Self {
        let rows = [m.row(0), m.row(1), m.row(2), m.row(3)];

        let mut planes = [Vec4::ZERO; 6];
        planes[0] = rows[3] + rows[0]; // Left
        planes[1] = rows[3] - rows[0]; // Right
        planes[2] = rows[3] + rows[1]; // Bottom
        planes[3] = rows[3] - rows[1]; // Top
        planes[4] = rows[2]; // Near (z in [0, 1])
        planes[5] = rows[3] - rows[2]; // Far

        for plane in &mut planes {
            let length = plane.xyz().length();
            if length > 0.0 {
                *plane /= length;
            }
        }

        // Unproject the NDC cube corners for the bounding queries.
        let inv = m.inverse();
        let mut corners = [Vec3::ZERO; 8];
        let mut i = 0;
        for z in [0.0f32, 1.0] {
            for y in [-1.0f32, 1.0] {
                for x in [-1.0f32, 1.0] {
                    let p = inv * Vec4::new(x, y, z, 1.0);
                    corners[i] = if p.w.abs() > f32::EPSILON {
                        p.xyz() / p.w
                    } else {
                        p.xyz()
                    };
                    i += 1;
                }
            }
        }

        Self { planes, corners }
    }

    #[inline]
    #[must_use]
    pub fn planes(&self) -> &[Vec4; 6] {
        &self.planes
    }

    #[inline]
    #[must_use]
    pub fn corners(&self) -> &[Vec3; 8] {
        &self.corners
    }

    /// Axis-aligned box enclosing the frustum corners.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.corners)
    }

    /// Center of the enclosing sphere used by the sphere culling heuristic.
    #[must_use]
    pub fn bounding_center(&self) -> Vec3 {
        let mut sum = Vec3::ZERO;
        for c in &self.corners {
            sum += *c;
        }
        sum / 8.0
    }

    /// Radius of the enclosing sphere around [`Frustum::bounding_center`].
    #[must_use]
    pub fn bounding_radius(&self) -> f32 {
        let center = self.bounding_center();
        self.corners
            .iter()
            .map(|c| (*c - center).length())
            .fold(0.0, f32::max)
    }
}
