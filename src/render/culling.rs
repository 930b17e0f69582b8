//! Per-node visibility tests.
//!
//! A node is culled when one of its enabled tests proves it definitely
//! invisible; "visible or indeterminate" always passes. Without an active
//! camera nothing is culled.

use glam::{Mat4, Vec4, Vec4Swizzles};

use crate::render::backend::RenderBackend;
use crate::scene::NodeKey;
use crate::scene::camera::Frustum;
use crate::scene::node::{CullingMode, SceneNode};

/// Runs the node's enabled culling tests against `frustum`, in order:
/// occlusion query, bounding box, bounding sphere, exact frustum-box.
/// Short-circuits on the first test that culls.
#[must_use]
pub fn is_culled(
    node: &SceneNode,
    key: NodeKey,
    frustum: Option<&Frustum>,
    backend: &dyn RenderBackend,
) -> bool {
    let Some(frustum) = frustum else {
        return false;
    };

    let mode = node.culling;
    let mut culled = false;

    // Occlusion query: an explicit zero-pixel result culls.
    if mode.contains(CullingMode::OCCLUSION_QUERY) {
        culled = backend.occlusion_result(key) == 0;
    }

    // World-space box against the frustum's bounding box. The test is
    // inclusive: touching boxes still intersect.
    if !culled && mode.contains(CullingMode::BOX) {
        let world_box = node.world_bounding_box();
        culled = !world_box.intersects(&frustum.bounding_box());
    }

    // Bounding-sphere heuristic on squared center distance.
    if !culled && mode.contains(CullingMode::SPHERE) {
        let world_box = node.world_bounding_box();
        let radius = world_box.radius();
        let center = world_box.center();

        let cam_radius = frustum.bounding_radius();
        let cam_center = frustum.bounding_center();

        let dist_sq = (center - cam_center).length_squared();
        let max_dist = (radius + cam_radius) * (radius + cam_radius);

        culled = dist_sq > max_dist;
    }

    // Exact test: bring the frustum planes into node-local space and
    // classify the local box corners. All eight corners strictly outside
    // any one plane culls; a corner exactly on a plane counts as inside.
    if !culled && mode.contains(CullingMode::FRUSTUM_BOX) {
        let local_planes = planes_in_local_space(frustum, &node.transform.world_matrix_as_mat4());
        let corners = node.bounding_box().corners();

        for plane in &local_planes {
            let mut any_inside = false;
            for corner in corners {
                if plane.xyz().dot(corner) + plane.w >= 0.0 {
                    any_inside = true;
                    break;
                }
            }
            if !any_inside {
                culled = true;
                break;
            }
        }
    }

    culled
}

/// Transforms the frustum planes into the space described by `world`.
///
/// For a plane `p` and world matrix `W`, a local point `x` satisfies
/// `p · (W x)`, so the local plane is `Wᵀ p` — no matrix inverse needed.
fn planes_in_local_space(frustum: &Frustum, world: &Mat4) -> [Vec4; 6] {
    let transpose = world.transpose();
    frustum.planes.map(|p| transpose * p)
}
