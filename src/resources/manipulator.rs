//! Mesh manipulation helpers.
//!
//! Stateless functions that edit mesh data in place: winding flips, normal
//! recalculation, vertex coloring, scaling and arbitrary transforms. Bounding
//! boxes are recomputed by the operations that move vertices.

use glam::{Affine3A, Vec3, Vec4};

use crate::resources::mesh::{Mesh, MeshPart};

/// Reverses the winding order of every triangle, turning front faces into
/// back faces. Normals are left untouched.
pub fn flip_winding(mesh: &mut Mesh) {
    for part in &mut mesh.parts {
        for tri in part.indices.chunks_exact_mut(3) {
            tri.swap(0, 2);
        }
    }
}

/// Inverts every vertex normal.
pub fn invert_normals(mesh: &mut Mesh) {
    for part in &mut mesh.parts {
        for v in &mut part.vertices {
            v.normal = -v.normal;
        }
    }
}

/// Recomputes normals for one part from its triangle geometry.
///
/// With `smooth` set, a vertex shared by several triangles gets the
/// normalized sum of the adjacent face normals; otherwise every vertex takes
/// the normal of the last face that referenced it (flat shading over
/// unshared vertices).
pub fn recalculate_part_normals(part: &mut MeshPart, smooth: bool) {
    if smooth {
        for v in &mut part.vertices {
            v.normal = Vec3::ZERO;
        }
    }

    for tri in part.indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let p0 = part.vertices[i0].position;
        let p1 = part.vertices[i1].position;
        let p2 = part.vertices[i2].position;
        let face_normal = (p1 - p0).cross(p2 - p0).normalize_or_zero();

        if smooth {
            part.vertices[i0].normal += face_normal;
            part.vertices[i1].normal += face_normal;
            part.vertices[i2].normal += face_normal;
        } else {
            part.vertices[i0].normal = face_normal;
            part.vertices[i1].normal = face_normal;
            part.vertices[i2].normal = face_normal;
        }
    }

    if smooth {
        for v in &mut part.vertices {
            v.normal = v.normal.normalize_or_zero();
        }
    }
}

/// Recomputes normals for every part of the mesh.
pub fn recalculate_normals(mesh: &mut Mesh, smooth: bool) {
    for part in &mut mesh.parts {
        recalculate_part_normals(part, smooth);
    }
}

/// Sets the color of every vertex.
pub fn set_vertex_colors(mesh: &mut Mesh, color: Vec4) {
    for part in &mut mesh.parts {
        for v in &mut part.vertices {
            v.color = color;
        }
    }
}

/// Scales every vertex position by `factor` and refreshes bounding boxes.
pub fn scale(mesh: &mut Mesh, factor: Vec3) {
    for part in &mut mesh.parts {
        for v in &mut part.vertices {
            v.position *= factor;
        }
    }
    mesh.recalculate_bounding_box();
}

/// Applies an affine transform to positions and (as a direction) to normals,
/// then refreshes bounding boxes.
pub fn transform(mesh: &mut Mesh, matrix: &Affine3A) {
    for part in &mut mesh.parts {
        for v in &mut part.vertices {
            v.position = matrix.transform_point3(v.position);
            v.normal = matrix.transform_vector3(v.normal).normalize_or_zero();
        }
    }
    mesh.recalculate_bounding_box();
}
