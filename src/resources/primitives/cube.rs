use glam::{Vec2, Vec3};

use crate::resources::mesh::{Mesh, MeshPart, Vertex};

/// Layout variant produced by [`create_cube_mesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CubeMeshVariant {
    /// One part, 12 vertices. Corner vertices are shared between faces and
    /// carry averaged diagonal normals, so lighting smears across edges but
    /// the draw submission is a single batch.
    #[default]
    SharedVertices,
    /// Six parts, 4 vertices each, one perpendicular normal per face.
    /// Correct per-face lighting at the cost of six draw submissions.
    PerFaceNormals,
}

/// Builds a cube mesh centered on the origin.
///
/// The resulting bounding box is exactly `[-size/2, +size/2]` per axis.
/// Pure function: no shared state, safe to call concurrently.
#[must_use]
pub fn create_cube_mesh(size: Vec3, variant: CubeMeshVariant) -> Mesh {
    let mut mesh = Mesh::new("cube");

    match variant {
        CubeMeshVariant::SharedVertices => mesh.add_part(shared_vertices_part(size)),
        CubeMeshVariant::PerFaceNormals => {
            for face in 0..6 {
                mesh.add_part(per_face_part(face, size));
            }
        }
    }

    mesh.recalculate_bounding_box();
    mesh
}

/*
      011        111
        /6,8-----/5        y
       /  |     / |        ^  z
      /   |    /  |        | /
  010 3,9------2  |        |/
      |   7- - |10,4 101   *---->x
      |  /     |  /
      |/       | /
      0--------11,1
     000      100
*/
fn shared_vertices_part(size: Vec3) -> MeshPart {
    // (position in the unit cube, averaged corner normal, uv)
    let raw: [([f32; 3], [f32; 3], [f32; 2]); 12] = [
        ([0.0, 0.0, 0.0], [-1.0, -1.0, -1.0], [0.0, 1.0]),
        ([1.0, 0.0, 0.0], [1.0, -1.0, -1.0], [1.0, 1.0]),
        ([1.0, 1.0, 0.0], [1.0, 1.0, -1.0], [1.0, 0.0]),
        ([0.0, 1.0, 0.0], [-1.0, 1.0, -1.0], [0.0, 0.0]),
        ([1.0, 0.0, 1.0], [1.0, -1.0, 1.0], [0.0, 1.0]),
        ([1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [0.0, 0.0]),
        ([0.0, 1.0, 1.0], [-1.0, 1.0, 1.0], [1.0, 0.0]),
        ([0.0, 0.0, 1.0], [-1.0, -1.0, 1.0], [1.0, 1.0]),
        ([0.0, 1.0, 1.0], [-1.0, 1.0, 1.0], [0.0, 1.0]),
        ([0.0, 1.0, 0.0], [-1.0, 1.0, -1.0], [1.0, 1.0]),
        ([1.0, 0.0, 1.0], [1.0, -1.0, 1.0], [1.0, 0.0]),
        ([1.0, 0.0, 0.0], [1.0, -1.0, -1.0], [0.0, 0.0]),
    ];

    // Two triangles per face; the pos/neg pairs describe the face normal
    // direction of the front face.
    let indices: [u32; 36] = [
        0, 2, 1, 0, 3, 2, // -Z
        1, 5, 4, 1, 2, 5, // +X
        4, 6, 7, 4, 5, 6, // +Z
        7, 3, 0, 7, 6, 3, // -X
        9, 5, 2, 9, 8, 5, // +Y
        0, 11, 10, 0, 10, 7, // -Y
    ];

    let mut part = MeshPart::new();
    part.vertices = raw
        .iter()
        .map(|&(p, n, uv)| {
            Vertex::new(
                (Vec3::from(p) - Vec3::splat(0.5)) * size,
                Vec3::from(n).normalize(),
                Vec2::from(uv),
            )
        })
        .collect();
    part.indices = indices.to_vec();
    part.recalculate_bounding_box();
    part
}

fn per_face_part(face: usize, size: Vec3) -> MeshPart {
    // Four corners of each face in the unit cube, CCW from the outside.
    let (corners, normal): ([[f32; 3]; 4], [f32; 3]) = match face {
        0 => (
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            [0.0, 0.0, -1.0],
        ),
        1 => (
            [[1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0]],
            [1.0, 0.0, 0.0],
        ),
        2 => (
            [[1.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0]],
            [0.0, 0.0, 1.0],
        ),
        3 => (
            [[0.0, 0.0, 1.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0, 1.0]],
            [-1.0, 0.0, 0.0],
        ),
        4 => (
            [[0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]],
            [0.0, 1.0, 0.0],
        ),
        _ => (
            [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0]],
            [0.0, -1.0, 0.0],
        ),
    };

    let uvs: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

    let mut part = MeshPart::new();
    part.vertices = corners
        .iter()
        .zip(uvs)
        .map(|(&p, uv)| {
            Vertex::new(
                (Vec3::from(p) - Vec3::splat(0.5)) * size,
                Vec3::from(normal),
                Vec2::from(uv),
            )
        })
        .collect();
    part.indices = vec![0, 2, 1, 0, 3, 2];
    part.recalculate_bounding_box();
    part
}
