//! Geometry creator and manipulator tests
//!
//! Tests for:
//! - Cube variants: vertex/index/part layout and centered bounds
//! - Normal conventions per variant
//! - Manipulator operations: winding flip, normal recalculation, vertex
//!   colors, scaling, transforms

use glam::{Affine3A, Vec3, Vec4};

use arbor::resources::manipulator;
use arbor::{CubeMeshVariant, create_cube_mesh};

const EPSILON: f32 = 1e-5;

// ============================================================================
// Cube Variants
// ============================================================================

#[test]
fn shared_vertices_cube_layout() {
    let mesh = create_cube_mesh(Vec3::splat(2.0), CubeMeshVariant::SharedVertices);

    assert_eq!(mesh.parts.len(), 1);
    assert_eq!(mesh.parts[0].vertices.len(), 12);
    assert_eq!(mesh.parts[0].indices.len(), 36);
    assert_eq!(mesh.parts[0].triangle_count(), 12);
}

#[test]
fn per_face_cube_layout() {
    let mesh = create_cube_mesh(Vec3::splat(2.0), CubeMeshVariant::PerFaceNormals);

    assert_eq!(mesh.parts.len(), 6);
    for part in &mesh.parts {
        assert_eq!(part.vertices.len(), 4);
        assert_eq!(part.indices.len(), 6);
    }
}

#[test]
fn cube_bounds_are_half_size_for_any_size() {
    for size in [0.1f32, 1.0, 2.5, 10.0, 1234.5] {
        for variant in [CubeMeshVariant::SharedVertices, CubeMeshVariant::PerFaceNormals] {
            let mesh = create_cube_mesh(Vec3::splat(size), variant);
            let half = size / 2.0;
            assert!(
                (mesh.bounding_box.min - Vec3::splat(-half)).length() < EPSILON,
                "min for size {size}"
            );
            assert!(
                (mesh.bounding_box.max - Vec3::splat(half)).length() < EPSILON,
                "max for size {size}"
            );
        }
    }
}

#[test]
fn cube_supports_non_uniform_size() {
    let mesh = create_cube_mesh(Vec3::new(1.0, 2.0, 4.0), CubeMeshVariant::PerFaceNormals);
    assert!((mesh.bounding_box.max - Vec3::new(0.5, 1.0, 2.0)).length() < EPSILON);
}

#[test]
fn shared_vertices_cube_has_normalized_corner_normals() {
    let mesh = create_cube_mesh(Vec3::splat(1.0), CubeMeshVariant::SharedVertices);
    for v in &mesh.parts[0].vertices {
        assert!((v.normal.length() - 1.0).abs() < EPSILON);
        // Averaged corner normals point along the cube diagonals.
        let expected = v.position.signum() / 3f32.sqrt();
        assert!((v.normal - expected).length() < EPSILON);
    }
}

#[test]
fn per_face_cube_has_perpendicular_normals() {
    let mesh = create_cube_mesh(Vec3::splat(1.0), CubeMeshVariant::PerFaceNormals);
    for part in &mesh.parts {
        let normal = part.vertices[0].normal;
        // Axis-aligned unit normal, shared by the whole face.
        assert!((normal.length() - 1.0).abs() < EPSILON);
        assert_eq!(normal.abs().max_element(), 1.0);
        for v in &part.vertices {
            assert_eq!(v.normal, normal);
            // Face vertices lie in the plane the normal points out of.
            assert!((v.position.dot(normal) - 0.5).abs() < EPSILON);
        }
    }
}

#[test]
fn cube_creation_is_deterministic() {
    let a = create_cube_mesh(Vec3::splat(3.0), CubeMeshVariant::SharedVertices);
    let b = create_cube_mesh(Vec3::splat(3.0), CubeMeshVariant::SharedVertices);
    assert_eq!(a.parts[0].vertices, b.parts[0].vertices);
    assert_eq!(a.parts[0].indices, b.parts[0].indices);
}

// ============================================================================
// Mesh Manipulator
// ============================================================================

#[test]
fn flip_winding_reverses_triangles() {
    let mut mesh = create_cube_mesh(Vec3::splat(1.0), CubeMeshVariant::PerFaceNormals);
    let original = mesh.parts[0].indices.clone();

    manipulator::flip_winding(&mut mesh);

    let flipped = &mesh.parts[0].indices;
    for (tri, orig) in flipped.chunks_exact(3).zip(original.chunks_exact(3)) {
        assert_eq!(tri, [orig[2], orig[1], orig[0]]);
    }

    // Flipping twice restores the original winding.
    manipulator::flip_winding(&mut mesh);
    assert_eq!(mesh.parts[0].indices, original);
}

#[test]
fn invert_normals_negates_every_normal() {
    let mut mesh = create_cube_mesh(Vec3::splat(1.0), CubeMeshVariant::PerFaceNormals);
    let before: Vec<Vec3> = mesh.parts[0].vertices.iter().map(|v| v.normal).collect();

    manipulator::invert_normals(&mut mesh);

    for (v, old) in mesh.parts[0].vertices.iter().zip(before) {
        assert_eq!(v.normal, -old);
    }
}

#[test]
fn flat_normal_recalculation_matches_face_normals() {
    let mut mesh = create_cube_mesh(Vec3::splat(1.0), CubeMeshVariant::PerFaceNormals);
    let expected: Vec<Vec3> = mesh.parts.iter().map(|p| p.vertices[0].normal).collect();

    // Scramble, then recalculate.
    for part in &mut mesh.parts {
        for v in &mut part.vertices {
            v.normal = Vec3::ZERO;
        }
    }
    manipulator::recalculate_normals(&mut mesh, false);

    for (part, expected) in mesh.parts.iter().zip(expected) {
        for v in &part.vertices {
            assert!((v.normal - expected).length() < EPSILON);
        }
    }
}

#[test]
fn smooth_normal_recalculation_yields_unit_normals() {
    let mut mesh = create_cube_mesh(Vec3::splat(1.0), CubeMeshVariant::SharedVertices);
    manipulator::recalculate_normals(&mut mesh, true);

    for v in &mesh.parts[0].vertices {
        assert!((v.normal.length() - 1.0).abs() < EPSILON);
    }
}

#[test]
fn set_vertex_colors_applies_everywhere() {
    let mut mesh = create_cube_mesh(Vec3::splat(1.0), CubeMeshVariant::PerFaceNormals);
    let color = Vec4::new(0.2, 0.4, 0.6, 1.0);

    manipulator::set_vertex_colors(&mut mesh, color);

    for part in &mesh.parts {
        for v in &part.vertices {
            assert_eq!(v.color, color);
        }
    }
}

#[test]
fn scale_updates_bounds() {
    let mut mesh = create_cube_mesh(Vec3::splat(2.0), CubeMeshVariant::SharedVertices);
    manipulator::scale(&mut mesh, Vec3::new(2.0, 1.0, 0.5));

    assert!((mesh.bounding_box.max - Vec3::new(2.0, 1.0, 0.5)).length() < EPSILON);
    assert!((mesh.bounding_box.min - Vec3::new(-2.0, -1.0, -0.5)).length() < EPSILON);
}

#[test]
fn transform_moves_positions_and_rotates_normals() {
    let mut mesh = create_cube_mesh(Vec3::splat(2.0), CubeMeshVariant::PerFaceNormals);
    let matrix = Affine3A::from_rotation_y(std::f32::consts::FRAC_PI_2)
        * Affine3A::from_translation(Vec3::new(0.0, 0.0, 0.0));

    manipulator::transform(&mut mesh, &matrix);

    // The +Z face normal now points along +X.
    let has_pos_x_face = mesh
        .parts
        .iter()
        .any(|p| (p.vertices[0].normal - Vec3::X).length() < EPSILON);
    assert!(has_pos_x_face);

    // Bounds stay centered for a pure rotation of a cube.
    assert!((mesh.bounding_box.center() - Vec3::ZERO).length() < EPSILON);
}
