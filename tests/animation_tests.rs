//! Animated mesh node tests
//!
//! Tests for:
//! - Frame cursor advance through the frame pipeline (wrap and clamp)
//! - End-of-animation callback firing exactly once per crossing
//! - Bounding boxes tracking the resolved frame
//! - Per-pass sub-mesh filtering of mixed-material animated nodes

mod common;

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use glam::{Vec3, Vec4};

use arbor::scene::{CullingMode, NodeKind};
use arbor::{
    AnimatedMesh, Camera, CubeMeshVariant, MaterialType, NodeKey, NullBackend, SceneGraph,
    Transform, create_cube_mesh,
};
use common::TraceBackend;

/// Eleven frames; frame `i` is a cube of edge length `i + 1`.
fn growing_clip() -> Arc<AnimatedMesh> {
    let mut clip = AnimatedMesh::new("growing");
    for i in 0..=10u32 {
        clip.add_frame(create_cube_mesh(
            Vec3::splat((i + 1) as f32),
            CubeMeshVariant::SharedVertices,
        ));
    }
    Arc::new(clip)
}

fn animated_scene() -> (SceneGraph, NodeKey) {
    let mut graph = SceneGraph::new();
    let key = graph.add_animated_mesh_node(growing_clip(), None, 1, Transform::default());
    with_state(&mut graph, key, |state| {
        state.set_speed_fps(1000.0); // one frame per millisecond
    });
    (graph, key)
}

fn with_state<R>(
    graph: &mut SceneGraph,
    key: NodeKey,
    f: impl FnOnce(&mut arbor::scene::AnimatedMeshState) -> R,
) -> R {
    match &mut graph.get_node_mut(key).unwrap().kind {
        NodeKind::AnimatedMesh(state) => f(state),
        _ => panic!("expected an animated mesh node"),
    }
}

fn current_frame(graph: &SceneGraph, key: NodeKey) -> f32 {
    match &graph.get_node(key).unwrap().kind {
        NodeKind::AnimatedMesh(state) => state.current_frame(),
        _ => panic!("expected an animated mesh node"),
    }
}

// ============================================================================
// Cursor Advance Through the Frame Pipeline
// ============================================================================

#[test]
fn cursor_wraps_when_looping() {
    let (mut graph, key) = animated_scene();

    // First frame establishes the time base; 15ms over a 10-frame loop
    // wraps to frame 5.
    graph.draw_all(&mut NullBackend::new(), 0);
    graph.draw_all(&mut NullBackend::new(), 15);

    assert!((current_frame(&graph, key) - 5.0).abs() < 1e-4);
}

#[test]
fn cursor_clamps_when_not_looping() {
    let (mut graph, key) = animated_scene();
    with_state(&mut graph, key, |state| state.set_looping(false));

    graph.draw_all(&mut NullBackend::new(), 0);
    graph.draw_all(&mut NullBackend::new(), 15);

    assert!((current_frame(&graph, key) - 10.0).abs() < 1e-4);
}

#[test]
fn end_callback_fires_exactly_once_per_crossing() {
    let (mut graph, key) = animated_scene();
    let fired = Rc::new(Cell::new(0u32));
    let fired_inner = fired.clone();
    with_state(&mut graph, key, |state| {
        state.set_looping(false);
        state.on_animation_end(Box::new(move |_| fired_inner.set(fired_inner.get() + 1)));
    });

    graph.draw_all(&mut NullBackend::new(), 0);
    graph.draw_all(&mut NullBackend::new(), 15);
    assert_eq!(fired.get(), 1);

    // Further frames at the clamp do not re-fire.
    graph.draw_all(&mut NullBackend::new(), 30);
    graph.draw_all(&mut NullBackend::new(), 45);
    assert_eq!(fired.get(), 1);

    // Rewinding externally re-arms the notification.
    with_state(&mut graph, key, |state| state.set_current_frame(1.0));
    graph.draw_all(&mut NullBackend::new(), 60);
    assert_eq!(fired.get(), 2);
}

#[test]
fn elapsed_zero_leaves_cursor_unchanged() {
    let (mut graph, key) = animated_scene();

    graph.draw_all(&mut NullBackend::new(), 7);
    let before = current_frame(&graph, key);
    graph.draw_all(&mut NullBackend::new(), 7);

    assert!((current_frame(&graph, key) - before).abs() < f32::EPSILON);
}

// ============================================================================
// Bounding Boxes Track the Resolved Frame
// ============================================================================

#[test]
fn bounding_box_follows_current_frame() {
    let (mut graph, key) = animated_scene();

    graph.draw_all(&mut NullBackend::new(), 0);
    graph.draw_all(&mut NullBackend::new(), 15);

    // Frame 5 is a cube of edge 6.
    let bbox = *graph.get_node(key).unwrap().bounding_box();
    assert!((bbox.max - Vec3::splat(3.0)).length() < 1e-4);
    assert!((bbox.min - Vec3::splat(-3.0)).length() < 1e-4);
}

// ============================================================================
// Per-Pass Sub-Mesh Filtering
// ============================================================================

#[test]
fn animated_node_draws_matching_subset_per_pass() {
    let mut graph = SceneGraph::new();
    graph.add_camera_node(
        Camera::new_perspective(60.0, 1.0, 0.1, 1000.0),
        None,
        1,
        Transform::default(),
        true,
    );

    // One frame, six parts; one part transparent.
    let mut frame = create_cube_mesh(Vec3::splat(2.0), CubeMeshVariant::PerFaceNormals);
    frame.parts[0].material.material_type = MaterialType::TransparentAlphaChannel;
    let mut clip = AnimatedMesh::new("mixed");
    clip.add_frame(frame);

    let mut t = Transform::default();
    t.position = Vec3::new(0.0, 0.0, -5.0);
    let key = graph.add_animated_mesh_node(Arc::new(clip), None, 2, t);
    {
        let node = graph.get_node_mut(key).unwrap();
        node.culling = CullingMode::empty();
        for material in node.materials.iter_mut() {
            material.diffuse_color = Vec4::new(1.0, 0.0, 0.0, 1.0);
        }
        node.materials[0].diffuse_color = Vec4::new(0.0, 1.0, 0.0, 1.0);
    }

    let mut backend = TraceBackend::new();
    graph.draw_all(&mut backend, 0);

    let draws = backend.draw_colors();
    assert_eq!(draws.len(), 6, "each part draws exactly once per frame");
    assert_eq!(
        draws.iter().filter(|c| **c == Vec4::new(1.0, 0.0, 0.0, 1.0)).count(),
        5
    );
    // The transparent part comes last, in the Transparent pass.
    assert_eq!(*draws.last().unwrap(), Vec4::new(0.0, 1.0, 0.0, 1.0));
}

#[test]
fn animated_node_without_frames_renders_nothing() {
    let mut graph = SceneGraph::new();
    let key = graph.add_animated_mesh_node(
        Arc::new(AnimatedMesh::new("empty")),
        None,
        1,
        Transform::default(),
    );
    graph.get_node_mut(key).unwrap().culling = CullingMode::empty();

    let mut backend = TraceBackend::new();
    graph.draw_all(&mut backend, 0);

    assert_eq!(backend.count_draws(), 0);
}
