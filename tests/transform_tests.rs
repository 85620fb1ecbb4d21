//! Transform and TransformSystem tests
//!
//! Tests for:
//! - Transform TRS operations and dirty checking
//! - Axis-angle rotation
//! - apply_local_matrix decomposition
//! - Hierarchical matrix propagation (full pass and subtree)
//! - Fresh world matrices vs cached ones

use glam::{Affine3A, Quat, Vec3};
use marionette::scene::transform::Transform;
use marionette::scene::{Node, Scene};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    a.abs_diff_eq(b, EPSILON)
}

// ============================================================================
// Transform Unit Tests
// ============================================================================

#[test]
fn transform_default_is_identity() {
    let t = Transform::new();
    assert_eq!(t.position, Vec3::ZERO);
    assert_eq!(t.rotation, Quat::IDENTITY);
    assert_eq!(t.scale, Vec3::ONE);
    assert_eq!(*t.local_matrix(), Affine3A::IDENTITY);
}

#[test]
fn transform_update_local_matrix_dirty_check() {
    let mut t = Transform::new();

    // First call always rebuilds
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());

    t.position = Vec3::new(1.0, 2.0, 3.0);
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());

    t.mark_dirty();
    assert!(t.update_local_matrix());
}

#[test]
fn transform_axis_angle_about_fixed_axis() {
    let mut t = Transform::new();
    t.set_axis_angle(Vec3::X, FRAC_PI_2);

    let rotated = t.rotation * Vec3::Y;
    assert!(vec3_approx(rotated, Vec3::Z));

    t.set_axis_angle(Vec3::X, 0.0);
    assert!(t.rotation.abs_diff_eq(Quat::IDENTITY, EPSILON));
}

#[test]
fn transform_rotation_euler_round_trip() {
    let mut t = Transform::new();
    t.set_rotation_euler(0.3, -0.2, 0.1);
    let euler = t.rotation_euler();
    assert!(vec3_approx(euler, Vec3::new(0.3, -0.2, 0.1)));
}

#[test]
fn transform_apply_local_matrix_decomposes_trs() {
    let mut t = Transform::new();
    let mat = Affine3A::from_scale_rotation_translation(
        Vec3::splat(2.0),
        Quat::from_rotation_y(FRAC_PI_4),
        Vec3::new(4.0, 5.0, 6.0),
    );

    t.apply_local_matrix(mat);

    assert!(vec3_approx(t.position, Vec3::new(4.0, 5.0, 6.0)));
    assert!(vec3_approx(t.scale, Vec3::splat(2.0)));
    assert!(t.rotation.abs_diff_eq(Quat::from_rotation_y(FRAC_PI_4), EPSILON));
    assert!(t.compose().abs_diff_eq(mat, EPSILON));
    // The next pass must pick the new matrix up
    assert!(t.update_local_matrix());
}

// ============================================================================
// Hierarchy Propagation
// ============================================================================

fn two_level_scene() -> (Scene, marionette::NodeHandle, marionette::NodeHandle) {
    let mut scene = Scene::new();
    let parent = scene.create_node_with_name("parent");
    scene.get_node_mut(parent).unwrap().transform.position = Vec3::new(1.0, 0.0, 0.0);

    let mut child = Node::new();
    child.transform.position = Vec3::new(0.0, 2.0, 0.0);
    let child = scene.add_to_parent(child, parent);
    (scene, parent, child)
}

#[test]
fn update_matrix_world_propagates_to_children() {
    let (mut scene, parent, child) = two_level_scene();
    scene.update_matrix_world();

    let world = scene.get_node(child).unwrap().world_matrix();
    assert!(vec3_approx(world.translation.into(), Vec3::new(1.0, 2.0, 0.0)));

    scene.get_node_mut(parent).unwrap().transform.rotation = Quat::from_rotation_z(FRAC_PI_2);
    scene.update_matrix_world();

    let world = scene.get_node(child).unwrap().world_matrix();
    assert!(vec3_approx(world.translation.into(), Vec3::new(-1.0, 0.0, 0.0)));
}

#[test]
fn update_subtree_uses_parent_cache() {
    let (mut scene, parent, child) = two_level_scene();
    scene.update_matrix_world();

    scene.get_node_mut(child).unwrap().transform.position = Vec3::new(0.0, 3.0, 0.0);
    scene.update_subtree(child);

    let world = scene.get_node(child).unwrap().world_matrix();
    assert!(vec3_approx(world.translation.into(), Vec3::new(1.0, 3.0, 0.0)));
    assert!(vec3_approx(
        scene.get_node(parent).unwrap().world_matrix().translation.into(),
        Vec3::new(1.0, 0.0, 0.0)
    ));
}

#[test]
fn compute_world_matrix_ignores_stale_cache() {
    let (mut scene, parent, child) = two_level_scene();
    scene.update_matrix_world();

    scene.get_node_mut(parent).unwrap().transform.position = Vec3::new(5.0, 0.0, 0.0);

    // Cache is stale until the next pass; the composed matrix is not
    let cached: Vec3 = scene.get_node(child).unwrap().world_matrix().translation.into();
    assert!(vec3_approx(cached, Vec3::new(1.0, 2.0, 0.0)));
    assert!(vec3_approx(
        scene.world_position(child).unwrap(),
        Vec3::new(5.0, 2.0, 0.0)
    ));
}

#[test]
fn deep_hierarchy_does_not_overflow() {
    let mut scene = Scene::new();
    let mut parent = scene.create_node();
    for _ in 0..10_000 {
        let mut node = Node::new();
        node.transform.position = Vec3::new(0.0, 0.001, 0.0);
        parent = scene.add_to_parent(node, parent);
    }

    scene.update_matrix_world();

    let y = scene.get_node(parent).unwrap().world_matrix().translation.y;
    assert!((y - 10.0).abs() < 1e-2);
}
