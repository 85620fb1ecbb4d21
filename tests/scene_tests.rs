//! Scene Integration Tests
//!
//! Tests for:
//! - Scene: create/remove nodes, attach/detach hierarchy
//! - Node query: names, name index, common ancestors
//! - Spatial queries: world bounds, local/world conversion
//! - World-preserving reparenting

use glam::{Affine3A, Quat, Vec3};
use marionette::core::RigError;
use marionette::rig::reparent_preserving_world_transform;
use marionette::scene::{Geometry, Mesh, NameIndex, Node, NodeHandle, Scene};
use std::f32::consts::FRAC_PI_4;

const EPSILON: f32 = 1e-5;

fn new_scene() -> Scene {
    Scene::new()
}

fn box_mesh(min: Vec3, max: Vec3) -> Mesh {
    Mesh::new(Geometry::from_bounds(min, max))
}

fn posed_node(position: Vec3, rotation: Quat, scale: Vec3) -> Node {
    let mut node = Node::new();
    node.transform.position = position;
    node.transform.rotation = rotation;
    node.transform.scale = scale;
    node
}

// ============================================================================
// Node Creation & Removal
// ============================================================================

#[test]
fn scene_create_node_with_name() {
    let mut scene = new_scene();
    let h = scene.create_node_with_name("Beam");
    assert_eq!(scene.get_name(h), Some("Beam"));
    assert!(scene.root_nodes.contains(&h));
}

#[test]
fn scene_add_to_stale_parent_falls_back_to_root() {
    let mut scene = new_scene();
    let parent = scene.create_node();
    scene.remove_node(parent);

    let h = scene.add_to_parent(Node::new(), parent);
    assert!(scene.root_nodes.contains(&h));
    assert_eq!(scene.get_node(h).unwrap().parent(), None);
}

#[test]
fn scene_remove_node_removes_subtree_and_meshes() {
    let mut scene = new_scene();
    let root = scene.create_node();
    let a = scene.add_mesh_to_parent("a", box_mesh(Vec3::ZERO, Vec3::ONE), root);
    let b = scene.add_mesh_to_parent("b", box_mesh(Vec3::ZERO, Vec3::ONE), a);

    scene.remove_node(a);

    assert!(scene.get_node(a).is_none());
    assert!(scene.get_node(b).is_none());
    assert!(scene.get_name(b).is_none());
    assert!(scene.meshes.is_empty());
    assert!(scene.get_node(root).unwrap().children().is_empty());
}

// ============================================================================
// Hierarchy: Attach / Detach
// ============================================================================

#[test]
fn scene_attach_moves_between_parents() {
    let mut scene = new_scene();
    let p1 = scene.create_node();
    let p2 = scene.create_node();
    let child = scene.add_to_parent(Node::new(), p1);

    scene.attach(child, p2).unwrap();

    assert!(scene.get_node(p1).unwrap().children().is_empty());
    assert_eq!(scene.get_node(p2).unwrap().children(), &[child]);
    assert_eq!(scene.get_node(child).unwrap().parent(), Some(p2));
}

#[test]
fn scene_attach_rejects_cycles() {
    let mut scene = new_scene();
    let a = scene.create_node();
    let b = scene.add_to_parent(Node::new(), a);
    let c = scene.add_to_parent(Node::new(), b);

    assert!(matches!(scene.attach(a, c), Err(RigError::InvalidHierarchy(_))));
    assert!(matches!(scene.attach(a, a), Err(RigError::InvalidHierarchy(_))));
    // Unchanged
    assert_eq!(scene.get_node(b).unwrap().parent(), Some(a));
    assert!(scene.root_nodes.contains(&a));
}

#[test]
fn scene_detach_makes_root() {
    let mut scene = new_scene();
    let parent = scene.create_node();
    let child = scene.add_to_parent(Node::new(), parent);

    scene.detach(child);

    assert!(scene.root_nodes.contains(&child));
    assert_eq!(scene.get_node(child).unwrap().parent(), None);
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn scene_traverse_is_pre_order() {
    let mut scene = new_scene();
    let root = scene.create_node_with_name("root");
    let a = scene.add_mesh_to_parent("a", box_mesh(Vec3::ZERO, Vec3::ONE), root);
    let a1 = scene.add_mesh_to_parent("a1", box_mesh(Vec3::ZERO, Vec3::ONE), a);
    let b = scene.add_mesh_to_parent("b", box_mesh(Vec3::ZERO, Vec3::ONE), root);

    assert_eq!(scene.traverse(root), vec![root, a, a1, b]);
    assert_eq!(scene.find_node_by_name(root, "a1"), Some(a1));
    assert_eq!(scene.find_node_by_name(a1, "b"), None);
}

#[test]
fn name_index_first_occurrence_wins() {
    let mut scene = new_scene();
    let root = scene.create_node_with_name("root");
    let first = scene.add_to_parent(Node::new(), root);
    scene.set_name(first, "dup");
    let second = scene.add_to_parent(Node::new(), root);
    scene.set_name(second, "dup");

    let index = NameIndex::build(&scene, root);

    assert_eq!(index.get("dup").unwrap(), first);
    assert!(index.contains("root"));
    assert!(matches!(index.get("missing"), Err(RigError::NodeNotFound(name)) if name == "missing"));
}

#[test]
fn scene_common_ancestor() {
    let mut scene = new_scene();
    let root = scene.create_node();
    let arm = scene.add_to_parent(Node::new(), root);
    let a = scene.add_to_parent(Node::new(), arm);
    let b = scene.add_to_parent(Node::new(), arm);
    let c = scene.add_to_parent(Node::new(), root);

    assert_eq!(scene.common_ancestor(&[a, b]), Some(arm));
    assert_eq!(scene.common_ancestor(&[a, c]), Some(root));
    assert_eq!(scene.common_ancestor(&[a]), Some(a));
    assert_eq!(scene.common_ancestor(&[]), None);

    let other = scene.create_node();
    assert_eq!(scene.common_ancestor(&[a, other]), None);
}

// ============================================================================
// Spatial Queries
// ============================================================================

#[test]
fn scene_world_bounds_of_subtree() {
    let mut scene = new_scene();
    let root = scene.add_node(posed_node(Vec3::new(10.0, 0.0, 0.0), Quat::IDENTITY, Vec3::ONE));
    scene.add_mesh_to_parent("a", box_mesh(Vec3::ZERO, Vec3::ONE), root);
    let b = scene.add_node(posed_node(Vec3::new(0.0, 5.0, 0.0), Quat::IDENTITY, Vec3::splat(2.0)));
    scene.attach(b, root).unwrap();
    scene.set_name(b, "b");
    scene.nodes[b].mesh = Some(scene.meshes.insert(box_mesh(Vec3::ZERO, Vec3::ONE)));

    let bounds = scene.world_bounds(root).unwrap();
    assert!(bounds.min.abs_diff_eq(Vec3::new(10.0, 0.0, 0.0), EPSILON));
    assert!(bounds.max.abs_diff_eq(Vec3::new(12.0, 7.0, 2.0), EPSILON));

    let empty = scene.create_node();
    assert!(scene.world_bounds(empty).is_none());
}

#[test]
fn scene_world_local_round_trip() {
    let mut scene = new_scene();
    let h = scene.add_node(posed_node(
        Vec3::new(1.0, 2.0, 3.0),
        Quat::from_rotation_y(0.7),
        Vec3::splat(1.5),
    ));

    let p = Vec3::new(-4.0, 0.5, 9.0);
    let local = scene.world_to_local(h, p).unwrap();
    assert!(scene.local_to_world(h, local).unwrap().abs_diff_eq(p, 1e-4));
}

// ============================================================================
// World-Preserving Reparent
// ============================================================================

fn assert_world_preserved(scene: &Scene, node: NodeHandle, before: Affine3A) {
    let after = scene.compute_world_matrix(node).unwrap();
    assert!(
        after.abs_diff_eq(before, 1e-4),
        "world matrix moved:\n before {before:?}\n after  {after:?}"
    );
}

#[test]
fn reparent_preserves_world_under_rotated_scaled_parent() {
    let mut scene = new_scene();
    let node = scene.add_node(posed_node(
        Vec3::new(1.0, 2.0, 3.0),
        Quat::from_rotation_y(0.5),
        Vec3::splat(2.0),
    ));
    let parent = scene.add_node(posed_node(
        Vec3::new(-1.0, 0.0, 4.0),
        Quat::from_rotation_x(FRAC_PI_4),
        Vec3::splat(0.5),
    ));
    let before = scene.compute_world_matrix(node).unwrap();

    reparent_preserving_world_transform(&mut scene, node, parent).unwrap();

    assert_eq!(scene.get_node(node).unwrap().parent(), Some(parent));
    assert_world_preserved(&scene, node, before);
}

#[test]
fn reparent_preserves_world_from_nested_parent() {
    let mut scene = new_scene();
    let grand = scene.add_node(posed_node(Vec3::new(0.0, 3.0, 0.0), Quat::from_rotation_z(0.3), Vec3::ONE));
    let old_parent = scene.add_to_parent(
        posed_node(Vec3::new(2.0, 0.0, 0.0), Quat::from_rotation_y(1.1), Vec3::splat(3.0)),
        grand,
    );
    let node = scene.add_to_parent(
        posed_node(Vec3::new(0.0, 0.0, 1.0), Quat::from_rotation_x(-0.4), Vec3::ONE),
        old_parent,
    );
    let new_parent = scene.add_node(posed_node(Vec3::new(5.0, -1.0, 2.0), Quat::from_rotation_y(-2.0), Vec3::ONE));

    // Stale caches must not matter
    let before = scene.compute_world_matrix(node).unwrap();
    reparent_preserving_world_transform(&mut scene, node, new_parent).unwrap();
    assert_world_preserved(&scene, node, before);

    // And back again
    reparent_preserving_world_transform(&mut scene, node, old_parent).unwrap();
    assert_world_preserved(&scene, node, before);

    scene.update_matrix_world();
    assert!(scene.get_node(node).unwrap().world_matrix().abs_diff_eq(before, 1e-4));
}

#[test]
fn reparent_into_descendant_is_rejected() {
    let mut scene = new_scene();
    let a = scene.create_node();
    let b = scene.add_to_parent(Node::new(), a);

    let result = reparent_preserving_world_transform(&mut scene, a, b);
    assert!(matches!(result, Err(RigError::InvalidHierarchy(_))));
    assert_eq!(scene.get_node(b).unwrap().parent(), Some(a));
}
