//! Axis extraction tests
//!
//! Tests for:
//! - AxisSpec::from_bounds: dominant extent, tie-breaking, margin range
//! - clamp / decompose / compose
//! - SlideState offset capture
//! - extract_axis error paths

use glam::Vec3;
use marionette::core::{BoundingBox, RigError};
use marionette::rig::{AxisSpec, DEFAULT_MARGIN, SlideState, extract_axis};
use marionette::scene::{Geometry, Mesh, Scene};

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn bounds(min: [f32; 3], max: [f32; 3]) -> BoundingBox {
    BoundingBox::new(Vec3::from(min), Vec3::from(max))
}

// ============================================================================
// AxisSpec
// ============================================================================

#[test]
fn axis_follows_dominant_horizontal_extent() {
    let along_x = AxisSpec::from_bounds(&bounds([0.0, 0.0, 0.0], [6.0, 1.0, 1.0]), DEFAULT_MARGIN);
    assert_eq!(along_x.direction(), Vec3::X);
    assert!(approx_eq(along_x.length(), 6.0));

    let along_z = AxisSpec::from_bounds(&bounds([0.0, 0.0, -4.0], [1.0, 1.0, 4.0]), DEFAULT_MARGIN);
    assert_eq!(along_z.direction(), Vec3::Z);
    assert!(approx_eq(along_z.length(), 8.0));
}

#[test]
fn axis_ignores_vertical_extent() {
    let tall = AxisSpec::from_bounds(&bounds([0.0, 0.0, 0.0], [1.0, 50.0, 2.0]), DEFAULT_MARGIN);
    assert_eq!(tall.direction(), Vec3::Z);
    assert!(approx_eq(tall.length(), 2.0));
}

#[test]
fn axis_tie_prefers_x() {
    let cube = AxisSpec::from_bounds(&bounds([-1.0, -1.0, -1.0], [1.0, 1.0, 1.0]), DEFAULT_MARGIN);
    assert_eq!(cube.direction(), Vec3::X);
}

#[test]
fn axis_origin_and_tip_span_the_box() {
    let axis = AxisSpec::from_bounds(&bounds([-1.0, 4.0, -0.5], [5.0, 4.4, 0.5]), 0.15);
    assert!(axis.origin().abs_diff_eq(Vec3::new(-1.0, 4.2, 0.0), EPSILON));
    assert!(axis.tip().abs_diff_eq(Vec3::new(5.0, 4.2, 0.0), EPSILON));
}

#[test]
fn axis_range_respects_margin_for_any_length() {
    let margin = 0.15;
    for i in 0..=40 {
        let length = i as f32 * 0.05;
        let axis = AxisSpec::from_bounds(&bounds([0.0, 0.0, 0.0], [length, 0.1, 0.01]), margin);

        assert!(approx_eq(axis.min(), margin), "min at length {length}");
        assert!(approx_eq(axis.max(), margin.max(length - margin)), "max at length {length}");
        assert!(axis.min() <= axis.max());
    }
}

#[test]
fn axis_short_extent_collapses_to_point() {
    let axis = AxisSpec::from_bounds(&bounds([0.0, 0.0, 0.0], [0.2, 1.0, 0.1]), 0.15);
    assert!(approx_eq(axis.min(), 0.15));
    assert!(approx_eq(axis.max(), 0.15));
    assert!(approx_eq(axis.clamp(-3.0), 0.15));
    assert!(approx_eq(axis.clamp(3.0), 0.15));
}

#[test]
fn axis_clamp() {
    let axis = AxisSpec::from_bounds(&bounds([0.0, 0.0, 0.0], [6.0, 1.0, 1.0]), 0.15);

    assert!(approx_eq(axis.clamp(3.0), 3.0));
    assert!(approx_eq(axis.clamp(-100.0), 0.15));
    assert!(approx_eq(axis.clamp(100.0), 5.85));
    assert!(approx_eq(axis.clamp(f32::NAN), 0.15));
    assert!(approx_eq(axis.clamp(f32::INFINITY), 5.85));
}

#[test]
fn axis_decompose_splits_scalar_and_residual() {
    let axis = AxisSpec::from_bounds(&bounds([0.0, 0.0, 0.0], [6.0, 2.0, 1.0]), 0.15);
    let point = Vec3::new(2.5, 3.0, -1.0);

    let (s, offset) = axis.decompose(point);

    assert!(approx_eq(s, 2.5));
    assert!(approx_eq(offset.dot(axis.direction()), 0.0));
    assert!(axis.compose(s, offset).abs_diff_eq(point, EPSILON));
}

// ============================================================================
// SlideState
// ============================================================================

#[test]
fn slide_state_keeps_offset_while_scalar_moves() {
    let axis = AxisSpec::from_bounds(&bounds([0.0, 0.0, 0.0], [6.0, 1.0, 1.0]), 0.15);
    let mut slide = SlideState::capture(&axis, Vec3::new(2.0, -1.0, 0.3));
    let offset = slide.offset();

    for s in [-10.0, 0.5, 4.0, 99.0, 1.0] {
        slide.set_scalar(&axis, s);
        let position = slide.position(&axis);
        assert_eq!(slide.offset(), offset);
        assert!(approx_eq(position.y, offset.y + axis.origin().y));
        assert!(approx_eq(position.z, offset.z + axis.origin().z));
    }
    assert!(approx_eq(slide.scalar(), 1.0));
}

#[test]
fn slide_state_capture_clamps() {
    let axis = AxisSpec::from_bounds(&bounds([0.0, 0.0, 0.0], [6.0, 1.0, 1.0]), 0.15);
    let slide = SlideState::capture(&axis, Vec3::new(-2.0, 0.0, 0.0));
    assert!(approx_eq(slide.scalar(), 0.15));
}

// ============================================================================
// extract_axis
// ============================================================================

#[test]
fn extract_axis_reads_local_bounds() {
    let mut scene = Scene::new();
    let beam = scene.add_mesh(
        "Beam",
        Mesh::new(Geometry::from_bounds(Vec3::new(-0.25, 4.0, 1.0), Vec3::new(0.25, 4.4, 7.0))),
    );
    // The node transform does not affect the local axis
    scene.get_node_mut(beam).unwrap().transform.position = Vec3::new(100.0, 0.0, 0.0);

    let axis = extract_axis(&scene, beam, 0.15).unwrap();

    assert_eq!(axis.direction(), Vec3::Z);
    assert!(axis.origin().abs_diff_eq(Vec3::new(0.0, 4.2, 1.0), EPSILON));
    assert!(approx_eq(axis.max(), 5.85));
}

#[test]
fn extract_axis_without_mesh_is_degenerate() {
    let mut scene = Scene::new();
    let group = scene.create_node_with_name("Group");

    let result = extract_axis(&scene, group, 0.15);
    assert!(matches!(result, Err(RigError::DegenerateGeometry(_))));
}

#[test]
fn extract_axis_with_empty_geometry_is_degenerate() {
    let mut scene = Scene::new();
    let empty = scene.add_mesh("Empty", Mesh::new(Geometry::from_positions(Vec::new())));

    let result = extract_axis(&scene, empty, 0.15);
    assert!(matches!(result, Err(RigError::DegenerateGeometry(_))));
}
