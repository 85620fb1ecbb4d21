//! Per-frame pose solving
//!
//! Two modes, chosen per rig when it is built:
//!
//! - **Angle-driven FK**: each pivot is set to an externally supplied angle
//!   about its fixed axis. The parent chain composes them.
//! - **Yaw + slide IK**: the base yaws toward the target, then the assembly
//!   slides along its bounded axis to the target's projection. Closed form,
//!   no iteration; out-of-range targets park at the nearest end.
//!
//! Rigs whose nodes have disappeared are skipped for the frame.

use glam::Vec3;
use log::{debug, trace};
use marionette_scene::Scene;

use crate::chain::{Chain, SlideJoint};
use crate::state::{FrameInput, Rig, RigState};

/// Horizontal distances below this leave the current yaw untouched.
const YAW_EPSILON: f32 = 1e-6;

/// Result of one yaw + slide solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideSolution {
    /// Base rotation about +Y, in radians. `None` if the target was straight
    /// above or below the base.
    pub yaw: Option<f32>,
    /// Clamped position along the axis.
    pub scalar: f32,
}

/// Frame-step pose solver.
pub struct KinematicsSolver;

impl KinematicsSolver {
    /// Advances `state` by one frame and writes the resulting pose into `scene`.
    ///
    /// Target commands apply first, then every rig is posed, then world
    /// matrices are refreshed for the renderer.
    pub fn update(scene: &mut Scene, mut state: RigState, dt: f32, input: &FrameInput) -> RigState {
        state.elapsed += dt;
        state.frame += 1;

        for &command in &input.target_commands {
            state.target.apply(command);
        }
        let target = state.target.position();

        for rig in &mut state.rigs {
            match rig {
                Rig::Angle(chain) => {
                    if let Some(angles) = input.joint_angles.get(chain.name()) {
                        Self::apply_angles(scene, chain, angles);
                    }
                }
                Rig::Slide(joint) => {
                    Self::solve_slide(scene, joint, target);
                }
            }
        }

        scene.update_matrix_world();
        state
    }

    /// Sets each pivot's local rotation to its angle about its fixed axis.
    ///
    /// Extra angles are ignored; pivots without an angle keep their pose.
    /// Returns the number of pivots posed.
    pub fn apply_angles(scene: &mut Scene, chain: &Chain, angles: &[f32]) -> usize {
        if angles.len() != chain.len() {
            debug!(
                "Chain '{}' has {} pivot(s) but received {} angle(s)",
                chain.name(),
                chain.len(),
                angles.len()
            );
        }

        let mut posed = 0;
        for (joint, &angle) in chain.joints().iter().zip(angles) {
            if let Some(node) = scene.get_node_mut(joint.pivot()) {
                node.transform.set_axis_angle(joint.axis(), angle);
                posed += 1;
            }
        }
        posed
    }

    /// Yaw toward a point given in the base's parent space, relative to the
    /// base's own position. `+Z` is forward (yaw 0), `+X` lateral (yaw π/2).
    #[must_use]
    pub fn solve_yaw(local_target: Vec3) -> Option<f32> {
        if local_target.x * local_target.x + local_target.z * local_target.z < YAW_EPSILON * YAW_EPSILON {
            return None;
        }
        Some(local_target.x.atan2(local_target.z))
    }

    /// Closed-form yaw + slide solve toward the world-space `target`.
    ///
    /// Returns `None` without touching the scene if any rig node is missing
    /// or the assembly is no longer parented under its reference.
    pub fn solve_slide(scene: &mut Scene, joint: &mut SlideJoint, target: Vec3) -> Option<SlideSolution> {
        let base_node = scene.get_node(joint.base())?;
        let base_position = base_node.transform.position;
        let assembly_parent = scene.get_node(joint.assembly())?.parent();
        if assembly_parent != Some(joint.reference()) {
            trace!("Slide '{}' skipped: assembly detached from reference", joint.name());
            return None;
        }

        // 1. Yaw the base in its parent's frame, keeping any tilt about X and Z.
        let parent_world = scene.parent_world_matrix(joint.base())?;
        let local_target = parent_world.inverse().transform_point3(target) - base_position;
        let yaw = Self::solve_yaw(local_target);
        if let (Some(yaw), Some(base)) = (yaw, scene.get_node_mut(joint.base())) {
            let euler = base.transform.rotation_euler();
            base.transform.set_rotation_euler(euler.x, yaw, euler.z);
        }

        // 2. The reference moved with the base; read its fresh world matrix.
        let reference_world = scene.compute_world_matrix(joint.reference())?;

        // 3-4. Project into the reference frame and clamp into range.
        let target_in_reference = reference_world.inverse().transform_point3(target);
        let (s, _) = joint.axis().decompose(target_in_reference);
        let axis = *joint.axis();
        joint.slide.set_scalar(&axis, s);

        // 5. Origin + axis * s + the offset captured at build time.
        let position = joint.slide.position(&axis);
        if let Some(assembly) = scene.get_node_mut(joint.assembly()) {
            assembly.transform.position = position;
        }

        trace!(
            "Slide '{}': yaw {:?}, s {:.3} (raw {:.3})",
            joint.name(),
            yaw,
            joint.slide.scalar(),
            s
        );
        Some(SlideSolution {
            yaw,
            scalar: joint.slide.scalar(),
        })
    }
}
