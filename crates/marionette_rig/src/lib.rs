//! Kinematic rigs over static meshes.
//!
//! - [`builder`]: locate fragments, create pivots, reparent without moving
//! - [`axis`]: derive a bounded sliding axis from mesh bounds
//! - [`solver`]: per-frame FK and closed-form yaw + slide IK
//! - [`state`]: the [`RigState`] value threaded through every frame
//! - [`config`], [`driver`], [`input`]: data-driven setup and external drivers

pub mod axis;
pub mod builder;
pub mod chain;
pub mod config;
pub mod driver;
pub mod input;
pub mod solver;
pub mod state;

pub use axis::{AxisSpec, SlideState, extract_axis};
pub use builder::{
    RigBuilder, compute_anchor, compute_bounds_anchor, reparent_preserving_world_transform,
};
pub use chain::{Chain, Joint, SlideJoint};
pub use config::{
    BoundsSource, ChainConfig, DEFAULT_MARGIN, Edge, FragmentSelector, GaitConfig, InputConfig,
    PivotPlacement, Requirement, RigConfig, SegmentSpec, SlideConfig,
};
pub use driver::GaitDriver;
pub use input::{TargetController, TargetKey};
pub use solver::{KinematicsSolver, SlideSolution};
pub use state::{FrameInput, JointAngles, Rig, RigState, Target, TargetCommand};
