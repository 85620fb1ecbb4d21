#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! # Marionette
//!
//! Turns static, skeleton-less meshes into posable rigs. Pivots are derived
//! from geometry, fragments are reparented without visual movement, and a
//! per-frame solver drives forward kinematics or a closed-form yaw + slide
//! inverse kinematics target.
//!
//! ## Crate layout
//!
//! | Crate | Purpose |
//! |-------|---------|
//! | [`marionette_core`] | Errors, bounding boxes, timing |
//! | [`marionette_scene`] | Node arena, transforms, world matrices |
//! | [`marionette_rig`] | Rig building, axis extraction, solver, drivers |
//! | [`marionette_assets`] | JSON scene descriptions and async loading |

pub use marionette_assets as assets;
pub use marionette_core as core;
pub use marionette_rig as rig;
pub use marionette_scene as scene;

pub use marionette_assets::{AssetLoader, AssetReader, FileAssetReader, LoadedAsset, SceneDescription};
pub use marionette_core::{BoundingBox, FrameClock, FrameTick, Result, RigError};
pub use marionette_rig::{
    AxisSpec, Chain, ChainConfig, FrameInput, GaitDriver, KinematicsSolver, Rig, RigBuilder,
    RigConfig, RigState, SlideConfig, SlideJoint, SlideState, Target, TargetCommand,
    TargetController, TargetKey,
};
pub use marionette_scene::{Geometry, Mesh, NameIndex, Node, NodeHandle, Scene, Transform};

pub mod prelude {
    pub use crate::assets::{AssetLoader, FileAssetReader};
    pub use crate::core::{BoundingBox, FrameClock, RigError};
    pub use crate::rig::{
        ChainConfig, FragmentSelector, FrameInput, GaitDriver, KinematicsSolver, PivotPlacement,
        RigBuilder, RigConfig, RigState, SegmentSpec, SlideConfig, TargetCommand,
        TargetController, TargetKey,
    };
    pub use crate::scene::{Geometry, Mesh, Node, NodeHandle, Scene};
    pub use glam::{Affine3A, Quat, Vec3};
}
