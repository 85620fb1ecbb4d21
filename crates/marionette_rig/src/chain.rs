use glam::Vec3;
use marionette_scene::NodeHandle;

use crate::axis::{AxisSpec, SlideState};

/// A pivot with a fixed local rotation axis and the fragments it carries.
#[derive(Debug, Clone)]
pub struct Joint {
    name: String,
    pivot: NodeHandle,
    axis: Vec3,
    fragments: Vec<NodeHandle>,
}

impl Joint {
    pub(crate) fn new(name: String, pivot: NodeHandle, axis: Vec3, fragments: Vec<NodeHandle>) -> Self {
        Self {
            name,
            pivot,
            axis,
            fragments,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn pivot(&self) -> NodeHandle {
        self.pivot
    }

    /// Unit rotation axis in the pivot's parent space.
    #[must_use]
    pub fn axis(&self) -> Vec3 {
        self.axis
    }

    #[must_use]
    pub fn fragments(&self) -> &[NodeHandle] {
        &self.fragments
    }
}

/// Pivots ordered from proximal to distal, each nested under the previous one.
#[derive(Debug, Clone)]
pub struct Chain {
    name: String,
    joints: Vec<Joint>,
}

impl Chain {
    pub(crate) fn new(name: String, joints: Vec<Joint>) -> Self {
        Self { name, joints }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    #[must_use]
    pub fn joint(&self, name: &str) -> Option<&Joint> {
        self.joints.iter().find(|j| j.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }
}

/// A sliding assembly on a yawing base.
///
/// `base` yaws toward the target; `reference` is the mesh the axis was
/// derived from and moves with the base; `assembly` is parented under
/// `reference` and translates along the axis.
#[derive(Debug, Clone)]
pub struct SlideJoint {
    name: String,
    base: NodeHandle,
    reference: NodeHandle,
    assembly: NodeHandle,
    axis: AxisSpec,
    pub(crate) slide: SlideState,
}

impl SlideJoint {
    pub(crate) fn new(
        name: String,
        base: NodeHandle,
        reference: NodeHandle,
        assembly: NodeHandle,
        axis: AxisSpec,
        slide: SlideState,
    ) -> Self {
        Self {
            name,
            base,
            reference,
            assembly,
            axis,
            slide,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn base(&self) -> NodeHandle {
        self.base
    }

    #[must_use]
    pub fn reference(&self) -> NodeHandle {
        self.reference
    }

    #[must_use]
    pub fn assembly(&self) -> NodeHandle {
        self.assembly
    }

    #[must_use]
    pub fn axis(&self) -> &AxisSpec {
        &self.axis
    }

    #[must_use]
    pub fn slide(&self) -> &SlideState {
        &self.slide
    }
}
