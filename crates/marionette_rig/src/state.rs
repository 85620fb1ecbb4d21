use glam::Vec3;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::chain::{Chain, SlideJoint};

/// Joint angles for one chain, proximal first, in radians.
pub type JointAngles = SmallVec<[f32; 4]>;

/// A built rig and the pose mode selected for it.
#[derive(Debug, Clone)]
pub enum Rig {
    /// Forward kinematics: one externally supplied angle per pivot.
    Angle(Chain),
    /// Yaw + slide inverse kinematics toward the shared target.
    Slide(SlideJoint),
}

impl Rig {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Rig::Angle(chain) => chain.name(),
            Rig::Slide(joint) => joint.name(),
        }
    }
}

/// Edits applied to the [`Target`] at the start of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetCommand {
    Nudge(Vec3),
    MoveTo(Vec3),
    Reset,
}

/// The world-space point inverse-kinematic rigs try to reach.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    position: Vec3,
    home: Vec3,
}

impl Target {
    #[must_use]
    pub fn new(home: Vec3) -> Self {
        Self { position: home, home }
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn home(&self) -> Vec3 {
        self.home
    }

    pub fn apply(&mut self, command: TargetCommand) {
        match command {
            TargetCommand::Nudge(delta) => self.position += delta,
            TargetCommand::MoveTo(position) => self.position = position,
            TargetCommand::Reset => self.position = self.home,
        }
    }
}

/// All rig state owned by a scene controller.
///
/// Passed by value through [`crate::KinematicsSolver::update`]; nothing about
/// the rigs lives outside this value and the scene graph itself.
#[derive(Debug, Clone)]
pub struct RigState {
    pub rigs: Vec<Rig>,
    pub target: Target,
    /// Seconds accumulated over all solved frames.
    pub elapsed: f32,
    pub frame: u64,
}

impl RigState {
    #[must_use]
    pub fn new(target: Target) -> Self {
        Self {
            rigs: Vec::new(),
            target,
            elapsed: 0.0,
            frame: 0,
        }
    }

    #[must_use]
    pub fn with_rig(mut self, rig: Rig) -> Self {
        self.rigs.push(rig);
        self
    }

    #[must_use]
    pub fn chain(&self, name: &str) -> Option<&Chain> {
        self.rigs.iter().find_map(|rig| match rig {
            Rig::Angle(chain) if chain.name() == name => Some(chain),
            _ => None,
        })
    }

    #[must_use]
    pub fn slide(&self, name: &str) -> Option<&SlideJoint> {
        self.rigs.iter().find_map(|rig| match rig {
            Rig::Slide(joint) if joint.name() == name => Some(joint),
            _ => None,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rigs.is_empty()
    }
}

impl Default for RigState {
    fn default() -> Self {
        Self::new(Target::new(Vec3::ZERO))
    }
}

/// External input for a single frame.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Angles per chain name.
    pub joint_angles: FxHashMap<String, JointAngles>,
    pub target_commands: SmallVec<[TargetCommand; 4]>,
}

impl FrameInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_angles(mut self, chain: &str, angles: impl IntoIterator<Item = f32>) -> Self {
        self.joint_angles
            .insert(chain.to_string(), angles.into_iter().collect());
        self
    }

    #[must_use]
    pub fn with_command(mut self, command: TargetCommand) -> Self {
        self.target_commands.push(command);
        self
    }
}
