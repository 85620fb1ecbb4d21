//! Rig configuration
//!
//! Describes which mesh fragments form which joints, where pivots go and how
//! the sliding joint is bounded. Everything is plain data with serde support
//! so a rig can ship as JSON next to its asset.
//!
//! ```rust,ignore
//! let config = RigConfig::from_json_str(include_str!("leg.rig.json"))?;
//! let state = RigBuilder::new(&scene, root).build_from_config(&mut scene, &config);
//! ```

use marionette_core::Result;
use serde::{Deserialize, Serialize};

/// Margin kept clear at both ends of a sliding axis.
pub const DEFAULT_MARGIN: f32 = 0.15;

/// Vertical extremity of a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Top,
    Bottom,
}

/// Which fragments a bounds-based placement measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsSource {
    /// The segment's own fragments.
    Own,
    /// The fragments of the preceding segment, e.g. an ankle placed at the
    /// bottom of the calf.
    Previous,
}

/// Rule for placing a segment's pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PivotPlacement {
    /// Average world position of the segment's fragments.
    Centroid,
    /// Horizontal centre of the fragments' world bounds, at the given edge.
    BoundsEdge { source: BoundsSource, edge: Edge },
}

impl PivotPlacement {
    #[must_use]
    pub fn edge(source: BoundsSource, edge: Edge) -> Self {
        PivotPlacement::BoundsEdge { source, edge }
    }
}

/// How many of a named fragment list must resolve for the segment to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    #[default]
    All,
    Any,
}

/// Which mesh fragments belong to a segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FragmentSelector {
    /// An explicit list of node names.
    Named {
        names: Vec<String>,
        #[serde(default)]
        require: Requirement,
    },
    /// Every mesh under the asset root not claimed by an earlier segment.
    ///
    /// Decorative geometry that should stay put must be listed in `exclude`.
    Remaining {
        #[serde(default)]
        exclude: Vec<String>,
    },
}

/// One joint of an angle-driven chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSpec {
    /// Name given to the created pivot node.
    pub pivot: String,
    pub fragments: FragmentSelector,
    pub placement: PivotPlacement,
    /// Local rotation axis, fixed for the lifetime of the pivot.
    #[serde(default = "default_axis")]
    pub axis: [f32; 3],
}

impl SegmentSpec {
    #[must_use]
    pub fn named<S: AsRef<str>>(pivot: &str, names: &[S], placement: PivotPlacement) -> Self {
        Self {
            pivot: pivot.to_string(),
            fragments: FragmentSelector::Named {
                names: names.iter().map(|s| s.as_ref().to_string()).collect(),
                require: Requirement::All,
            },
            placement,
            axis: default_axis(),
        }
    }

    #[must_use]
    pub fn remaining(pivot: &str, placement: PivotPlacement) -> Self {
        Self {
            pivot: pivot.to_string(),
            fragments: FragmentSelector::Remaining { exclude: Vec::new() },
            placement,
            axis: default_axis(),
        }
    }

    /// Relaxes a named selector so that any single resolved name suffices.
    #[must_use]
    pub fn require_any(mut self) -> Self {
        if let FragmentSelector::Named { require, .. } = &mut self.fragments {
            *require = Requirement::Any;
        }
        self
    }

    #[must_use]
    pub fn with_axis(mut self, axis: [f32; 3]) -> Self {
        self.axis = axis;
        self
    }
}

/// An angle-driven pivot chain, proximal segment first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub name: String,
    /// Node the first pivot is created under; `None` places it at scene root.
    #[serde(default)]
    pub parent: Option<String>,
    pub segments: Vec<SegmentSpec>,
}

/// A target-driven sliding assembly on a yawing base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideConfig {
    /// Name given to the assembly pivot.
    pub name: String,
    /// Node that yaws toward the target; `None` uses the asset root.
    #[serde(default)]
    pub base: Option<String>,
    /// Mesh whose bounds define the sliding axis. When absent the assembly
    /// is parented under the fragments' common ancestor instead.
    #[serde(default)]
    pub reference: Option<String>,
    pub fragments: Vec<String>,
    #[serde(default = "default_margin")]
    pub margin: f32,
}

/// Keyboard target nudging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub step: f32,
    pub fast_step: f32,
    pub home: [f32; 3],
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            step: 0.2,
            fast_step: 0.5,
            home: [3.0, 3.0, 0.0],
        }
    }
}

/// Periodic joint angles for a three-joint limb, in degrees and rad/s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaitConfig {
    pub frequency: f32,
    pub hip_amplitude: f32,
    pub knee_amplitude: f32,
    pub ankle_follow: f32,
    pub ankle_frequency: f32,
    pub ankle_amplitude: f32,
}

impl Default for GaitConfig {
    fn default() -> Self {
        Self {
            frequency: 1.2,
            hip_amplitude: 30.0,
            knee_amplitude: 60.0,
            ankle_follow: -0.35,
            ankle_frequency: 2.0,
            ankle_amplitude: 5.0,
        }
    }
}

/// Top-level rig description for one asset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    pub chains: Vec<ChainConfig>,
    pub slides: Vec<SlideConfig>,
    pub input: InputConfig,
    pub gait: GaitConfig,
}

impl RigConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn default_axis() -> [f32; 3] {
    [1.0, 0.0, 0.0]
}

fn default_margin() -> f32 {
    DEFAULT_MARGIN
}
