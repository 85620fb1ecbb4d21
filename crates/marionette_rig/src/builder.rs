//! Rig construction
//!
//! Turns a static asset into a pivot hierarchy: named fragments are located,
//! pivot nodes are created at geometry-derived anchors, and fragments are
//! moved under their pivots without changing where they render.
//!
//! Construction runs once, right after the asset loads. Every input is
//! resolved and validated before the scene is touched, so a failed build
//! leaves the scene exactly as it was.

use glam::Vec3;
use log::{debug, info, warn};
use marionette_core::{BoundingBox, Result, RigError};
use marionette_scene::{NameIndex, Node, NodeHandle, Scene};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::axis::{SlideState, extract_axis};
use crate::chain::{Chain, Joint, SlideJoint};
use crate::config::{
    BoundsSource, ChainConfig, Edge, FragmentSelector, PivotPlacement, Requirement, RigConfig,
    SegmentSpec, SlideConfig,
};
use crate::state::{Rig, RigState, Target};

/// Average world position of `nodes`, expressed in `reference_frame`'s local
/// space (or world space when `None`).
///
/// Returns `None` for an empty slice or when a handle is stale.
#[must_use]
pub fn compute_anchor(
    scene: &Scene,
    nodes: &[NodeHandle],
    reference_frame: Option<NodeHandle>,
) -> Option<Vec3> {
    if nodes.is_empty() {
        return None;
    }

    let mut sum = Vec3::ZERO;
    for &node in nodes {
        sum += scene.world_position(node)?;
    }
    let centroid = sum / nodes.len() as f32;

    match reference_frame {
        Some(frame) => scene.world_to_local(frame, centroid),
        None => Some(centroid),
    }
}

/// Horizontal centre of `bounds` projected onto its top or bottom face.
#[must_use]
pub fn compute_bounds_anchor(bounds: &BoundingBox, edge: Edge) -> Vec3 {
    let center = bounds.center();
    let y = match edge {
        Edge::Top => bounds.max.y,
        Edge::Bottom => bounds.min.y,
    };
    Vec3::new(center.x, y, center.z)
}

/// Moves `node` under `new_parent` while keeping its world pose.
///
/// The new local transform is `inverse(parent_world) * node_world`, using
/// world matrices composed fresh from TRS, so stale caches cannot leak in.
pub fn reparent_preserving_world_transform(
    scene: &mut Scene,
    node: NodeHandle,
    new_parent: NodeHandle,
) -> Result<()> {
    let world = scene
        .compute_world_matrix(node)
        .ok_or_else(|| RigError::InvalidHierarchy("reparented node does not exist".into()))?;
    let parent_world = scene
        .compute_world_matrix(new_parent)
        .ok_or_else(|| RigError::InvalidHierarchy("new parent does not exist".into()))?;

    scene.attach(node, new_parent)?;

    if let Some(n) = scene.get_node_mut(node) {
        n.transform.apply_local_matrix(parent_world.inverse() * world);
    }
    Ok(())
}

/// A segment with its fragments and world anchor resolved up front.
struct ResolvedSegment<'a> {
    spec: &'a SegmentSpec,
    fragments: Vec<NodeHandle>,
    anchor: Vec3,
}

/// Builds rigs over one loaded asset.
///
/// Names are resolved through a [`NameIndex`] built once from the asset root.
pub struct RigBuilder {
    root: NodeHandle,
    index: NameIndex,
}

impl RigBuilder {
    #[must_use]
    pub fn new(scene: &Scene, root: NodeHandle) -> Self {
        Self {
            root,
            index: NameIndex::build(scene, root),
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    #[must_use]
    pub fn index(&self) -> &NameIndex {
        &self.index
    }

    /// Resolves every name that exists; missing names are logged and skipped.
    pub fn locate_named_nodes<S: AsRef<str>>(&self, names: &[S]) -> FxHashMap<String, NodeHandle> {
        let mut found = FxHashMap::default();
        for name in names {
            let name = name.as_ref();
            match self.index.get(name) {
                Ok(handle) => {
                    found.insert(name.to_string(), handle);
                }
                Err(e) => warn!("{e}"),
            }
        }
        found
    }

    /// Builds every configured rig, skipping (and logging) the ones that fail.
    pub fn build_from_config(&self, scene: &mut Scene, config: &RigConfig) -> RigState {
        let mut state = RigState::new(Target::new(Vec3::from(config.input.home)));

        for chain_config in &config.chains {
            match self.build_chain(scene, chain_config) {
                Ok(chain) => state.rigs.push(Rig::Angle(chain)),
                Err(e) => warn!("Chain '{}' not built: {e}", chain_config.name),
            }
        }

        for slide_config in &config.slides {
            match self.build_slide(scene, slide_config) {
                Ok(joint) => state.rigs.push(Rig::Slide(joint)),
                Err(e) => warn!("Slide '{}' not built: {e}", slide_config.name),
            }
        }

        state
    }

    // ========================================================================
    // Angle-driven chains
    // ========================================================================

    /// Creates one pivot per segment, nests them, and moves each segment's
    /// fragments under its pivot.
    pub fn build_chain(&self, scene: &mut Scene, config: &ChainConfig) -> Result<Chain> {
        if config.segments.is_empty() {
            return Err(RigError::InvalidHierarchy(format!(
                "chain '{}' has no segments",
                config.name
            )));
        }
        for segment in &config.segments {
            self.ensure_unbuilt(scene, &segment.pivot)?;
        }

        let parent = config
            .parent
            .as_deref()
            .map(|name| self.index.get(name))
            .transpose()?;

        let resolved = self.resolve_segments(scene, config, parent)?;

        let mut joints = Vec::with_capacity(resolved.len());
        let mut current_parent = parent;

        for segment in resolved {
            let pivot = Self::create_pivot(scene, &segment.spec.pivot, segment.anchor, current_parent)?;

            for &fragment in &segment.fragments {
                reparent_preserving_world_transform(scene, fragment, pivot)?;
            }

            let axis = Vec3::from(segment.spec.axis).try_normalize().unwrap_or(Vec3::X);
            debug!(
                "Pivot '{}' at {:?} carries {} fragment(s)",
                segment.spec.pivot,
                segment.anchor,
                segment.fragments.len()
            );
            joints.push(Joint::new(segment.spec.pivot.clone(), pivot, axis, segment.fragments));
            current_parent = Some(pivot);
        }

        if let Some(first) = joints.first() {
            scene.update_subtree(first.pivot());
        }

        info!("Chain '{}' built with {} pivot(s)", config.name, joints.len());
        Ok(Chain::new(config.name.clone(), joints))
    }

    fn resolve_segments<'a>(
        &self,
        scene: &Scene,
        config: &'a ChainConfig,
        parent: Option<NodeHandle>,
    ) -> Result<Vec<ResolvedSegment<'a>>> {
        let mut claimed: FxHashSet<NodeHandle> = FxHashSet::default();
        let mut resolved: Vec<ResolvedSegment<'a>> = Vec::with_capacity(config.segments.len());

        for spec in &config.segments {
            let fragments = match &spec.fragments {
                FragmentSelector::Named { names, require } => {
                    self.resolve_named(&config.name, spec, names, *require)?
                }
                FragmentSelector::Remaining { exclude } => {
                    self.resolve_remaining(scene, &claimed, exclude)
                }
            };

            if let Some(parent) = parent
                && let Some(&bad) = fragments.iter().find(|&&f| scene.is_ancestor(f, parent))
            {
                return Err(RigError::InvalidHierarchy(format!(
                    "fragment '{}' is an ancestor of chain parent",
                    scene.get_name(bad).unwrap_or("<unnamed>")
                )));
            }

            let previous = resolved.last().map(|s| s.fragments.as_slice());
            let anchor = Self::world_anchor(scene, &config.name, spec, &fragments, previous)?;

            claimed.extend(fragments.iter().copied());
            resolved.push(ResolvedSegment {
                spec,
                fragments,
                anchor,
            });
        }

        Ok(resolved)
    }

    fn resolve_named(
        &self,
        chain: &str,
        spec: &SegmentSpec,
        names: &[String],
        require: Requirement,
    ) -> Result<Vec<NodeHandle>> {
        let found = self.locate_named_nodes(names);
        let missing: Vec<String> = names
            .iter()
            .filter(|n| !found.contains_key(n.as_str()))
            .cloned()
            .collect();

        let satisfied = match require {
            Requirement::All => missing.is_empty(),
            Requirement::Any => !found.is_empty(),
        };
        if !satisfied {
            return Err(RigError::MissingSegment {
                chain: chain.to_string(),
                segment: spec.pivot.clone(),
                missing,
            });
        }

        // Keep the configured order.
        Ok(names.iter().filter_map(|n| found.get(n.as_str()).copied()).collect())
    }

    /// Every mesh under the root not already claimed, not excluded by name and
    /// not carried along by a claimed ancestor.
    fn resolve_remaining(
        &self,
        scene: &Scene,
        claimed: &FxHashSet<NodeHandle>,
        exclude: &[String],
    ) -> Vec<NodeHandle> {
        scene
            .traverse(self.root)
            .into_iter()
            .filter(|&h| scene.mesh_of(h).is_some())
            .filter(|&h| !claimed.iter().any(|&c| scene.is_ancestor(c, h)))
            .filter(|&h| {
                scene
                    .get_name(h)
                    .is_none_or(|name| !exclude.iter().any(|e| e == name))
            })
            .collect()
    }

    fn world_anchor(
        scene: &Scene,
        chain: &str,
        spec: &SegmentSpec,
        own: &[NodeHandle],
        previous: Option<&[NodeHandle]>,
    ) -> Result<Vec3> {
        let missing = || RigError::MissingSegment {
            chain: chain.to_string(),
            segment: spec.pivot.clone(),
            missing: Vec::new(),
        };

        match spec.placement {
            PivotPlacement::Centroid => compute_anchor(scene, own, None).ok_or_else(missing),
            PivotPlacement::BoundsEdge { source, edge } => {
                let fragments = match source {
                    BoundsSource::Own => own,
                    BoundsSource::Previous => previous.ok_or_else(|| {
                        RigError::InvalidHierarchy(format!(
                            "segment '{}' places against a previous segment but is first",
                            spec.pivot
                        ))
                    })?,
                };
                if fragments.is_empty() {
                    return Err(missing());
                }
                let bounds = fragments
                    .iter()
                    .filter_map(|&f| scene.world_bounds(f))
                    .reduce(|a, b| a.union(&b))
                    .ok_or_else(|| {
                        RigError::DegenerateGeometry(format!(
                            "fragments placing '{}' have no geometry",
                            spec.pivot
                        ))
                    })?;
                Ok(compute_bounds_anchor(&bounds, edge))
            }
        }
    }

    /// Creates a mesh-less pivot at `world_anchor`, under `parent` if given.
    fn create_pivot(
        scene: &mut Scene,
        name: &str,
        world_anchor: Vec3,
        parent: Option<NodeHandle>,
    ) -> Result<NodeHandle> {
        let mut node = Node::new();
        let handle = match parent {
            Some(parent) => {
                node.transform.position = scene
                    .world_to_local(parent, world_anchor)
                    .ok_or_else(|| RigError::InvalidHierarchy("pivot parent does not exist".into()))?;
                scene.add_to_parent(node, parent)
            }
            None => {
                node.transform.position = world_anchor;
                scene.add_node(node)
            }
        };
        scene.set_name(handle, name);
        Ok(handle)
    }

    /// Rejects a pivot name already used by this asset, which is how a second
    /// build over the same asset shows up. Other assets may reuse the name.
    fn ensure_unbuilt(&self, scene: &Scene, pivot: &str) -> Result<()> {
        let taken = scene
            .names
            .iter()
            .any(|(handle, name)| name == pivot && self.owns(scene, handle));
        if taken {
            return Err(RigError::InvalidHierarchy(format!(
                "a node named '{pivot}' already exists in this asset; rig already built?"
            )));
        }
        Ok(())
    }

    /// Whether `node` belongs to this asset: it sits under the root, or it is
    /// a pivot that now carries one of the indexed nodes.
    fn owns(&self, scene: &Scene, node: NodeHandle) -> bool {
        scene.is_ancestor(self.root, node)
            || self.index.handles().any(|indexed| scene.is_ancestor(node, indexed))
    }

    // ========================================================================
    // Target-driven slides
    // ========================================================================

    /// Groups the slide fragments under a new assembly pivot parented to the
    /// reference mesh, derives the sliding axis, and parks the assembly at
    /// the near end of its range.
    pub fn build_slide(&self, scene: &mut Scene, config: &SlideConfig) -> Result<SlideJoint> {
        self.ensure_unbuilt(scene, &config.name)?;

        let base = match &config.base {
            Some(name) => self.index.get(name)?,
            None => self.root,
        };

        let found = self.locate_named_nodes(&config.fragments);
        let fragments: Vec<NodeHandle> = config
            .fragments
            .iter()
            .filter_map(|n| found.get(n.as_str()).copied())
            .collect();
        if fragments.is_empty() {
            return Err(RigError::MissingSegment {
                chain: config.name.clone(),
                segment: config.name.clone(),
                missing: config.fragments.clone(),
            });
        }

        let reference = match config.reference.as_deref().map(|name| self.index.get(name)) {
            Some(Ok(handle)) => handle,
            other => {
                if let Some(Err(e)) = other {
                    warn!("{e}; falling back to the fragments' common ancestor");
                }
                scene.common_ancestor(&fragments).unwrap_or(self.root)
            }
        };

        if let Some(&bad) = fragments.iter().find(|&&f| scene.is_ancestor(f, reference)) {
            return Err(RigError::InvalidHierarchy(format!(
                "fragment '{}' contains the slide reference",
                scene.get_name(bad).unwrap_or("<unnamed>")
            )));
        }
        if !scene.is_ancestor(base, reference) {
            warn!("Slide '{}': reference does not follow the yawing base", config.name);
        }

        let axis = extract_axis(scene, reference, config.margin)?;
        let anchor = compute_anchor(scene, &fragments, None).ok_or_else(|| {
            RigError::InvalidHierarchy(format!("slide '{}' has stale fragments", config.name))
        })?;

        let assembly = Self::create_pivot(scene, &config.name, anchor, Some(reference))?;
        for &fragment in &fragments {
            reparent_preserving_world_transform(scene, fragment, assembly)?;
        }

        // The lateral offset is captured here once; only the scalar moves later.
        let local = scene
            .get_node(assembly)
            .map_or(Vec3::ZERO, |n| n.transform.position);
        let mut slide = SlideState::capture(&axis, local);
        slide.set_scalar(&axis, axis.min());
        if let Some(node) = scene.get_node_mut(assembly) {
            node.transform.position = slide.position(&axis);
        }
        scene.update_subtree(reference);

        info!(
            "Slide '{}' built: {} fragment(s), range [{:.3}, {:.3}]",
            config.name,
            fragments.len(),
            axis.min(),
            axis.max()
        );
        Ok(SlideJoint::new(config.name.clone(), base, reference, assembly, axis, slide))
    }
}
