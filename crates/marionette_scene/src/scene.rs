use glam::{Affine3A, Vec3};
use log::warn;
use marionette_core::{BoundingBox, Result, RigError};
use slotmap::{SecondaryMap, SlotMap};

use crate::geometry::Mesh;
use crate::node::Node;
use crate::transform_system;
use crate::{MeshKey, NodeHandle};

/// Scene graph container.
///
/// Nodes live in an arena and refer to each other through stable
/// [`NodeHandle`]s: the parent is a single handle, the children an ordered
/// handle list. Names and meshes are stored in side tables keyed by handle.
#[derive(Debug, Default)]
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    pub names: SecondaryMap<NodeHandle, String>,
    pub meshes: SlotMap<MeshKey, Mesh>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Node Creation & Removal
    // ========================================================================

    /// Creates an empty root node.
    pub fn create_node(&mut self) -> NodeHandle {
        self.add_node(Node::new())
    }

    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        let handle = self.create_node();
        self.set_name(handle, name);
        handle
    }

    /// Inserts `node` as a new root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Inserts `node` under `parent`. Falls back to a root node if `parent` is stale.
    pub fn add_to_parent(&mut self, mut node: Node, parent: NodeHandle) -> NodeHandle {
        if !self.nodes.contains_key(parent) {
            warn!("Parent node not found, adding node as root");
            return self.add_node(node);
        }

        node.parent = Some(parent);
        let handle = self.nodes.insert(node);
        self.nodes[parent].children.push(handle);
        handle
    }

    /// Adds a named mesh-bearing node at the root.
    pub fn add_mesh(&mut self, name: &str, mesh: Mesh) -> NodeHandle {
        let mut node = Node::new();
        node.mesh = Some(self.meshes.insert(mesh));
        let handle = self.add_node(node);
        self.set_name(handle, name);
        handle
    }

    pub fn add_mesh_to_parent(&mut self, name: &str, mesh: Mesh, parent: NodeHandle) -> NodeHandle {
        let mut node = Node::new();
        node.mesh = Some(self.meshes.insert(mesh));
        let handle = self.add_to_parent(node, parent);
        self.set_name(handle, name);
        handle
    }

    /// Removes a node and its whole subtree, including mesh components.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        let Some(node) = self.nodes.get(handle) else {
            return;
        };
        let children = node.children.clone();
        let parent = node.parent;

        for child in children {
            self.remove_node(child);
        }

        self.unlink(handle, parent);

        if let Some(node) = self.nodes.remove(handle)
            && let Some(mesh_key) = node.mesh
        {
            self.meshes.remove(mesh_key);
        }
        self.names.remove(handle);
    }

    // ========================================================================
    // Hierarchy Editing
    // ========================================================================

    /// Moves `child` under `parent`, keeping its local transform.
    ///
    /// Rejects stale handles, attaching a node to itself and attaching a node
    /// below one of its own descendants.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) -> Result<()> {
        if child == parent {
            return Err(RigError::InvalidHierarchy("cannot attach a node to itself".into()));
        }
        let Some(old_parent) = self.nodes.get(child).map(Node::parent) else {
            return Err(RigError::InvalidHierarchy("child node does not exist".into()));
        };
        if !self.nodes.contains_key(parent) {
            return Err(RigError::InvalidHierarchy("parent node does not exist".into()));
        }
        if self.is_ancestor(child, parent) {
            return Err(RigError::InvalidHierarchy(
                "cannot attach a node below its own descendant".into(),
            ));
        }

        self.unlink(child, old_parent);
        self.nodes[parent].children.push(child);

        let node = &mut self.nodes[child];
        node.parent = Some(parent);
        node.transform.mark_dirty();
        Ok(())
    }

    /// Detaches `child` from its parent and makes it a root, keeping its local transform.
    pub fn detach(&mut self, child: NodeHandle) {
        let Some(Some(old_parent)) = self.nodes.get(child).map(Node::parent) else {
            return;
        };
        self.unlink(child, Some(old_parent));
        self.root_nodes.push(child);

        let node = &mut self.nodes[child];
        node.parent = None;
        node.transform.mark_dirty();
    }

    fn unlink(&mut self, handle: NodeHandle, parent: Option<NodeHandle>) {
        let siblings = match parent {
            Some(p) => match self.nodes.get_mut(p) {
                Some(parent_node) => &mut parent_node.children,
                None => return,
            },
            None => &mut self.root_nodes,
        };
        if let Some(i) = siblings.iter().position(|&x| x == handle) {
            siblings.remove(i);
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn get_name(&self, handle: NodeHandle) -> Option<&str> {
        self.names.get(handle).map(String::as_str)
    }

    pub fn set_name(&mut self, handle: NodeHandle, name: &str) {
        if self.nodes.contains_key(handle) {
            self.names.insert(handle, name.to_string());
        }
    }

    /// Mesh component of a node, if it has one.
    #[must_use]
    pub fn mesh_of(&self, handle: NodeHandle) -> Option<&Mesh> {
        let key = self.nodes.get(handle)?.mesh?;
        self.meshes.get(key)
    }

    /// Pre-order list of `root` and all of its descendants.
    #[must_use]
    pub fn traverse(&self, root: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            out.push(handle);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// First node named `name` in a pre-order walk from `root`.
    #[must_use]
    pub fn find_node_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        self.traverse(root)
            .into_iter()
            .find(|&h| self.get_name(h) == Some(name))
    }

    /// Whether `ancestor` is `node` or lies on its parent chain.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = Some(node);
        while let Some(handle) = current {
            if handle == ancestor {
                return true;
            }
            current = self.nodes.get(handle).and_then(Node::parent);
        }
        false
    }

    /// Deepest node that is an ancestor of (or equal to) every handle in `handles`.
    #[must_use]
    pub fn common_ancestor(&self, handles: &[NodeHandle]) -> Option<NodeHandle> {
        let paths: Vec<Vec<NodeHandle>> = handles.iter().map(|&h| self.path_from_root(h)).collect();
        let first = paths.first()?;

        let mut common = None;
        for (depth, &candidate) in first.iter().enumerate() {
            if paths.iter().all(|p| p.get(depth) == Some(&candidate)) {
                common = Some(candidate);
            } else {
                break;
            }
        }
        common
    }

    fn path_from_root(&self, handle: NodeHandle) -> Vec<NodeHandle> {
        let mut path = Vec::new();
        let mut current = self.nodes.contains_key(handle).then_some(handle);
        while let Some(h) = current {
            path.push(h);
            current = self.nodes.get(h).and_then(Node::parent);
        }
        path.reverse();
        path
    }

    // ========================================================================
    // Spatial Queries
    // ========================================================================

    /// World matrix composed from the TRS fields along the parent chain.
    ///
    /// Independent of the cached matrices, so it is exact even between
    /// transform system passes.
    #[must_use]
    pub fn compute_world_matrix(&self, handle: NodeHandle) -> Option<Affine3A> {
        let mut world = self.nodes.get(handle)?.transform.compose();
        let mut current = self.nodes[handle].parent;
        while let Some(parent) = current {
            let node = self.nodes.get(parent)?;
            world = node.transform.compose() * world;
            current = node.parent;
        }
        Some(world)
    }

    /// World matrix of a node's parent, identity for roots.
    #[must_use]
    pub fn parent_world_matrix(&self, handle: NodeHandle) -> Option<Affine3A> {
        match self.nodes.get(handle)?.parent {
            Some(parent) => self.compute_world_matrix(parent),
            None => Some(Affine3A::IDENTITY),
        }
    }

    #[must_use]
    pub fn world_position(&self, handle: NodeHandle) -> Option<Vec3> {
        self.compute_world_matrix(handle).map(|m| m.translation.into())
    }

    /// Expresses a world-space point in `handle`'s local space.
    #[must_use]
    pub fn world_to_local(&self, handle: NodeHandle, point: Vec3) -> Option<Vec3> {
        self.compute_world_matrix(handle)
            .map(|m| m.inverse().transform_point3(point))
    }

    /// Expresses a point in `handle`'s local space in world space.
    #[must_use]
    pub fn local_to_world(&self, handle: NodeHandle, point: Vec3) -> Option<Vec3> {
        self.compute_world_matrix(handle).map(|m| m.transform_point3(point))
    }

    /// World-space bounds of every mesh in the subtree rooted at `handle`.
    #[must_use]
    pub fn world_bounds(&self, handle: NodeHandle) -> Option<BoundingBox> {
        let mut combined: Option<BoundingBox> = None;
        let mut stack = vec![(handle, self.parent_world_matrix(handle)?)];

        while let Some((current, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            let world = parent_world * node.transform.compose();

            if let Some(local) = node
                .mesh
                .and_then(|key| self.meshes.get(key))
                .and_then(|mesh| mesh.geometry.bounding_box())
            {
                let bbox = local.transform(&world);
                combined = Some(combined.map_or(bbox, |c| c.union(&bbox)));
            }

            stack.extend(node.children.iter().map(|&c| (c, world)));
        }

        combined
    }

    // ========================================================================
    // Matrix Update Pipeline
    // ========================================================================

    /// Refreshes every cached world matrix. Call once per frame before rendering.
    pub fn update_matrix_world(&mut self) {
        transform_system::update_hierarchy_iterative(&mut self.nodes, &self.root_nodes);
    }

    /// Refreshes cached world matrices for one subtree.
    pub fn update_subtree(&mut self, root: NodeHandle) {
        transform_system::update_subtree(&mut self.nodes, root);
    }
}
