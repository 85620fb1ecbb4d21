use crate::transform::Transform;
use crate::{MeshKey, NodeHandle};
use glam::Affine3A;

/// A scene node holding only hierarchy, transform and component links.
///
/// A node without a mesh is a pure pivot: it renders nothing and exists to
/// express a joint's rotation or translation.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,

    /// Renderable geometry attached to this node, if any.
    pub mesh: Option<MeshKey>,

    pub visible: bool,
}

impl Node {
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            mesh: None,
            visible: true,
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn is_pivot(&self) -> bool {
        self.mesh.is_none()
    }

    /// Cached world matrix, valid after the last transform system pass.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}
