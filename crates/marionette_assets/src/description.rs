use glam::{Quat, Vec3};
use marionette_scene::{Geometry, Mesh, Node, NodeHandle, Scene};
use serde::{Deserialize, Serialize};

/// Serialized form of an asset: a forest of named nodes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub name: Option<String>,
    pub nodes: Vec<NodeDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescription {
    pub name: String,
    #[serde(default = "zero")]
    pub translation: [f32; 3],
    /// Quaternion as `[x, y, z, w]`.
    #[serde(default = "identity")]
    pub rotation: [f32; 4],
    #[serde(default = "one")]
    pub scale: [f32; 3],
    #[serde(default)]
    pub geometry: Option<GeometryDescription>,
    #[serde(default)]
    pub children: Vec<NodeDescription>,
}

/// Mesh geometry, either as an explicit box or as raw vertex positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeometryDescription {
    Box { min: [f32; 3], max: [f32; 3] },
    Positions { positions: Vec<[f32; 3]> },
}

impl GeometryDescription {
    #[must_use]
    pub fn to_geometry(&self) -> Geometry {
        match self {
            GeometryDescription::Box { min, max } => {
                Geometry::from_bounds(Vec3::from(*min), Vec3::from(*max))
            }
            GeometryDescription::Positions { positions } => {
                Geometry::from_positions(positions.iter().copied().map(Vec3::from).collect())
            }
        }
    }
}

impl NodeDescription {
    /// Inserts this node and its subtree under `parent`, returning its handle.
    pub fn instantiate(&self, scene: &mut Scene, parent: NodeHandle) -> NodeHandle {
        let mut node = Node::new();
        node.transform.position = Vec3::from(self.translation);
        node.transform.rotation = Quat::from_array(self.rotation).normalize();
        node.transform.scale = Vec3::from(self.scale);
        if let Some(geometry) = &self.geometry {
            node.mesh = Some(scene.meshes.insert(Mesh::new(geometry.to_geometry())));
        }

        let handle = scene.add_to_parent(node, parent);
        scene.set_name(handle, &self.name);

        for child in &self.children {
            child.instantiate(scene, handle);
        }
        handle
    }
}

impl SceneDescription {
    /// Instantiates every top-level node under a new root group named after
    /// the description (or `fallback_name`).
    pub fn instantiate(&self, scene: &mut Scene, fallback_name: &str) -> NodeHandle {
        let root = scene.create_node_with_name(self.name.as_deref().unwrap_or(fallback_name));
        for node in &self.nodes {
            node.instantiate(scene, root);
        }
        scene.update_subtree(root);
        root
    }
}

fn zero() -> [f32; 3] {
    [0.0; 3]
}

fn one() -> [f32; 3] {
    [1.0; 3]
}

fn identity() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}
