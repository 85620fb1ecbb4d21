use log::debug;
use marionette_core::{Result, RigError};
use rustc_hash::FxHashMap;

use crate::NodeHandle;
use crate::scene::Scene;

/// Mapping from node names to handles, built once after an asset loads.
///
/// When several nodes share a name the first one in pre-order wins, matching
/// [`Scene::find_node_by_name`].
#[derive(Debug, Default, Clone)]
pub struct NameIndex {
    map: FxHashMap<String, NodeHandle>,
}

impl NameIndex {
    /// Indexes every named node in the subtree rooted at `root`.
    #[must_use]
    pub fn build(scene: &Scene, root: NodeHandle) -> Self {
        let mut map = FxHashMap::default();
        for handle in scene.traverse(root) {
            let Some(name) = scene.get_name(handle) else {
                continue;
            };
            if map.contains_key(name) {
                debug!("Duplicate node name '{name}', keeping the first occurrence");
                continue;
            }
            map.insert(name.to_string(), handle);
        }
        Self { map }
    }

    /// Resolves `name`, failing with [`RigError::NodeNotFound`].
    pub fn get(&self, name: &str) -> Result<NodeHandle> {
        self.map
            .get(name)
            .copied()
            .ok_or_else(|| RigError::NodeNotFound(name.to_string()))
    }

    /// Every indexed handle, in no particular order.
    pub fn handles(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        self.map.values().copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
