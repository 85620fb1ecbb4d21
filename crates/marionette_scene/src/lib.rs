//! Scene graph module
//!
//! Manages the node hierarchy consumed by rig construction and pose solving:
//! - [`Node`]: hierarchy links, transform and an optional mesh component
//! - [`Transform`]: position, rotation, scale with cached matrices
//! - [`Scene`]: node arena, component pools and hierarchy editing
//! - [`NameIndex`]: name-to-handle mapping built once after load
//! - [`transform_system`]: world matrix propagation, decoupled from `Scene`

pub mod geometry;
pub mod name_index;
pub mod node;
pub mod scene;
pub mod transform;
pub mod transform_system;

pub use geometry::{Geometry, Mesh};
pub use name_index::NameIndex;
pub use node::Node;
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct MeshKey;
}
