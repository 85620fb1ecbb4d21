//! Asset loading
//!
//! Reads JSON scene descriptions through an [`AssetReader`] and instantiates
//! them into a [`marionette_scene::Scene`]. Rig construction is expected to
//! run only once a load has completed successfully.

pub mod description;
pub mod io;
pub mod loader;

pub use description::{GeometryDescription, NodeDescription, SceneDescription};
pub use io::{AssetReader, FileAssetReader};
pub use loader::{AssetLoader, LoadedAsset};
