use std::sync::OnceLock;

use log::{error, info};
use serde::de::DeserializeOwned;
use marionette_core::{Result, RigError};
use marionette_scene::{NodeHandle, Scene};
use tokio::runtime::Runtime;

use crate::description::SceneDescription;
use crate::io::AssetReader;

fn get_asset_runtime() -> Result<&'static Runtime> {
    static RUNTIME: OnceLock<Runtime> = OnceLock::new();
    if let Some(runtime) = RUNTIME.get() {
        return Ok(runtime);
    }
    let runtime = Runtime::new()?;
    Ok(RUNTIME.get_or_init(|| runtime))
}

/// A successfully loaded asset, ready for rig construction.
#[derive(Debug, Clone, Copy)]
pub struct LoadedAsset {
    /// Root group containing every node of the asset.
    pub root: NodeHandle,
}

/// Loads scene descriptions through an [`AssetReader`].
pub struct AssetLoader<R: AssetReader> {
    reader: R,
}

impl<R: AssetReader> AssetLoader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Fetches and parses `uri` without touching any scene.
    pub async fn fetch_async(&self, uri: &str) -> Result<SceneDescription> {
        self.fetch_json_async(uri).await
    }

    /// Fetches `uri` and deserializes it as JSON, e.g. a rig config stored
    /// next to its asset. Read and parse errors both become `LoadFailure`.
    pub async fn fetch_json_async<T: DeserializeOwned>(&self, uri: &str) -> Result<T> {
        let bytes = self.reader.read_bytes(uri).await?;
        serde_json::from_slice(&bytes).map_err(|e| RigError::load_failure(uri, e))
    }

    /// Blocking wrapper around [`AssetLoader::fetch_json_async`].
    pub fn fetch_json<T: DeserializeOwned>(&self, uri: &str) -> Result<T> {
        get_asset_runtime()?.block_on(self.fetch_json_async(uri))
    }

    /// Fetches `uri` and instantiates it into `scene`.
    ///
    /// On failure the scene is left untouched and the error is logged.
    pub async fn load_async(&self, uri: &str, scene: &mut Scene) -> Result<LoadedAsset> {
        match self.fetch_async(uri).await {
            Ok(description) => {
                let root = description.instantiate(scene, uri);
                info!("Loaded '{uri}' ({} node(s))", scene.traverse(root).len());
                Ok(LoadedAsset { root })
            }
            Err(e) => {
                error!("{e}");
                Err(e)
            }
        }
    }

    /// Blocking wrapper around [`AssetLoader::load_async`].
    pub fn load(&self, uri: &str, scene: &mut Scene) -> Result<LoadedAsset> {
        get_asset_runtime()?.block_on(self.load_async(uri, scene))
    }
}
