//! Mesh cache and loader chain.
//!
//! The cache maps names to shared mesh resources and is itself shared: every
//! scene graph created from the same [`SharedMeshCache`] sees the same
//! entries, so a mesh loaded once is loaded for the whole process.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::errors::{ArborError, Result};
use crate::resources::mesh::AnimatedMesh;

/// Pluggable mesh-file loader.
///
/// The scene graph keeps a list of these and asks them, newest first, for a
/// path the cache does not know. Concrete file formats live outside the
/// core; implementations only need to turn a path into an [`AnimatedMesh`].
pub trait MeshLoader {
    /// Quick check, typically on the file extension.
    fn can_load(&self, path: &str) -> bool;

    /// Loads the mesh. Called only when `can_load` returned true.
    fn load(&mut self, path: &str) -> Result<AnimatedMesh>;
}

/// Name → mesh resource map shared across scene graphs.
#[derive(Default)]
pub struct MeshCache {
    meshes: FxHashMap<String, Arc<AnimatedMesh>>,
}

/// Handle under which a [`MeshCache`] is shared between scene graphs.
pub type SharedMeshCache = Arc<RwLock<MeshCache>>;

impl MeshCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache already wrapped for sharing.
    #[must_use]
    pub fn new_shared() -> SharedMeshCache {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Inserts a mesh under `name`, replacing any previous entry.
    pub fn add(&mut self, name: impl Into<String>, mesh: Arc<AnimatedMesh>) {
        self.meshes.insert(name.into(), mesh);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<AnimatedMesh>> {
        self.meshes.get(name).cloned()
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<AnimatedMesh>> {
        self.meshes.remove(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.meshes.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn clear(&mut self) {
        self.meshes.clear();
    }
}

/// Resolves `path` through the cache, falling back to the loader chain.
///
/// Loaders are consulted in reverse registration order so user-added loaders
/// override built-in ones. A loaded mesh is cached before being returned.
pub fn resolve_mesh(
    cache: &SharedMeshCache,
    loaders: &mut [Box<dyn MeshLoader>],
    path: &str,
) -> Result<Arc<AnimatedMesh>> {
    if let Some(mesh) = cache.read().get(path) {
        return Ok(mesh);
    }

    for loader in loaders.iter_mut().rev() {
        if !loader.can_load(path) {
            continue;
        }
        match loader.load(path) {
            Ok(mesh) => {
                let mesh = Arc::new(mesh);
                cache.write().add(path, mesh.clone());
                log::debug!("Loaded mesh '{path}'");
                return Ok(mesh);
            }
            Err(err) => {
                log::warn!("Mesh loader failed for '{path}': {err}");
                return Err(err);
            }
        }
    }

    log::warn!("Could not load mesh, no loader accepts '{path}'");
    Err(ArborError::ResourceUnavailable(path.to_string()))
}
