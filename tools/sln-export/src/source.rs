//! Asset source seams
//!
//! The exporter never cares where triangulated meshes and decoded images
//! come from. Sources resolve an asset id to in-memory data; the manifest
//! pipeline uses the file-backed implementations, tests can supply their own.

use anyhow::{Result, anyhow};
use hashbrown::HashMap;
use sln_common::{Mesh, Texture};
use std::path::{Path, PathBuf};

/// Produces triangulated meshes by id
pub trait MeshSource: Sync {
    fn triangulated_mesh(&self, id: &str) -> Result<Mesh>;
}

/// Produces decoded RGBA8 images by id
pub trait ImageSource: Sync {
    fn load_image(&self, id: &str) -> Result<Texture>;
}

/// Assets on disk, keyed by id
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    paths: HashMap<String, PathBuf>,
}

impl FileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id`; `path` is used as given
    pub fn insert(&mut self, id: impl Into<String>, path: impl Into<PathBuf>) {
        self.paths.insert(id.into(), path.into());
    }

    pub fn path(&self, id: &str) -> Result<&Path> {
        self.paths
            .get(id)
            .map(PathBuf::as_path)
            .ok_or_else(|| anyhow!("Unknown asset id '{}'", id))
    }
}

impl<K, P> FromIterator<(K, P)> for FileSource
where
    K: Into<String>,
    P: Into<PathBuf>,
{
    fn from_iter<I: IntoIterator<Item = (K, P)>>(iter: I) -> Self {
        let mut source = Self::new();
        for (id, path) in iter {
            source.insert(id, path);
        }
        source
    }
}

impl MeshSource for FileSource {
    fn triangulated_mesh(&self, id: &str) -> Result<Mesh> {
        crate::mesh::load_mesh(self.path(id)?)
    }
}

impl ImageSource for FileSource {
    fn load_image(&self, id: &str) -> Result<Texture> {
        crate::texture::load_texture(self.path(id)?)
    }
}
