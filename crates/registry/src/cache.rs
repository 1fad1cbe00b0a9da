//! Read-only lookup over cached option lists and plugin manifests.
//!
//! The cache is loaded once from a JSON manifest and can be refreshed from the
//! same source later. Editors receive it by reference through the
//! [`OptionLookup`] trait instead of reading process-wide state.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::RegistryConfig;

/// Errors raised while loading the cache manifest.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache manifest I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cache manifest is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("cache has no backing file to refresh from")]
    NoSource,
}

/// One named entry of a cached list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// Key of the manifest the entry came from.
    #[serde(default)]
    pub manifest_key: String,
    /// Summary lines shown as hover help.
    #[serde(default)]
    pub summary: Vec<String>,
}

impl CacheEntry {
    pub fn summary_text(&self) -> String {
        self.summary.join(" ")
    }
}

/// Descriptive metadata for a plugin (step type).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginManifest {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub summary: Vec<String>,
}

/// On-disk shape of the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheManifest {
    /// Named option lists, each an ordered map of entry name to entry.
    #[serde(default)]
    pub lists: IndexMap<String, IndexMap<String, CacheEntry>>,
    /// Plugin manifests keyed by plugin name.
    #[serde(default)]
    pub plugins: IndexMap<String, PluginManifest>,
}

/// Lookup service consumed by the type resolver and list widgets.
pub trait OptionLookup {
    /// Returns the list stored under `key`, matching case-insensitively.
    fn find_list(&self, key: &str) -> Option<&IndexMap<String, CacheEntry>>;

    /// Returns the plugin manifest for a step type.
    fn plugin(&self, name: &str) -> Option<&PluginManifest>;

    /// Returns true when `key` names a cached list.
    fn contains_key(&self, key: &str) -> bool {
        self.find_list(key).is_some()
    }

    /// Resolves a list; absent keys resolve to an empty map.
    fn resolve(&self, key: &str) -> Cow<'_, IndexMap<String, CacheEntry>> {
        match self.find_list(key) {
            Some(list) => Cow::Borrowed(list),
            None => Cow::Owned(IndexMap::new()),
        }
    }
}

/// Cache backed by a JSON manifest file.
#[derive(Debug, Clone, Default)]
pub struct ManifestCache {
    manifest: CacheManifest,
    source: Option<PathBuf>,
}

impl ManifestCache {
    /// An empty cache with no backing file.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wraps an already parsed manifest.
    pub fn from_manifest(manifest: CacheManifest) -> Self {
        Self { manifest, source: None }
    }

    /// Loads the manifest at `path` and remembers it for [`refresh`](Self::refresh).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref().to_path_buf();
        let manifest = read_manifest(&path)?;
        debug!(path = %path.display(), lists = manifest.lists.len(), plugins = manifest.plugins.len(), "Loaded cache manifest");
        Ok(Self {
            manifest,
            source: Some(path),
        })
    }

    /// Loads the manifest named by the config, or an empty cache when none is configured.
    pub fn from_config(config: &RegistryConfig) -> Result<Self, CacheError> {
        match config.resolved_cache_path() {
            Some(path) => Self::load(path),
            None => Ok(Self::empty()),
        }
    }

    /// Re-reads the backing file. The current contents survive a failed refresh.
    pub fn refresh(&mut self) -> Result<(), CacheError> {
        let Some(path) = self.source.as_ref() else {
            return Err(CacheError::NoSource);
        };
        self.manifest = read_manifest(path)?;
        debug!(path = %path.display(), "Refreshed cache manifest");
        Ok(())
    }

    pub fn manifest(&self) -> &CacheManifest {
        &self.manifest
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl OptionLookup for ManifestCache {
    fn find_list(&self, key: &str) -> Option<&IndexMap<String, CacheEntry>> {
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        self.manifest.lists.get(key).or_else(|| {
            self.manifest
                .lists
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(key))
                .map(|(_, list)| list)
        })
    }

    fn plugin(&self, name: &str) -> Option<&PluginManifest> {
        self.manifest.plugins.get(name)
    }
}

fn read_manifest(path: &Path) -> Result<CacheManifest, CacheError> {
    let content = std::fs::read_to_string(path).map_err(|source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}
