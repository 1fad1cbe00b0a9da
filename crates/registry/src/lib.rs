//! Registry crate for the cached option lists and plugin manifests the editor
//! consults while building widgets.
//!
//! The cache is an explicitly loaded, explicitly refreshed service; editors
//! borrow it through [`OptionLookup`] for the duration of a build.

pub mod cache;
pub mod config;

pub use cache::{CacheEntry, CacheError, CacheManifest, ManifestCache, OptionLookup, PluginManifest};
pub use config::RegistryConfig;
