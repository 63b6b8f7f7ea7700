//! Content configuration
//!
//! ```json
//! {
//!     "asset_root": "data",
//!     "default_paths": { "Texture": "assets://textures/" },
//!     "log": { "filter": "archetype_content=debug" }
//! }
//! ```

use crate::error::{ContentError, Result};
use crate::logging::LogConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Settings shared by the content manager and its loaders
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Disk directory backing the `assets://` virtual root
    pub asset_root: PathBuf,
    /// Default lookup path per content type name
    pub default_paths: BTreeMap<String, String>,
    /// Warn when preloading content that is already cached
    pub warn_on_redundant_preload: bool,
    pub log: LogConfig,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            default_paths: BTreeMap::new(),
            warn_on_redundant_preload: true,
            log: LogConfig::default(),
        }
    }
}

impl ContentConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ContentError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    /// Default path configured for a content type, if any
    pub fn default_path_for(&self, type_name: &str) -> Option<&str> {
        self.default_paths.get(type_name).map(String::as_str)
    }

    pub fn with_default_path(mut self, type_name: &str, path: &str) -> Self {
        self.default_paths
            .insert(type_name.to_string(), path.to_string());
        self
    }
}
