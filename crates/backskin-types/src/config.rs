//! Static configuration (`backskin.toml`).
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! usable configuration rooted at `/` with the built-in skin active.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::DEFAULT_SKIN;
use crate::error::{BackskinError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackskinConfig {
    /// Application root directory. Skins live below it.
    #[serde(default = "default_app_root")]
    pub app_root: String,
    /// Prefix prepended to public (web-facing) paths.
    #[serde(default)]
    pub public_url: String,
    /// Skin code used when no setting is stored.
    #[serde(default = "default_active_skin")]
    pub active_skin: String,
    /// Code of the theme the public site currently uses.
    #[serde(default)]
    pub frontend_theme: Option<String>,
    /// Framework asset version, used for `core` build tags.
    #[serde(default = "default_asset_version")]
    pub asset_version: String,
    /// Build suffixes are only emitted for backend requests.
    #[serde(default = "yes")]
    pub running_in_backend: bool,
    /// Drop assets tagged `global` when rendering a partial (AJAX) request.
    #[serde(default)]
    pub purge_global_on_partial: bool,
    /// Installed plugin versions, keyed by plugin code.
    #[serde(default)]
    pub plugin_versions: BTreeMap<String, String>,
}

fn default_app_root() -> String {
    "/".to_string()
}
fn default_active_skin() -> String {
    DEFAULT_SKIN.to_string()
}
fn default_asset_version() -> String {
    "1".to_string()
}
fn yes() -> bool {
    true
}

impl Default for BackskinConfig {
    fn default() -> Self {
        Self {
            app_root: default_app_root(),
            public_url: String::new(),
            active_skin: default_active_skin(),
            frontend_theme: None,
            asset_version: default_asset_version(),
            running_in_backend: true,
            purge_global_on_partial: false,
            plugin_versions: BTreeMap::new(),
        }
    }
}

impl BackskinConfig {
    /// Parse a configuration from a TOML string.
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file from the host filesystem.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            BackskinError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        log::debug!("Loaded config from {}", path.display());
        Self::from_toml(&source)
    }

    fn validate(&self) -> Result<()> {
        if !self.app_root.starts_with('/') {
            return Err(BackskinError::Config(format!(
                "app_root must be absolute, got '{}'",
                self.app_root
            )));
        }
        if self.active_skin.is_empty() {
            return Err(BackskinError::Config(
                "active_skin must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// `app_root` without a trailing slash (empty for `/`).
    pub fn root(&self) -> &str {
        self.app_root.trim_end_matches('/')
    }
}
