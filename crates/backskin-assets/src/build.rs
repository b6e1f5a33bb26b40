//! Cache-busting build suffixes.
//!
//! An asset's `build` tag picks the version appended to its URL: `core`
//! means the framework asset version, anything else is looked up as a
//! plugin code. Unknown tags add nothing.

use std::collections::BTreeMap;

use backskin_types::config::BackskinConfig;

use crate::attributes::CORE_BUILD;

/// Where build versions come from.
pub trait VersionSource {
    /// Framework asset version.
    fn core_version(&self) -> String;

    /// Installed version of a plugin, if the plugin is known.
    fn plugin_version(&self, code: &str) -> Option<String>;
}

/// Versions fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticVersions {
    core: String,
    plugins: BTreeMap<String, String>,
}

impl StaticVersions {
    pub fn new(core: impl Into<String>) -> Self {
        Self {
            core: core.into(),
            plugins: BTreeMap::new(),
        }
    }

    pub fn with_plugin(mut self, code: &str, version: &str) -> Self {
        self.plugins.insert(code.to_string(), version.to_string());
        self
    }

    pub fn from_config(config: &BackskinConfig) -> Self {
        Self {
            core: config.asset_version.clone(),
            plugins: config.plugin_versions.clone(),
        }
    }
}

impl VersionSource for StaticVersions {
    fn core_version(&self) -> String {
        self.core.clone()
    }

    fn plugin_version(&self, code: &str) -> Option<String> {
        self.plugins.get(code).cloned()
    }
}

/// The `v{version}` suffix for a build tag, if any.
pub fn build_suffix(tag: &str, versions: &dyn VersionSource) -> Option<String> {
    let version = if tag == CORE_BUILD {
        Some(versions.core_version())
    } else {
        versions.plugin_version(tag)
    };
    version.filter(|v| !v.is_empty()).map(|v| format!("v{v}"))
}

/// Append `suffix` as a query parameter unless the query already has it.
/// A path with a query gets `&{suffix}`.
pub fn tag_path(path: &str, suffix: &str) -> String {
    match path.split_once('?') {
        None => format!("{path}?{suffix}"),
        Some((_, query)) if query.split('&').any(|param| param == suffix) => path.to_string(),
        Some(_) => format!("{path}&{suffix}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versions() -> StaticVersions {
        StaticVersions::new("3.1.7").with_plugin("acme.blog", "1.2.0")
    }

    #[test]
    fn core_uses_framework_version() {
        assert_eq!(build_suffix("core", &versions()).as_deref(), Some("v3.1.7"));
    }

    #[test]
    fn plugin_tag_uses_plugin_version() {
        assert_eq!(build_suffix("acme.blog", &versions()).as_deref(), Some("v1.2.0"));
    }

    #[test]
    fn unknown_tag_has_no_suffix() {
        assert_eq!(build_suffix("nobody.nothing", &versions()), None);
    }

    #[test]
    fn empty_version_has_no_suffix() {
        assert_eq!(build_suffix("core", &StaticVersions::new("")), None);
    }

    #[test]
    fn tag_path_is_not_repeated() {
        let once = tag_path("/app.js", "v1");
        assert_eq!(once, "/app.js?v1");
        assert_eq!(tag_path(&once, "v1"), "/app.js?v1");
    }

    #[test]
    fn tag_path_matches_whole_parameter() {
        assert_eq!(tag_path("/app.js?v10", "v1"), "/app.js?v10&v1");
        assert_eq!(tag_path("/app.js?lang=en&v1", "v1"), "/app.js?lang=en&v1");
        assert_eq!(tag_path("/app.js?lang=en", "v2"), "/app.js?lang=en&v2");
    }

    #[test]
    fn from_config_copies_versions() {
        let mut config = BackskinConfig::default();
        config.asset_version = "9".into();
        config.plugin_versions.insert("a.b".into(), "2.0".into());
        let v = StaticVersions::from_config(&config);
        assert_eq!(v.core_version(), "9");
        assert_eq!(v.plugin_version("a.b").as_deref(), Some("2.0"));
    }
}
