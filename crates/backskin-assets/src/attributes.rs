//! Asset attribute arguments.

use std::collections::BTreeMap;

/// Attribute carrying the build tag.
pub const BUILD_ATTRIBUTE: &str = "build";

/// Build tag of assets dropped from partial (AJAX) responses.
pub const GLOBAL_BUILD: &str = "global";

/// Build tag resolving to the framework asset version.
pub const CORE_BUILD: &str = "core";

/// HTML attributes of an asset, including the internal `build` tag.
pub type AttributeMap = BTreeMap<String, String>;

/// What callers may pass when declaring an asset: a bare build tag, or a
/// full attribute map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetAttributes {
    BuildTag(String),
    Map(AttributeMap),
}

impl AssetAttributes {
    pub fn into_map(self) -> AttributeMap {
        match self {
            Self::BuildTag(tag) => AttributeMap::from([(BUILD_ATTRIBUTE.to_string(), tag)]),
            Self::Map(map) => map,
        }
    }
}

impl Default for AssetAttributes {
    fn default() -> Self {
        Self::Map(AttributeMap::new())
    }
}

impl From<&str> for AssetAttributes {
    fn from(tag: &str) -> Self {
        Self::BuildTag(tag.to_string())
    }
}

impl From<String> for AssetAttributes {
    fn from(tag: String) -> Self {
        Self::BuildTag(tag)
    }
}

impl From<AttributeMap> for AssetAttributes {
    fn from(map: AttributeMap) -> Self {
        Self::Map(map)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for AssetAttributes {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}
