//! The per-page asset collector.

use std::collections::BTreeMap;
use std::fmt;

use backskin_skin::{AssetPathRewriter, Skin};
use backskin_types::config::BackskinConfig;
use backskin_types::error::Result;
use backskin_vfs::join;

use crate::attributes::{AssetAttributes, AttributeMap, BUILD_ATTRIBUTE, CORE_BUILD, GLOBAL_BUILD};
use crate::build::{VersionSource, build_suffix, tag_path};
use crate::combiner::{AssetCombiner, HashCombiner};

/// Asset type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssetKind {
    Js,
    Css,
    Rss,
}

impl AssetKind {
    /// Render order of [`AssetCollector::make_assets`].
    pub const RENDER_ORDER: [AssetKind; 3] = [AssetKind::Css, AssetKind::Rss, AssetKind::Js];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Js => "js",
            Self::Css => "css",
            Self::Rss => "rss",
        }
    }

    fn bundles(self) -> bool {
        !matches!(self, Self::Rss)
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub path: String,
    pub attributes: AttributeMap,
}

impl Asset {
    pub fn build(&self) -> Option<&str> {
        self.attributes.get(BUILD_ATTRIBUTE).map(String::as_str)
    }
}

/// Inspects an asset right before it is rendered. Returning `false` drops
/// the asset from the output.
pub trait AssetFilter {
    fn before_add_asset(
        &self,
        kind: AssetKind,
        path: &mut String,
        attributes: &mut AttributeMap,
    ) -> bool;
}

impl<F> AssetFilter for F
where
    F: Fn(AssetKind, &mut String, &mut AttributeMap) -> bool,
{
    fn before_add_asset(
        &self,
        kind: AssetKind,
        path: &mut String,
        attributes: &mut AttributeMap,
    ) -> bool {
        self(kind, path, attributes)
    }
}

/// Request- and site-level switches.
#[derive(Debug, Clone, Default)]
pub struct CollectorOptions {
    /// Prefix for absolute (`/`) asset paths.
    pub public_url: String,
    /// Application root, for turning asset paths into local paths.
    pub app_root: String,
    /// Build suffixes are only emitted when true.
    pub running_in_backend: bool,
    /// Drop `global` assets while serving a partial request.
    pub purge_global_on_partial: bool,
    /// The current request is a partial (AJAX) request.
    pub partial_request: bool,
}

impl CollectorOptions {
    pub fn from_config(config: &BackskinConfig) -> Self {
        Self {
            public_url: config.public_url.trim_end_matches('/').to_string(),
            app_root: config.root().to_string(),
            running_in_backend: config.running_in_backend,
            purge_global_on_partial: config.purge_global_on_partial,
            partial_request: false,
        }
    }
}

/// Where a declared asset name points.
enum Located {
    /// Protocol-relative or absolute URL.
    External(String),
    /// Already redirected into the active skin.
    Skinned(String),
    /// A framework path, absolute or relative.
    Plain(String),
}

impl Located {
    fn into_string(self) -> String {
        match self {
            Self::External(p) | Self::Skinned(p) | Self::Plain(p) => p,
        }
    }
}

fn is_external(path: &str) -> bool {
    ["//", "http://", "https://"]
        .iter()
        .any(|p| path.starts_with(p))
}

/// Accumulates assets for one page.
pub struct AssetCollector {
    assets: BTreeMap<AssetKind, Vec<Asset>>,
    bundles: BTreeMap<AssetKind, Vec<Asset>>,
    /// Public or relative directory that relative asset names live in.
    asset_path: Option<String>,
    /// Local directory handed to the combiner.
    asset_local_path: Option<String>,
    skin: Skin,
    rewriter: AssetPathRewriter,
    versions: Box<dyn VersionSource>,
    combiner: Box<dyn AssetCombiner>,
    filters: Vec<Box<dyn AssetFilter>>,
    options: CollectorOptions,
}

impl AssetCollector {
    pub fn new(
        rewriter: AssetPathRewriter,
        skin: Skin,
        versions: Box<dyn VersionSource>,
        options: CollectorOptions,
    ) -> Self {
        let combiner = HashCombiner::new(&options.public_url);
        Self {
            assets: BTreeMap::new(),
            bundles: BTreeMap::new(),
            asset_path: None,
            asset_local_path: None,
            skin,
            rewriter,
            versions,
            combiner: Box::new(combiner),
            filters: Vec::new(),
            options,
        }
    }

    pub fn with_combiner(mut self, combiner: Box<dyn AssetCombiner>) -> Self {
        self.combiner = combiner;
        self
    }

    /// Directory relative asset names are resolved against.
    pub fn with_asset_path(mut self, asset_path: &str) -> Self {
        self.asset_path = Some(asset_path.to_string());
        self
    }

    pub fn with_asset_local_path(mut self, local_path: &str) -> Self {
        self.asset_local_path = Some(local_path.to_string());
        self
    }

    pub fn add_filter(&mut self, filter: impl AssetFilter + 'static) {
        self.filters.push(Box::new(filter));
    }

    pub fn set_partial_request(&mut self, partial: bool) {
        self.options.partial_request = partial;
    }

    pub fn skin(&self) -> &Skin {
        &self.skin
    }

    // -- declaring ------------------------------------------------------

    pub fn add_js(&mut self, name: &str, attributes: impl Into<AssetAttributes>) -> Result<()> {
        self.add(AssetKind::Js, name, attributes.into())
    }

    pub fn add_css(&mut self, name: &str, attributes: impl Into<AssetAttributes>) -> Result<()> {
        self.add(AssetKind::Css, name, attributes.into())
    }

    pub fn add_rss(&mut self, name: &str, attributes: impl Into<AssetAttributes>) -> Result<()> {
        self.add(AssetKind::Rss, name, attributes.into())
    }

    /// Combine several scripts into one and declare the result.
    pub fn add_js_combined(
        &mut self,
        names: &[&str],
        attributes: impl Into<AssetAttributes>,
    ) -> Result<()> {
        self.add_combined(AssetKind::Js, names, attributes.into())
    }

    /// Combine several stylesheets into one and declare the result.
    pub fn add_css_combined(
        &mut self,
        names: &[&str],
        attributes: impl Into<AssetAttributes>,
    ) -> Result<()> {
        self.add_combined(AssetKind::Css, names, attributes.into())
    }

    /// Queue a script for the bundled combiner stream.
    pub fn add_js_bundle(&mut self, name: &str, attributes: impl Into<AssetAttributes>) -> Result<()> {
        self.add_bundle(AssetKind::Js, name, attributes.into())
    }

    /// Queue a stylesheet for the bundled combiner stream.
    pub fn add_css_bundle(
        &mut self,
        name: &str,
        attributes: impl Into<AssetAttributes>,
    ) -> Result<()> {
        self.add_bundle(AssetKind::Css, name, attributes.into())
    }

    fn add(&mut self, kind: AssetKind, name: &str, attributes: AssetAttributes) -> Result<()> {
        let path = match self.locate(name, None)? {
            Located::Plain(path) => self.asset_scheme(&path)?,
            other => other.into_string(),
        };
        log::debug!("Adding {kind} asset {path}");
        self.assets.entry(kind).or_default().push(Asset {
            path,
            attributes: attributes.into_map(),
        });
        Ok(())
    }

    fn add_combined(
        &mut self,
        kind: AssetKind,
        names: &[&str],
        attributes: AssetAttributes,
    ) -> Result<()> {
        let base = self.asset_path.clone().unwrap_or_default();
        let local = self.local_path(&base);
        let paths: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        let url = self.combine_assets(&paths, Some(&local))?;
        if url.is_empty() {
            return Ok(());
        }
        self.assets.entry(kind).or_default().push(Asset {
            path: url,
            attributes: attributes.into_map(),
        });
        Ok(())
    }

    fn add_bundle(&mut self, kind: AssetKind, name: &str, attributes: AssetAttributes) -> Result<()> {
        let path = self.get_asset_path(name, None)?;
        self.bundles.entry(kind).or_default().push(Asset {
            path,
            attributes: attributes.into_map(),
        });
        Ok(())
    }

    // -- path resolution ------------------------------------------------

    fn locate(&self, file_name: &str, asset_path: Option<&str>) -> Result<Located> {
        if is_external(file_name) {
            return Ok(Located::External(file_name.to_string()));
        }
        let base = asset_path.or(self.asset_path.as_deref());
        let Some(base) = base.filter(|_| !file_name.starts_with('/')) else {
            return Ok(Located::Plain(file_name.to_string()));
        };
        let path = join(base, file_name);
        let rewritten = self.rewriter.rewrite(&path, &self.skin)?;
        if rewritten == path {
            Ok(Located::Plain(path))
        } else {
            Ok(Located::Skinned(rewritten))
        }
    }

    /// Resolve a declared asset name. Names starting with `/` or a URL
    /// scheme are returned as-is; relative names are placed in the asset
    /// directory and redirected into the active skin when it overrides them.
    pub fn get_asset_path(&self, file_name: &str, asset_path: Option<&str>) -> Result<String> {
        Ok(self.locate(file_name, asset_path)?.into_string())
    }

    /// Public URL for a framework path: the skin override when one exists,
    /// otherwise the path under `public_url`.
    fn asset_scheme(&self, path: &str) -> Result<String> {
        if is_external(path) || !path.starts_with('/') {
            return Ok(path.to_string());
        }
        let rewritten = self.rewriter.rewrite(path, &self.skin)?;
        if rewritten != path {
            return Ok(rewritten);
        }
        Ok(format!("{}{path}", self.options.public_url))
    }

    /// Local filesystem path for an asset path. `~/` is the application
    /// root and `$/` the plugins directory.
    pub fn local_path(&self, relative: &str) -> String {
        let root = self.options.app_root.as_str();
        if let Some(rest) = relative.strip_prefix("~/") {
            return join(root, rest);
        }
        if let Some(rest) = relative.strip_prefix("$/") {
            return join(&join(root, "plugins"), rest);
        }
        if !root.is_empty()
            && (relative == root || relative.starts_with(&format!("{root}/")))
        {
            return relative.to_string();
        }
        join(root, relative)
    }

    /// Run files through the combiner. An empty list yields an empty path.
    pub fn combine_assets(&self, paths: &[String], local_path: Option<&str>) -> Result<String> {
        if paths.is_empty() {
            return Ok(String::new());
        }
        let local = local_path
            .or(self.asset_local_path.as_deref())
            .unwrap_or_default();
        self.combiner.combine(paths, local)
    }

    // -- collection state -----------------------------------------------

    /// Whether anything has been declared.
    pub fn has_assets_defined(&self) -> bool {
        self.assets.values().any(|v| !v.is_empty()) || self.bundles.values().any(|v| !v.is_empty())
    }

    /// Forget every declared asset.
    pub fn flush_assets(&mut self) {
        self.assets.clear();
        self.bundles.clear();
    }

    /// Declared assets of one kind, in declaration order.
    pub fn assets(&self, kind: AssetKind) -> &[Asset] {
        self.assets.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    /// Keep the first occurrence of each path per kind, and drop `global`
    /// assets from partial responses when configured to.
    pub fn remove_duplicates(&mut self) {
        let purge = self.options.purge_global_on_partial && self.options.partial_request;
        for group in [&mut self.assets, &mut self.bundles] {
            for collection in group.values_mut() {
                let mut seen = std::collections::HashSet::new();
                collection.retain(|asset| asset.path.is_empty() || seen.insert(asset.path.clone()));
                if purge {
                    collection.retain(|asset| asset.build() != Some(GLOBAL_BUILD));
                }
            }
        }
    }

    /// The asset path with its build suffix, if any.
    pub fn build_path(&self, asset: &Asset) -> String {
        let suffix = asset
            .build()
            .filter(|_| self.options.running_in_backend)
            .and_then(|tag| build_suffix(tag, self.versions.as_ref()));
        match suffix {
            Some(suffix) => tag_path(&asset.path, &suffix),
            None => asset.path.clone(),
        }
    }

    /// Every asset path per kind, build-suffixed, combined bundles last.
    pub fn get_asset_paths(&mut self) -> Result<BTreeMap<AssetKind, Vec<String>>> {
        self.remove_duplicates();
        let mut paths = BTreeMap::new();
        for kind in AssetKind::RENDER_ORDER {
            let mut list: Vec<String> = self.assets(kind).iter().map(|a| self.build_path(a)).collect();
            for asset in self.combine_bundled_assets(kind)? {
                list.push(self.build_path(&asset));
            }
            paths.insert(kind, list);
        }
        Ok(paths)
    }

    /// One combined asset per distinct bundle build tag, in first-seen
    /// order. Attributes are merged with the first value of a key winning.
    pub fn combine_bundled_assets(&self, kind: AssetKind) -> Result<Vec<Asset>> {
        let Some(bundle) = self.bundles.get(&kind).filter(|_| kind.bundles()) else {
            return Ok(Vec::new());
        };
        let mut groups: Vec<(&str, Vec<&Asset>)> = Vec::new();
        for asset in bundle {
            let build = asset.build().unwrap_or(CORE_BUILD);
            match groups.iter_mut().find(|(b, _)| *b == build) {
                Some((_, members)) => members.push(asset),
                None => groups.push((build, vec![asset])),
            }
        }

        let mut combined = Vec::with_capacity(groups.len());
        for (_, members) in groups {
            let mut paths = Vec::with_capacity(members.len());
            let mut attributes = AttributeMap::new();
            for asset in members {
                let local = match self.rewriter.layout().local_path(&asset.path) {
                    Some(local) => local,
                    None => self.local_path(&asset.path),
                };
                paths.push(local);
                for (key, value) in &asset.attributes {
                    attributes
                        .entry(key.clone())
                        .or_insert_with(|| value.clone());
                }
            }
            combined.push(Asset {
                path: self.combine_assets(&paths, None)?,
                attributes,
            });
        }
        Ok(combined)
    }

    // -- rendering ------------------------------------------------------

    /// Render `<link>`/`<script>` tags for one kind, or for all kinds in
    /// css, rss, js order.
    pub fn make_assets(&mut self, kind: Option<AssetKind>) -> Result<String> {
        self.remove_duplicates();
        let mut out = String::new();
        for current in AssetKind::RENDER_ORDER {
            if kind.is_some_and(|k| k != current) {
                continue;
            }
            let mut list: Vec<Asset> = self.assets(current).to_vec();
            list.extend(self.combine_bundled_assets(current)?);
            for asset in &list {
                let Some(attrs) = self.render_attributes(current, asset) else {
                    continue;
                };
                match current {
                    AssetKind::Js => out.push_str(&format!("<script {attrs}></script>\n")),
                    AssetKind::Css | AssetKind::Rss => out.push_str(&format!("<link {attrs} />\n")),
                }
            }
        }
        Ok(out)
    }

    /// The HTML attribute string for an asset, or `None` when it has no
    /// path or a filter vetoed it.
    pub fn render_attributes(&self, kind: AssetKind, asset: &Asset) -> Option<String> {
        let mut path = self.build_path(asset);
        if path.is_empty() {
            return None;
        }
        let mut user = asset.attributes.clone();
        user.remove(BUILD_ATTRIBUTE);

        for filter in &self.filters {
            if !filter.before_add_asset(kind, &mut path, &mut user) {
                log::debug!("Asset {path} vetoed by filter");
                return None;
            }
        }

        let mut attrs: Vec<(String, String)> = match kind {
            AssetKind::Css => vec![("rel".into(), "stylesheet".into()), ("href".into(), path)],
            AssetKind::Js => vec![("src".into(), path)],
            AssetKind::Rss => vec![
                ("rel".into(), "alternate".into()),
                ("href".into(), path),
                ("title".into(), "RSS".into()),
                ("type".into(), "application/rss+xml".into()),
            ],
        };
        for (key, value) in user {
            match attrs.iter_mut().find(|(k, _)| *k == key) {
                Some(existing) => existing.1 = value,
                None => attrs.push((key, value)),
            }
        }

        let rendered: Vec<String> = attrs
            .iter()
            .map(|(key, value)| {
                if value.is_empty() {
                    escape(key)
                } else {
                    format!("{}=\"{}\"", escape(key), escape(value))
                }
            })
            .collect();
        Some(rendered.join(" "))
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
