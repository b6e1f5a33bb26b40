//! Filesystem layout of skins below the application root.

use backskin_types::config::BackskinConfig;
use backskin_vfs::join;

/// Where skins live and how local paths map to public ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkinLayout {
    /// Application root without trailing slash (empty for `/`).
    root: String,
    /// Public URL prefix without trailing slash.
    public_url: String,
}

impl SkinLayout {
    pub fn new(app_root: &str, public_url: &str) -> Self {
        Self {
            root: app_root.trim_end_matches('/').to_string(),
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &BackskinConfig) -> Self {
        Self::new(&config.app_root, &config.public_url)
    }

    /// Application root (`/` when mounted at the filesystem root).
    pub fn app_root(&self) -> &str {
        if self.root.is_empty() { "/" } else { &self.root }
    }

    /// `{app_root}/backendskins`
    pub fn skins_dir(&self) -> String {
        join(&self.root, "backendskins")
    }

    /// `{app_root}/themes`
    pub fn themes_dir(&self) -> String {
        join(&self.root, "themes")
    }

    /// Directory of the built-in backend.
    pub fn default_skin_path(&self) -> String {
        join(&self.root, "modules/backend")
    }

    /// Candidate directories for a skin, in probe order.
    pub fn candidates(&self, code: &str) -> [String; 2] {
        [
            join(&self.skins_dir(), code),
            format!("{}/backend", join(&self.themes_dir(), code)),
        ]
    }

    /// Strip the application root from a local path. Returns `None` for
    /// paths outside the root.
    pub fn relative<'a>(&self, local: &'a str) -> Option<&'a str> {
        if self.root.is_empty() {
            return Some(local);
        }
        let rest = local.strip_prefix(self.root.as_str())?;
        if rest.is_empty() || rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }

    /// Web-facing equivalent of a local path below the application root.
    pub fn public_path(&self, local: &str) -> Option<String> {
        let rel = self.relative(local)?;
        Some(format!("{}/{}", self.public_url, rel.trim_start_matches('/')))
    }

    /// Local path behind a URL under a non-empty public prefix. Paths
    /// without the prefix are left to the caller.
    pub fn local_path(&self, public: &str) -> Option<String> {
        if self.public_url.is_empty() {
            return None;
        }
        let rest = public.strip_prefix(self.public_url.as_str())?;
        if !rest.starts_with('/') {
            return None;
        }
        Some(join(&self.root, rest))
    }
}
