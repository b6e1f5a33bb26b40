//! Front-end themes, as seen from the backend skin layer.
//!
//! A front-end theme doubles as a skin when it ships a `backend/`
//! directory. The active theme code feeds the "mirror front-end" setting
//! and the last configuration fallback.

use std::rc::Rc;

use serde::Deserialize;

use backskin_types::error::{BackskinError, Result};
use backskin_vfs::{Vfs, join};

/// A front-end theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeInfo {
    pub code: String,
    pub name: String,
}

/// Source of front-end theme information.
pub trait FrontendThemes {
    /// Code of the theme the public site currently uses.
    fn active_theme_code(&self) -> Option<String>;

    /// Every installed theme.
    fn themes(&self) -> Result<Vec<ThemeInfo>>;
}

/// Fixed theme information, for hosts that already know it.
#[derive(Debug, Clone, Default)]
pub struct StaticThemes {
    active: Option<String>,
    themes: Vec<ThemeInfo>,
}

impl StaticThemes {
    pub fn new(active: Option<&str>) -> Self {
        Self {
            active: active.map(str::to_string),
            themes: Vec::new(),
        }
    }

    pub fn with_theme(mut self, code: &str, name: &str) -> Self {
        self.themes.push(ThemeInfo {
            code: code.to_string(),
            name: name.to_string(),
        });
        self
    }
}

impl FrontendThemes for StaticThemes {
    fn active_theme_code(&self) -> Option<String> {
        self.active.clone()
    }

    fn themes(&self) -> Result<Vec<ThemeInfo>> {
        Ok(self.themes.clone())
    }
}

/// Optional `theme.toml` in a theme directory.
#[derive(Debug, Default, Deserialize)]
struct ThemeManifest {
    #[serde(default)]
    name: Option<String>,
}

/// Themes discovered from `{app_root}/themes/*`.
pub struct ThemeDirectory {
    vfs: Rc<dyn Vfs>,
    themes_dir: String,
    active: Option<String>,
}

impl ThemeDirectory {
    pub fn new(vfs: Rc<dyn Vfs>, themes_dir: impl Into<String>, active: Option<String>) -> Self {
        Self {
            vfs,
            themes_dir: themes_dir.into(),
            active,
        }
    }

    fn theme_name(&self, code: &str) -> Result<String> {
        let manifest_path = join(&join(&self.themes_dir, code), "theme.toml");
        if !self.vfs.exists(&manifest_path)? {
            return Ok(code.to_string());
        }
        let bytes = self.vfs.read(&manifest_path)?;
        let text = String::from_utf8(bytes)
            .map_err(|_| BackskinError::Skin(format!("{manifest_path} is not valid UTF-8")))?;
        let manifest: ThemeManifest = toml::from_str(&text)?;
        Ok(manifest.name.unwrap_or_else(|| code.to_string()))
    }
}

impl FrontendThemes for ThemeDirectory {
    fn active_theme_code(&self) -> Option<String> {
        self.active.clone()
    }

    fn themes(&self) -> Result<Vec<ThemeInfo>> {
        self.vfs
            .subdirs(&self.themes_dir)?
            .into_iter()
            .map(|code| {
                let name = self.theme_name(&code)?;
                Ok(ThemeInfo { code, name })
            })
            .collect()
    }
}
