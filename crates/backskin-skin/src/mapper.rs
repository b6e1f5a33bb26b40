//! Skin code to filesystem/public path mapping.

use backskin_types::DEFAULT_SKIN;
use backskin_types::error::Result;

use crate::probe::SkinDirectoryProbe;

/// A skin resolved from its code.
///
/// `path` is `None` when no directory exists for the code; such a skin has
/// no overrides and every lookup falls through to the framework defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skin {
    code: String,
    path: Option<String>,
    public_path: Option<String>,
}

impl Skin {
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Local directory of the skin.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Web-facing directory of the skin.
    pub fn public_path(&self) -> Option<&str> {
        self.public_path.as_deref()
    }

    pub fn is_default(&self) -> bool {
        self.code == DEFAULT_SKIN
    }
}

/// Computes where a skin lives.
#[derive(Clone)]
pub struct SkinPathMapper {
    probe: SkinDirectoryProbe,
}

impl SkinPathMapper {
    pub fn new(probe: SkinDirectoryProbe) -> Self {
        Self { probe }
    }

    pub fn probe(&self) -> &SkinDirectoryProbe {
        &self.probe
    }

    /// Local directory for `code`. The built-in skin maps to the framework
    /// backend without probing.
    pub fn path_for(&self, code: &str) -> Result<Option<String>> {
        if code == DEFAULT_SKIN {
            return Ok(Some(self.probe.layout().default_skin_path()));
        }
        self.probe.find(code)
    }

    /// Build the [`Skin`] for `code`.
    pub fn load(&self, code: &str) -> Result<Skin> {
        let path = self.path_for(code)?;
        if path.is_none() {
            log::debug!("Skin '{code}' has no directory; using framework views");
        }
        let public_path = path
            .as_deref()
            .and_then(|p| self.probe.layout().public_path(p));
        Ok(Skin {
            code: code.to_string(),
            path,
            public_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::layout::SkinLayout;
    use backskin_vfs::{MemoryVfs, Vfs};

    fn mapper(vfs: MemoryVfs, public_url: &str) -> SkinPathMapper {
        SkinPathMapper::new(SkinDirectoryProbe::new(
            Rc::new(vfs),
            SkinLayout::new("/app", public_url),
        ))
    }

    #[test]
    fn default_skin_maps_to_framework_backend() {
        // No directories at all: the default must not be probed.
        let skin = mapper(MemoryVfs::new(), "").load(DEFAULT_SKIN).unwrap();
        assert!(skin.is_default());
        assert_eq!(skin.path(), Some("/app/modules/backend"));
        assert_eq!(skin.public_path(), Some("/modules/backend"));
    }

    #[test]
    fn custom_skin_maps_to_first_existing_root() {
        let mut vfs = MemoryVfs::new();
        vfs.mkdir("/app/themes/demo/backend").unwrap();
        let skin = mapper(vfs, "https://cdn.test").load("demo").unwrap();
        assert_eq!(skin.code(), "demo");
        assert_eq!(skin.path(), Some("/app/themes/demo/backend"));
        assert_eq!(
            skin.public_path(),
            Some("https://cdn.test/themes/demo/backend")
        );
    }

    #[test]
    fn missing_skin_is_unresolved_not_an_error() {
        let skin = mapper(MemoryVfs::new(), "").load("ghost").unwrap();
        assert_eq!(skin.code(), "ghost");
        assert_eq!(skin.path(), None);
        assert_eq!(skin.public_path(), None);
        assert!(!skin.is_default());
    }

    #[test]
    fn path_for_matches_probe_order() {
        let mut vfs = MemoryVfs::new();
        vfs.mkdir("/app/backendskins/demo").unwrap();
        vfs.mkdir("/app/themes/demo/backend").unwrap();
        assert!(vfs.is_dir("/app/themes/demo/backend").unwrap());
        let m = mapper(vfs, "");
        assert_eq!(
            m.path_for("demo").unwrap().as_deref(),
            Some("/app/backendskins/demo")
        );
    }
}
