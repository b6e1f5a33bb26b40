//! Skin directory probing.

use std::collections::BTreeSet;
use std::rc::Rc;

use backskin_types::error::Result;
use backskin_vfs::{Vfs, join};

use crate::layout::SkinLayout;

/// Checks whether a skin exists on disk under one of the candidate roots.
#[derive(Clone)]
pub struct SkinDirectoryProbe {
    vfs: Rc<dyn Vfs>,
    layout: SkinLayout,
}

impl SkinDirectoryProbe {
    pub fn new(vfs: Rc<dyn Vfs>, layout: SkinLayout) -> Self {
        Self { vfs, layout }
    }

    pub fn layout(&self) -> &SkinLayout {
        &self.layout
    }

    pub fn vfs(&self) -> &Rc<dyn Vfs> {
        &self.vfs
    }

    /// First candidate directory that exists for `code`.
    pub fn find(&self, code: &str) -> Result<Option<String>> {
        if !is_valid_code(code) {
            log::debug!("Rejecting malformed skin code '{code}'");
            return Ok(None);
        }
        for candidate in self.layout.candidates(code) {
            if self.vfs.is_dir(&candidate)? {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    /// Whether a skin directory exists for `code`.
    pub fn exists(&self, code: &str) -> Result<bool> {
        Ok(self.find(code)?.is_some())
    }

    /// Codes of every skin installed on disk, sorted and de-duplicated.
    pub fn installed(&self) -> Result<Vec<String>> {
        let mut codes: BTreeSet<String> = self
            .vfs
            .subdirs(&self.layout.skins_dir())?
            .into_iter()
            .collect();
        let themes_dir = self.layout.themes_dir();
        for theme in self.vfs.subdirs(&themes_dir)? {
            let backend = join(&join(&themes_dir, &theme), "backend");
            if self.vfs.is_dir(&backend)? {
                codes.insert(theme);
            }
        }
        Ok(codes.into_iter().collect())
    }
}

/// A skin code is used as a single directory name.
fn is_valid_code(code: &str) -> bool {
    !code.is_empty() && code != "." && code != ".." && !code.contains(['/', '\\'])
}
