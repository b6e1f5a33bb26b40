//! Host filesystem VFS.
//!
//! VFS paths are resolved relative to a host root directory, so `/themes`
//! on a `RealVfs` rooted at `/srv/site` is `/srv/site/themes` on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use backskin_types::error::{BackskinError, Result};

use crate::{EntryKind, Vfs, VfsEntry, VfsMetadata};

/// A VFS backed by a directory on the host.
#[derive(Debug, Clone)]
pub struct RealVfs {
    root: PathBuf,
}

impl RealVfs {
    /// Create a VFS rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Host root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn host_path(&self, path: &str) -> PathBuf {
        let mut host = self.root.clone();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            host.push(segment);
        }
        host
    }
}

fn kind_of(meta: &fs::Metadata) -> EntryKind {
    if meta.is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::File
    }
}

/// Map a metadata lookup to "missing" vs real failure.
fn probe(path: &Path) -> Result<Option<fs::Metadata>> {
    match fs::metadata(path) {
        Ok(meta) => Ok(Some(meta)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Vfs for RealVfs {
    fn readdir(&self, path: &str) -> Result<Vec<VfsEntry>> {
        let host = self.host_path(path);
        let mut entries = Vec::new();
        for entry in fs::read_dir(&host)? {
            let entry = entry?;
            let meta = entry.metadata()?;
            entries.push(VfsEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind: kind_of(&meta),
                size: if meta.is_dir() { 0 } else { meta.len() },
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        Ok(fs::read(self.host_path(path))?)
    }

    fn write(&mut self, path: &str, data: &[u8]) -> Result<()> {
        let host = self.host_path(path);
        match host.parent() {
            Some(par) if par.is_dir() => {},
            _ => {
                return Err(BackskinError::Vfs(format!(
                    "parent directory does not exist: {path}"
                )));
            },
        }
        fs::write(&host, data)?;
        log::debug!("Wrote {} bytes to {}", data.len(), host.display());
        Ok(())
    }

    fn stat(&self, path: &str) -> Result<VfsMetadata> {
        let meta = fs::metadata(self.host_path(path))?;
        Ok(VfsMetadata {
            kind: kind_of(&meta),
            size: if meta.is_dir() { 0 } else { meta.len() },
        })
    }

    fn mkdir(&mut self, path: &str) -> Result<()> {
        Ok(fs::create_dir_all(self.host_path(path))?)
    }

    fn exists(&self, path: &str) -> Result<bool> {
        Ok(probe(&self.host_path(path))?.is_some())
    }

    fn is_dir(&self, path: &str) -> Result<bool> {
        Ok(probe(&self.host_path(path))?.is_some_and(|m| m.is_dir()))
    }
}
