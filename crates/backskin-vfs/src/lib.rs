//! Virtual file system abstraction.
//!
//! Skin resolution only ever asks "is this a directory?" and "does this file
//! exist?", but settings persistence and skin enumeration need a little more.
//! Paths are `/`-separated strings; [`MemoryVfs`] keeps them in memory for
//! tests, [`RealVfs`] maps them onto a host directory.

mod memory;
mod real;

pub use memory::MemoryVfs;
pub use real::RealVfs;

use backskin_types::error::Result;

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// A single entry returned by [`Vfs::readdir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VfsEntry {
    pub name: String,
    pub kind: EntryKind,
    pub size: u64,
}

/// Metadata returned by [`Vfs::stat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VfsMetadata {
    pub kind: EntryKind,
    pub size: u64,
}

/// File system operations needed by the skin layer.
pub trait Vfs {
    /// List the direct children of a directory, sorted by name.
    fn readdir(&self, path: &str) -> Result<Vec<VfsEntry>>;

    /// Read a whole file.
    fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Create or replace a file. The parent directory must exist.
    fn write(&mut self, path: &str, data: &[u8]) -> Result<()>;

    /// Metadata for a path.
    fn stat(&self, path: &str) -> Result<VfsMetadata>;

    /// Create a directory and any missing parents.
    fn mkdir(&mut self, path: &str) -> Result<()>;

    /// Whether anything exists at `path`. A missing path is `Ok(false)`;
    /// any other failure is an error.
    fn exists(&self, path: &str) -> Result<bool>;

    /// Whether `path` is a directory. A missing path is `Ok(false)`.
    fn is_dir(&self, path: &str) -> Result<bool> {
        if !self.exists(path)? {
            return Ok(false);
        }
        Ok(self.stat(path)?.kind == EntryKind::Directory)
    }

    /// Names of the subdirectories of `path`. A missing directory yields an
    /// empty list.
    fn subdirs(&self, path: &str) -> Result<Vec<String>> {
        if !self.is_dir(path)? {
            return Ok(Vec::new());
        }
        Ok(self
            .readdir(path)?
            .into_iter()
            .filter(|e| e.kind == EntryKind::Directory)
            .map(|e| e.name)
            .collect())
    }
}

/// Join two `/`-separated path fragments with exactly one separator.
pub fn join(base: &str, rest: &str) -> String {
    let base = base.trim_end_matches('/');
    let rest = rest.trim_start_matches('/');
    if rest.is_empty() {
        return base.to_string();
    }
    format!("{base}/{rest}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_collapses_separator() {
        assert_eq!(join("/app/", "/views/x.css"), "/app/views/x.css");
        assert_eq!(join("/app", "views"), "/app/views");
        assert_eq!(join("", "backendskins"), "/backendskins");
        assert_eq!(join("/app", ""), "/app");
    }

    #[test]
    fn default_is_dir_uses_stat() {
        let mut vfs = MemoryVfs::new();
        vfs.mkdir("/skins/blue").unwrap();
        vfs.write("/skins/readme.txt", b"hi").unwrap();
        assert!(vfs.is_dir("/skins/blue").unwrap());
        assert!(!vfs.is_dir("/skins/readme.txt").unwrap());
        assert!(!vfs.is_dir("/skins/red").unwrap());
    }

    #[test]
    fn subdirs_skips_files_and_missing() {
        let mut vfs = MemoryVfs::new();
        vfs.mkdir("/skins/blue").unwrap();
        vfs.mkdir("/skins/green").unwrap();
        vfs.write("/skins/notes.md", b"").unwrap();
        assert_eq!(vfs.subdirs("/skins").unwrap(), vec!["blue", "green"]);
        assert!(vfs.subdirs("/nowhere").unwrap().is_empty());
    }
}
