//! In-memory VFS implementation.
//!
//! Used by the test suites to lay out application roots, skin directories
//! and override files without touching the disk. Keys are normalized
//! absolute paths.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::io;

use backskin_types::error::{BackskinError, Result};

use crate::{EntryKind, Vfs, VfsEntry, VfsMetadata};

#[derive(Debug, Clone)]
enum Node {
    File(Vec<u8>),
    Dir,
}

/// A fully in-memory virtual file system.
#[derive(Debug)]
pub struct MemoryVfs {
    nodes: BTreeMap<String, Node>,
    /// Paths whose lookups fail with `PermissionDenied`.
    denied: BTreeSet<String>,
}

impl MemoryVfs {
    /// Create a new in-memory VFS with only the root directory.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_string(), Node::Dir);
        Self {
            nodes,
            denied: BTreeSet::new(),
        }
    }

    /// Create `path` as a file (with empty content) along with all parent
    /// directories.
    pub fn touch(&mut self, path: &str) -> Result<()> {
        let path = normalize(path);
        let par = parent(&path).to_string();
        self.mkdir(&par)?;
        self.write(&path, b"")
    }

    /// Make every lookup of `path` fail as if the process lacked permission.
    pub fn deny(&mut self, path: &str) {
        self.denied.insert(normalize(path).into_owned());
    }

    fn check_access(&self, path: &str) -> Result<()> {
        if self.denied.contains(path) {
            return Err(BackskinError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {path}"),
            )));
        }
        Ok(())
    }
}

impl Default for MemoryVfs {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a path: ensure leading `/`, collapse `//`, strip trailing `/`
/// (except for root). Borrows when the input is already normal.
fn normalize(path: &str) -> Cow<'_, str> {
    let normal = path.starts_with('/')
        && !(path.len() > 1 && path.ends_with('/'))
        && !path.contains("//");
    if normal {
        return Cow::Borrowed(path);
    }
    let mut result = String::with_capacity(path.len() + 1);
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        result.push('/');
        result.push_str(segment);
    }
    if result.is_empty() {
        result.push('/');
    }
    Cow::Owned(result)
}

/// Return the parent of a normalized path.
fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(i) => &path[..i],
    }
}

impl Vfs for MemoryVfs {
    fn readdir(&self, path: &str) -> Result<Vec<VfsEntry>> {
        let path = normalize(path);
        self.check_access(&path)?;
        match self.nodes.get(path.as_ref()) {
            Some(Node::Dir) => {},
            Some(Node::File(_)) => {
                return Err(BackskinError::Vfs(format!("not a directory: {path}")));
            },
            None => {
                return Err(BackskinError::Vfs(format!("no such directory: {path}")));
            },
        }

        let prefix = if path.as_ref() == "/" {
            "/".to_string()
        } else {
            format!("{path}/")
        };

        // BTreeMap keys are sorted, so a range scan from the prefix yields
        // children in name order.
        let mut entries = Vec::new();
        for (key, node) in self.nodes.range(prefix.clone()..) {
            if !key.starts_with(&prefix) {
                break;
            }
            let rest = &key[prefix.len()..];
            if rest.is_empty() || rest.contains('/') {
                continue;
            }
            let (kind, size) = match node {
                Node::Dir => (EntryKind::Directory, 0),
                Node::File(data) => (EntryKind::File, data.len() as u64),
            };
            entries.push(VfsEntry {
                name: rest.to_string(),
                kind,
                size,
            });
        }
        Ok(entries)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let path = normalize(path);
        self.check_access(&path)?;
        match self.nodes.get(path.as_ref()) {
            Some(Node::File(data)) => Ok(data.clone()),
            Some(Node::Dir) => Err(BackskinError::Vfs(format!("is a directory: {path}"))),
            None => Err(BackskinError::Vfs(format!("no such file: {path}"))),
        }
    }

    fn write(&mut self, path: &str, data: &[u8]) -> Result<()> {
        let path = normalize(path);
        self.check_access(&path)?;
        let par = parent(&path);
        match self.nodes.get(par) {
            Some(Node::Dir) => {},
            _ => {
                return Err(BackskinError::Vfs(format!(
                    "parent directory does not exist: {par}"
                )));
            },
        }
        if let Some(Node::Dir) = self.nodes.get(path.as_ref()) {
            return Err(BackskinError::Vfs(format!("is a directory: {path}")));
        }
        self.nodes
            .insert(path.into_owned(), Node::File(data.to_vec()));
        Ok(())
    }

    fn stat(&self, path: &str) -> Result<VfsMetadata> {
        let path = normalize(path);
        self.check_access(&path)?;
        match self.nodes.get(path.as_ref()) {
            Some(Node::File(data)) => Ok(VfsMetadata {
                kind: EntryKind::File,
                size: data.len() as u64,
            }),
            Some(Node::Dir) => Ok(VfsMetadata {
                kind: EntryKind::Directory,
                size: 0,
            }),
            None => Err(BackskinError::Vfs(format!("no such path: {path}"))),
        }
    }

    fn mkdir(&mut self, path: &str) -> Result<()> {
        let path = normalize(path);
        match self.nodes.get(path.as_ref()) {
            Some(Node::Dir) => return Ok(()),
            Some(Node::File(_)) => {
                return Err(BackskinError::Vfs(format!("file exists: {path}")));
            },
            None => {},
        }
        let par = parent(&path).to_string();
        if par != path.as_ref() {
            self.mkdir(&par)?;
        }
        self.nodes.insert(path.into_owned(), Node::Dir);
        Ok(())
    }

    fn exists(&self, path: &str) -> Result<bool> {
        let path = normalize(path);
        self.check_access(&path)?;
        Ok(self.nodes.contains_key(path.as_ref()))
    }
}
