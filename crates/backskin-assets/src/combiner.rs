//! Naming of combined asset files.
//!
//! Combining turns a list of local files into one URL. Serving the
//! concatenated content stays with the host framework; this only decides
//! the URL, which changes whenever the file list does.

use sha2::{Digest, Sha256};

use backskin_types::error::{BackskinError, Result};

/// Turns several local asset files into a single URL.
pub trait AssetCombiner {
    fn combine(&self, paths: &[String], local_path: &str) -> Result<String>;
}

/// `{base_url}/combine/{hash}-{ext}` where the hash covers the base
/// directory and every path, in order.
#[derive(Debug, Clone, Default)]
pub struct HashCombiner {
    base_url: String,
}

impl HashCombiner {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl AssetCombiner for HashCombiner {
    fn combine(&self, paths: &[String], local_path: &str) -> Result<String> {
        let first = paths
            .first()
            .ok_or_else(|| BackskinError::Asset("nothing to combine".to_string()))?;
        let extension = first
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty() && !ext.contains('/'))
            .unwrap_or("asset");

        let mut hasher = Sha256::new();
        hasher.update(local_path.as_bytes());
        for path in paths {
            hasher.update(b"\n");
            hasher.update(path.as_bytes());
        }
        let digest = hex::encode(hasher.finalize());
        Ok(format!("{}/combine/{}-{extension}", self.base_url, &digest[..16]))
    }
}
