//! JSON document output for the pipeline stages.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::info_span;

pub const CRATE_NAME: &str = "numpair-storage";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub path: PathBuf,
    pub content_hash: String,
    pub byte_size: usize,
}

/// Resolves document paths against a root directory and writes JSON documents.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute paths are returned unchanged; relative ones are joined onto the root.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn sha256_hex(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        hex::encode(hasher.finalize())
    }

    /// Two-space indented JSON, non-ASCII kept verbatim, no trailing newline.
    pub fn render_json<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(value)
    }

    /// Serialize `value` and overwrite the file at `path`, creating parent directories.
    pub fn write_json<T: Serialize>(
        &self,
        path: impl AsRef<Path>,
        value: &T,
    ) -> anyhow::Result<StoredDocument> {
        let path = self.resolve(path);
        let span = info_span!("write_json", path = %path.display());
        let _guard = span.enter();

        let bytes = Self::render_json(value)
            .with_context(|| format!("serializing {}", path.display()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        fs::write(&path, &bytes).with_context(|| format!("writing {}", path.display()))?;

        Ok(StoredDocument {
            content_hash: Self::sha256_hex(&bytes),
            byte_size: bytes.len(),
            path,
        })
    }
}
