// Local filesystem assets - Image resolution and path picking
use crate::application::collaborators::{AssetResolver, FileFilter, PathPicker};
use anyhow::Context;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Resolves image paths (absolute, or relative to `root`) to `file://` URIs.
#[derive(Debug, Clone)]
pub struct LocalAssets {
    root: PathBuf,
}

impl LocalAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn absolute(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl AssetResolver for LocalAssets {
    fn resolve(&self, path: &str) -> anyhow::Result<String> {
        let candidate = self.absolute(path);
        let canonical = candidate
            .canonicalize()
            .with_context(|| format!("Image {:?} not found", candidate))?;
        if !canonical.is_file() {
            anyhow::bail!("Image {:?} is not a file", canonical);
        }
        Ok(format!("file://{}", canonical.display()))
    }
}

/// Picker for a path the UI already chose (its own file dialog), accepted
/// only if it exists and matches the requested filters.
#[derive(Debug, Clone)]
pub struct RequestedPathPicker {
    assets: LocalAssets,
    requested: Option<String>,
}

impl RequestedPathPicker {
    pub fn new(assets: LocalAssets, requested: Option<String>) -> Self {
        Self { assets, requested }
    }

    fn candidate(&self) -> Option<PathBuf> {
        self.requested
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| self.assets.absolute(p))
    }
}

fn matches_filters(path: &Path, filters: &[FileFilter]) -> bool {
    if filters.is_empty() {
        return true;
    }
    let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    filters
        .iter()
        .flat_map(|f| f.extensions.iter())
        .any(|allowed| allowed.eq_ignore_ascii_case(extension))
}

#[async_trait]
impl PathPicker for RequestedPathPicker {
    async fn pick_file(&self, filters: &[FileFilter]) -> Option<PathBuf> {
        let path = self.candidate()?;
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() && matches_filters(&path, filters) => Some(path),
            Ok(_) => {
                tracing::warn!("Rejected picked file {:?}: not a matching file", path);
                None
            }
            Err(e) => {
                tracing::warn!("Rejected picked file {:?}: {}", path, e);
                None
            }
        }
    }

    async fn pick_directory(&self) -> Option<PathBuf> {
        let path = self.candidate()?;
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => Some(path),
            _ => {
                tracing::warn!("Rejected picked directory {:?}", path);
                None
            }
        }
    }
}
