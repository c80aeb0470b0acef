use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use uuid::Uuid;

use crate::domain::repository::ImageStore;
use crate::domain::types::ImageUpload;
use crate::error::ApiError;

/// Recipe images live under `<root>/recipes/`.
const RECIPE_DIR: &str = "recipes";

/// Image store backed by a directory on the local filesystem.
#[derive(Clone)]
pub struct FsImageStore {
    pub root: Arc<PathBuf>,
}

impl FsImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Arc::new(root.into()),
        }
    }

    /// Resolve a stored relative path, refusing anything that escapes the root.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path);
        let inside = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        inside.then(|| self.root.join(relative))
    }
}

impl ImageStore for FsImageStore {
    async fn save(&self, upload: &ImageUpload) -> Result<String, ApiError> {
        let relative = format!("{RECIPE_DIR}/{}.{}", Uuid::new_v4(), upload.extension);
        let dir = self.root.join(RECIPE_DIR);
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("create media dir {}", dir.display()))?;
        tokio::fs::write(self.root.join(&relative), &upload.bytes)
            .await
            .with_context(|| format!("write recipe image {relative}"))?;
        Ok(relative)
    }

    async fn remove(&self, path: &str) -> Result<(), ApiError> {
        let Some(full) = self.resolve(path) else {
            tracing::warn!(path, "refusing to remove image outside media root");
            return Ok(());
        };
        match tokio::fs::remove_file(&full).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("remove recipe image {path}"))
                .into()),
        }
    }
}
