use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{AppError, Result};

use super::BlobStore;

/// Blob store backed by a local directory: the container is a subdirectory of
/// `root` and each key is a file path beneath it.
pub struct LocalBlobStore {
    root: PathBuf,
    container: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, container: String) -> Self {
        Self {
            root: root.into(),
            container,
        }
    }

    pub fn container_dir(&self) -> PathBuf {
        self.root.join(&self.container)
    }

    pub fn object_path(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        if relative.is_absolute()
            || relative
                .components()
                .any(|c| !matches!(c, std::path::Component::Normal(_)))
        {
            return Err(AppError::BlobStore(format!("invalid object key '{}'", key)));
        }
        Ok(self.container_dir().join(relative))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn container(&self) -> &str {
        &self.container
    }

    async fn container_exists(&self) -> Result<bool> {
        Ok(tokio::fs::try_exists(self.container_dir()).await?)
    }

    async fn create_container(&self) -> Result<()> {
        tokio::fs::create_dir_all(self.container_dir()).await?;
        Ok(())
    }

    async fn put_object(&self, key: &str, body: Vec<u8>, _content_type: &str) -> Result<()> {
        let path = self.object_path(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, body).await?;
        Ok(())
    }
}
