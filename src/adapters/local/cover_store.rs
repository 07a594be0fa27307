use crate::domain::CoverRef;
use crate::ports::{CoverStore, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use uuid::Uuid;

/// Local filesystem implementation of CoverStore
///
/// Each cover is written to `<root>/<uuid>.<extension>`.
/// The returned reference is the file name relative to the root.
pub struct LocalCoverStore {
    root: PathBuf,
}

impl LocalCoverStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_of(&self, cover: &CoverRef) -> PathBuf {
        self.root.join(cover.as_str())
    }
}

#[async_trait]
impl CoverStore for LocalCoverStore {
    async fn save(&self, bytes: Vec<u8>, extension: &str) -> Result<CoverRef> {
        tokio::fs::create_dir_all(&self.root).await?;

        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        tokio::fs::write(self.root.join(&file_name), &bytes).await?;

        tracing::debug!(file = %file_name, size = bytes.len(), "Cover image stored");
        Ok(CoverRef::new(file_name))
    }

    async fn remove(&self, cover: &CoverRef) -> Result<()> {
        match tokio::fs::remove_file(self.path_of(cover)).await {
            Ok(()) => {
                tracing::debug!(file = %cover.as_str(), "Cover image removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_writes_file_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalCoverStore::new(dir.path().join("covers"));

        let cover = store.save(vec![1, 2, 3], "png").await.unwrap();

        assert!(cover.as_str().ends_with(".png"));
        let written = tokio::fs::read(store.path_of(&cover)).await.unwrap();
        assert_eq!(written, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_remove_deletes_file_and_ignores_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalCoverStore::new(dir.path());

        let cover = store.save(vec![9], "jpg").await.unwrap();
        store.remove(&cover).await.unwrap();

        assert!(!store.path_of(&cover).exists());
        store.remove(&cover).await.unwrap();
    }
}
