use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::ports::Storage;
use crate::utils::error::Result;

/// Filesystem storage rooted at the Annalist collection directory.
/// Parent directories are created on write.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(full_path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_nested_directories() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage
            .write_file("_annalist_collection/types/Signal/type_meta.jsonld", b"{}")
            .await
            .unwrap();

        let written = dir
            .path()
            .join("_annalist_collection/types/Signal/type_meta.jsonld");
        assert!(written.exists());
        assert_eq!(fs::read(&written).unwrap(), b"{}");
    }

    #[tokio::test]
    async fn test_write_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage.write_file("d/Signal/s/entity-data.jsonld", b"{}").await.unwrap();
        storage
            .write_file("d/Signal/s/entity-data.jsonld", b"{\"annal:id\": \"s\"}")
            .await
            .unwrap();

        let written = fs::read(dir.path().join("d/Signal/s/entity-data.jsonld")).unwrap();
        assert_eq!(written, b"{\"annal:id\": \"s\"}");
    }
}
