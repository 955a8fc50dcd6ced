use crate::{core::blob::BlobStore, error::KennisbankError};
use std::{path::PathBuf, str::FromStr};
use tracing::debug;
use uuid::Uuid;

/// Simple FS based implementation of a [BlobStore]. Blobs are stored flat
/// under the base directory, named by their generated id.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    /// The base directory to store the blobs in.
    base: PathBuf,
}

impl FsBlobStore {
    pub fn new(path: &str) -> Self {
        Self {
            base: PathBuf::from_str(path)
                .expect("invalid path")
                .canonicalize()
                .expect("unable to canonicalize"),
        }
    }

    fn path_for(&self, id: Uuid) -> PathBuf {
        self.base.join(id.to_string())
    }
}

impl BlobStore for FsBlobStore {
    async fn write(&self, filename: &str, content: &[u8]) -> Result<Uuid, KennisbankError> {
        let id = Uuid::new_v4();
        let path = self.path_for(id);
        debug!("Writing '{filename}' to {}", path.display());
        tokio::fs::write(&path, content).await?;
        Ok(id)
    }

    async fn read(&self, id: Uuid) -> Result<Vec<u8>, KennisbankError> {
        let path = self.path_for(id);
        debug!("Reading {}", path.display());
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(
                KennisbankError::DoesNotExist(format!("Blob {id}")),
            ),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), KennisbankError> {
        let path = self.path_for(id);
        debug!("Removing {}", path.display());
        Ok(tokio::fs::remove_file(&path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIR: &str = "__fs_blob_store_tests";
    const CONTENT: &[u8] = b"%PDF-1.4 fake";

    #[tokio::test]
    async fn works() {
        tokio::fs::create_dir(DIR).await.unwrap();

        let store = FsBlobStore::new(DIR);

        let id = store.write("bron.pdf", CONTENT).await.unwrap();

        let bytes = store.read(id).await.unwrap();
        assert_eq!(CONTENT, bytes);

        store.delete(id).await.unwrap();

        let result = store.read(id).await;
        assert!(matches!(result, Err(KennisbankError::DoesNotExist(_))));

        tokio::fs::remove_dir(DIR).await.unwrap();
    }
}
