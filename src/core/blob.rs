use crate::error::KennisbankError;
use std::future::Future;
use uuid::Uuid;

/// Stores the unmodified bytes of retained originals (PDFs and images),
/// independent of the extracted `content`. Serves as indirection to decouple
/// documents from where their originals live.
pub trait BlobStore {
    /// Persist `content` and return the generated blob id.
    ///
    /// * `filename`: The original file name, kept for diagnostics only.
    /// * `content`: The raw bytes to retain.
    fn write(
        &self,
        filename: &str,
        content: &[u8],
    ) -> impl Future<Output = Result<Uuid, KennisbankError>> + Send;

    /// Read back the bytes stored under `id`.
    fn read(&self, id: Uuid) -> impl Future<Output = Result<Vec<u8>, KennisbankError>> + Send;

    /// Delete the blob stored under `id`.
    fn delete(&self, id: Uuid) -> impl Future<Output = Result<(), KennisbankError>> + Send;
}
