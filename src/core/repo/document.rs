use crate::{
    core::model::document::{Document, DocumentUpdate},
    error::KennisbankError,
};
use std::{collections::HashMap, future::Future};

/// Maximum number of documents returned by a listing.
pub const LIST_LIMIT: usize = 1000;
/// Maximum number of documents returned by a search.
pub const SEARCH_LIMIT: usize = 100;

/// Keeps track of knowledge base documents. The repository is the only shared
/// mutable resource; it is responsible for its own concurrency control and
/// concurrent updates to the same id are last write wins.
pub trait DocumentRepo {
    /// Get a document based on ID.
    fn get_by_id(
        &self,
        id: uuid::Uuid,
    ) -> impl Future<Output = Result<Option<Document>, KennisbankError>> + Send;

    /// List documents, newest first, optionally filtered by category.
    /// At most [LIST_LIMIT] results.
    fn list(
        &self,
        category: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Document>, KennisbankError>> + Send;

    /// Insert a fully assembled document.
    fn insert(
        &self,
        document: Document,
    ) -> impl Future<Output = Result<Document, KennisbankError>> + Send;

    /// Apply a partial update, stamping `updated_at`. Returns the updated
    /// document, or `None` when the id is absent.
    fn update(
        &self,
        id: uuid::Uuid,
        update: DocumentUpdate,
    ) -> impl Future<Output = Result<Option<Document>, KennisbankError>> + Send;

    /// Remove a document. Returns the number of removed records.
    fn remove_by_id(
        &self,
        id: uuid::Uuid,
    ) -> impl Future<Output = Result<u64, KennisbankError>> + Send;

    /// Case-insensitive substring match against title, content or tags.
    /// No ranking; at most [SEARCH_LIMIT] results.
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Document>, KennisbankError>> + Send;

    /// Document counts per category, for the stats endpoint.
    fn counts_by_category(
        &self,
    ) -> impl Future<Output = Result<HashMap<String, usize>, KennisbankError>> + Send;
}
