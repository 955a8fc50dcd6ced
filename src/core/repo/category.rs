use crate::{core::model::category::Category, error::KennisbankError};
use std::future::Future;

/// Keeps track of document categories.
pub trait CategoryRepo {
    /// Get a category by its unique name.
    fn get_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Category>, KennisbankError>> + Send;

    /// List all categories, name ascending.
    fn list(&self) -> impl Future<Output = Result<Vec<Category>, KennisbankError>> + Send;

    /// Insert a category. Name uniqueness is checked by the service.
    fn insert(
        &self,
        category: Category,
    ) -> impl Future<Output = Result<Category, KennisbankError>> + Send;

    /// Remove a category. Returns the number of removed records.
    fn remove_by_id(
        &self,
        id: uuid::Uuid,
    ) -> impl Future<Output = Result<u64, KennisbankError>> + Send;
}
