use crate::{
    core::{model::category::Category, repo::category::CategoryRepo},
    error::KennisbankError,
};
use tracing::info;
use uuid::Uuid;

/// Category bookkeeping. Names are unique; duplicates are rejected at
/// creation time.
#[derive(Clone)]
pub struct CategoryService<R> {
    repo: R,
}

impl<R> CategoryService<R>
where
    R: CategoryRepo + Send + Sync,
{
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn create(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<Category, KennisbankError> {
        if self.repo.get_by_name(&name).await?.is_some() {
            return Err(KennisbankError::AlreadyExists(
                "Categorie bestaat al".to_string(),
            ));
        }

        let category = self.repo.insert(Category::new(name, description)).await?;
        info!("Created category '{}'", category.name);

        Ok(category)
    }

    pub async fn list(&self) -> Result<Vec<Category>, KennisbankError> {
        self.repo.list().await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), KennisbankError> {
        let removed = self.repo.remove_by_id(id).await?;
        if removed == 0 {
            return Err(KennisbankError::DoesNotExist(format!(
                "Categorie met ID {id}"
            )));
        }
        Ok(())
    }
}
