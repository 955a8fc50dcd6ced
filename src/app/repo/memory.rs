use crate::{
    core::{
        model::{
            category::Category,
            chat::ChatMessage,
            document::{Document, DocumentUpdate},
        },
        pipeline::preview,
        repo::{
            category::CategoryRepo,
            chat::ChatRepo,
            document::{DocumentRepo, LIST_LIMIT, SEARCH_LIMIT},
        },
    },
    error::KennisbankError,
};
use chrono::Utc;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory repository backing all three record kinds. The lock is the
/// store's concurrency control; concurrent updates to one id are last write
/// wins.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    documents: HashMap<Uuid, Document>,
    categories: HashMap<Uuid, Category>,
    messages: Vec<ChatMessage>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentRepo for MemoryRepository {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Document>, KennisbankError> {
        Ok(self.inner.read().await.documents.get(&id).cloned())
    }

    async fn list(&self, category: Option<&str>) -> Result<Vec<Document>, KennisbankError> {
        let inner = self.inner.read().await;

        let mut documents: Vec<Document> = inner
            .documents
            .values()
            .filter(|d| category.map_or(true, |c| d.category == c))
            .cloned()
            .collect();

        documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        documents.truncate(LIST_LIMIT);

        Ok(documents)
    }

    async fn insert(&self, document: Document) -> Result<Document, KennisbankError> {
        let mut inner = self.inner.write().await;
        inner.documents.insert(document.id, document.clone());
        Ok(document)
    }

    async fn update(
        &self,
        id: Uuid,
        update: DocumentUpdate,
    ) -> Result<Option<Document>, KennisbankError> {
        let mut inner = self.inner.write().await;

        let Some(document) = inner.documents.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = update.title {
            document.title = title;
        }
        if let Some(category) = update.category {
            document.category = category;
        }
        if let Some(tags) = update.tags {
            document.tags = tags;
        }
        if let Some(references) = update.references {
            document.references = references;
        }
        if let Some(content) = update.content {
            // A new body invalidates everything derived from it.
            document.file_size = content.chars().count();
            document.is_large_document = preview::is_large(&content);
            document.content_preview = document
                .is_large_document
                .then(|| preview::build_preview(&document.title, &content));
            document.content = content;
        }
        if let Some(one_liner) = update.one_liner {
            document.one_liner = Some(one_liner);
        }

        document.updated_at = Some(Utc::now());

        Ok(Some(document.clone()))
    }

    async fn remove_by_id(&self, id: Uuid) -> Result<u64, KennisbankError> {
        let mut inner = self.inner.write().await;
        Ok(inner.documents.remove(&id).map_or(0, |_| 1))
    }

    async fn search(&self, query: &str) -> Result<Vec<Document>, KennisbankError> {
        let query = query.to_lowercase();
        let inner = self.inner.read().await;

        Ok(inner
            .documents
            .values()
            .filter(|d| {
                d.title.to_lowercase().contains(&query)
                    || d.content.to_lowercase().contains(&query)
                    || d.tags.iter().any(|t| t.to_lowercase().contains(&query))
            })
            .take(SEARCH_LIMIT)
            .cloned()
            .collect())
    }

    async fn counts_by_category(&self) -> Result<HashMap<String, usize>, KennisbankError> {
        let inner = self.inner.read().await;

        let mut counts = HashMap::new();
        for document in inner.documents.values() {
            *counts.entry(document.category.clone()).or_insert(0) += 1;
        }

        Ok(counts)
    }
}

impl CategoryRepo for MemoryRepository {
    async fn get_by_name(&self, name: &str) -> Result<Option<Category>, KennisbankError> {
        let inner = self.inner.read().await;
        Ok(inner.categories.values().find(|c| c.name == name).cloned())
    }

    async fn list(&self) -> Result<Vec<Category>, KennisbankError> {
        let inner = self.inner.read().await;

        let mut categories: Vec<Category> = inner.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(categories)
    }

    async fn insert(&self, category: Category) -> Result<Category, KennisbankError> {
        let mut inner = self.inner.write().await;
        inner.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn remove_by_id(&self, id: Uuid) -> Result<u64, KennisbankError> {
        let mut inner = self.inner.write().await;
        Ok(inner.categories.remove(&id).map_or(0, |_| 1))
    }
}

impl ChatRepo for MemoryRepository {
    async fn insert_message(
        &self,
        message: ChatMessage,
    ) -> Result<ChatMessage, KennisbankError> {
        let mut inner = self.inner.write().await;
        inner.messages.push(message.clone());
        Ok(message)
    }

    async fn list_session(&self, session_id: &str) -> Result<Vec<ChatMessage>, KennisbankError> {
        let inner = self.inner.read().await;

        let mut messages: Vec<ChatMessage> = inner
            .messages
            .iter()
            .filter(|m| m.session_id == session_id)
            .cloned()
            .collect();

        messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

        Ok(messages)
    }
}
