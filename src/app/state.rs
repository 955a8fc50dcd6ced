use super::{blob::FsBlobStore, llm::openai::{OpenAiChat, OpenAiTranscriber}, repo::memory::MemoryRepository};
use crate::core::{
    llm::{LlmChat, Transcriber},
    service::{
        blog::BlogService, category::CategoryService, chat::ChatService,
        document::DocumentService,
    },
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
pub struct AppState {
    pub repository: MemoryRepository,
    pub blob_store: FsBlobStore,
    pub llm: Arc<dyn LlmChat + Send + Sync>,
    pub transcriber: Arc<dyn Transcriber + Send + Sync>,
}

impl AppState {
    /// Load the application state using the provided configuration.
    pub async fn new(args: &crate::config::StartArgs) -> Self {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from(args.log()))
            .init();

        let upload_path = args.upload_path();
        tokio::fs::create_dir_all(&upload_path)
            .await
            .expect("unable to create upload directory");

        let api_key = args.llm_api_key();
        let llm_url = args.llm_url();

        let llm: Arc<dyn LlmChat + Send + Sync> =
            Arc::new(OpenAiChat::new(&llm_url, &api_key, &args.llm_model()));
        let transcriber: Arc<dyn Transcriber + Send + Sync> = Arc::new(OpenAiTranscriber::new(
            &llm_url,
            &api_key,
            &args.transcription_model(),
        ));

        Self {
            repository: MemoryRepository::new(),
            blob_store: FsBlobStore::new(&upload_path),
            llm,
            transcriber,
        }
    }
}

/// Concrete service types used by the HTTP layer.
pub type AppDocumentService = DocumentService<MemoryRepository, FsBlobStore>;
pub type AppBlogService = BlogService<MemoryRepository>;
pub type AppChatService = ChatService<MemoryRepository>;
pub type AppCategoryService = CategoryService<MemoryRepository>;

#[derive(Clone)]
pub struct ServiceState {
    pub document: AppDocumentService,
    pub blog: AppBlogService,
    pub chat: AppChatService,
    pub category: AppCategoryService,
}

impl ServiceState {
    pub fn from_app_state(state: &AppState) -> Self {
        Self {
            document: DocumentService::new(
                state.repository.clone(),
                state.blob_store.clone(),
                state.llm.clone(),
                state.transcriber.clone(),
            ),
            blog: BlogService::new(state.repository.clone(), state.llm.clone()),
            chat: ChatService::new(state.repository.clone(), state.llm.clone()),
            category: CategoryService::new(state.repository.clone()),
        }
    }
}
