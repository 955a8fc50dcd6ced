use crate::{
    core::{
        blob::BlobStore,
        document::parser::{DocumentParser, Parser},
        llm::{LlmChat, Transcriber},
        model::document::{
            content_type_for, Document, DocumentType, DocumentUpdate, FILE_TYPE_TEXT,
            FILE_TYPE_VOICE,
        },
        pipeline::{language, preview, references, tags},
        repo::document::DocumentRepo,
    },
    error::KennisbankError,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// Default category for uploaded files.
pub const DEFAULT_UPLOAD_CATEGORY: &str = "artikel";
/// Default category for pasted text and voice notes.
pub const DEFAULT_PASTE_CATEGORY: &str = "aantekening";

/// High level operations for knowledge base documents: the ingestion pipeline
/// plus plain CRUD over the repository.
#[derive(Clone)]
pub struct DocumentService<R, B> {
    repo: R,
    blob: B,
    llm: Arc<dyn LlmChat + Send + Sync>,
    transcriber: Arc<dyn Transcriber + Send + Sync>,
}

/// Caller supplied input for one ingestion run.
#[derive(Debug)]
pub struct DocumentIngest {
    pub title: String,
    pub category: String,
    pub file_type: String,
    pub content: String,
    /// Original bytes to retain in blob storage (PDFs only; images take the
    /// dedicated image path).
    pub original: Option<OriginalFile>,
}

#[derive(Debug)]
pub struct OriginalFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// One row of the one-liner export, for spreadsheet/automation consumption.
#[derive(Debug, Serialize, ToSchema)]
pub struct OneLinerExport {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub one_liner: Option<String>,
    pub tags: Vec<String>,
    pub created_date: String,
}

/// Knowledge base statistics.
#[derive(Debug, Serialize, ToSchema)]
pub struct Stats {
    pub total_documents: usize,
    pub categories: std::collections::HashMap<String, usize>,
}

impl<R, B> DocumentService<R, B>
where
    R: DocumentRepo + Send + Sync,
    B: BlobStore + Send + Sync,
{
    pub fn new(
        repo: R,
        blob: B,
        llm: Arc<dyn LlmChat + Send + Sync>,
        transcriber: Arc<dyn Transcriber + Send + Sync>,
    ) -> Self {
        Self {
            repo,
            blob,
            llm,
            transcriber,
        }
    }

    /// Run the full pipeline on an uploaded file and persist the result.
    ///
    /// Extraction and the non-empty check are mandatory; nothing is written
    /// when they fail. Images bypass extraction entirely.
    pub async fn upload(
        &self,
        filename: &str,
        title: Option<String>,
        category: String,
        file: Vec<u8>,
    ) -> Result<Document, KennisbankError> {
        let ty = DocumentType::try_from_file_name(filename)?;
        let title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| title_from_filename(filename));

        if ty.is_image() {
            return self.ingest_image(title, category, ty, filename, file).await;
        }

        let content = Parser::new(ty)?.parse(&file)?;

        if content.trim().is_empty() {
            return Err(KennisbankError::EmptyContent(
                "Geen tekst gevonden in bestand".to_string(),
            ));
        }

        // Only PDFs retain their original bytes.
        let original = (ty == DocumentType::Pdf).then(|| OriginalFile {
            filename: filename.to_string(),
            bytes: file,
        });

        self.ingest(DocumentIngest {
            title,
            category,
            file_type: ty.to_string(),
            content,
            original,
        })
        .await
    }

    /// Create a document from pasted text. Skips the extraction stage.
    pub async fn paste(
        &self,
        title: String,
        content: String,
        category: String,
    ) -> Result<Document, KennisbankError> {
        self.ingest(DocumentIngest {
            title,
            category,
            file_type: FILE_TYPE_TEXT.to_string(),
            content,
            original: None,
        })
        .await
    }

    /// Transcribe a voice note and ingest the transcript. Transcription is
    /// mandatory; its failure aborts the ingestion.
    pub async fn voice(
        &self,
        audio: Vec<u8>,
        filename: &str,
        title: String,
        category: String,
    ) -> Result<Document, KennisbankError> {
        if audio.is_empty() {
            return Err(KennisbankError::EmptyContent(
                "Geen audio ontvangen".to_string(),
            ));
        }

        let transcript = self.transcriber.transcribe(&audio, filename).await?;

        if transcript.trim().is_empty() {
            return Err(KennisbankError::EmptyContent(
                "Geen spraak herkend in de opname".to_string(),
            ));
        }

        self.ingest(DocumentIngest {
            title,
            category,
            file_type: FILE_TYPE_VOICE.to_string(),
            content: transcript,
            original: None,
        })
        .await
    }

    /// The assembler: runs the enrichment stages over already extracted
    /// content, combines their outputs with the caller metadata and writes
    /// the record. There is no rollback across the blob and record writes.
    pub async fn ingest(&self, input: DocumentIngest) -> Result<Document, KennisbankError> {
        if input.content.trim().is_empty() {
            return Err(KennisbankError::EmptyContent(
                "Inhoud mag niet leeg zijn".to_string(),
            ));
        }

        let normalized = language::normalize(&*self.llm, &input.title, &input.content).await;
        let tags = tags::generate_tags(&*self.llm, &input.title, &normalized.content).await;
        let references = references::extract_references(&*self.llm, &normalized.content).await;

        let is_large = preview::is_large(&normalized.content);
        let content_preview =
            is_large.then(|| preview::build_preview(&input.title, &normalized.content));
        let one_liner = preview::one_liner(&input.title, &normalized.content);

        let mut original_filename = None;
        let mut original_file_id = None;

        if let Some(original) = &input.original {
            let id = self.blob.write(&original.filename, &original.bytes).await?;
            original_filename = Some(original.filename.clone());
            original_file_id = Some(id);
        }

        let file_size = normalized.content.chars().count();

        let document = Document {
            id: Uuid::new_v4(),
            title: input.title,
            category: input.category,
            file_type: input.file_type,
            content: normalized.content,
            content_preview,
            is_large_document: is_large,
            one_liner: Some(one_liner),
            tags,
            references,
            file_size,
            original_filename,
            has_original_file: original_file_id.is_some(),
            original_file_id,
            original_language: normalized.translated.then(|| normalized.language.clone()),
            was_translated: normalized.translated,
            blog: None,
            created_at: Utc::now(),
            updated_at: None,
        };

        let document = self.repo.insert(document).await?;
        info!("Ingested document '{}' ({})", document.title, document.id);

        Ok(document)
    }

    /// Images skip extraction, language normalization and reference
    /// extraction; a placeholder body is stored and the bytes are retained.
    async fn ingest_image(
        &self,
        title: String,
        category: String,
        ty: DocumentType,
        filename: &str,
        file: Vec<u8>,
    ) -> Result<Document, KennisbankError> {
        let content = format!(
            "[Afbeelding: {filename}]\n\nDit is een afbeelding. Bekijk het \
             origineel in de document viewer."
        );

        let tag_context = format!("Dit is een afbeelding met de naam: {title}");
        let tags = tags::generate_tags(&*self.llm, &title, &tag_context).await;

        let file_size = file.len();
        let blob_id = self.blob.write(filename, &file).await?;
        let one_liner = preview::one_liner(&title, &content);

        let document = Document {
            id: Uuid::new_v4(),
            title,
            category,
            file_type: ty.to_string(),
            content,
            content_preview: None,
            is_large_document: false,
            one_liner: Some(one_liner),
            tags,
            references: vec![],
            file_size,
            original_filename: Some(filename.to_string()),
            has_original_file: true,
            original_file_id: Some(blob_id),
            original_language: None,
            was_translated: false,
            blog: None,
            created_at: Utc::now(),
            updated_at: None,
        };

        let document = self.repo.insert(document).await?;
        info!("Ingested image '{}' ({})", document.title, document.id);

        Ok(document)
    }

    pub async fn get(&self, id: Uuid) -> Result<Document, KennisbankError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| KennisbankError::DoesNotExist(format!("Document met ID {id}")))
    }

    pub async fn list(&self, category: Option<&str>) -> Result<Vec<Document>, KennisbankError> {
        self.repo.list(category).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Document>, KennisbankError> {
        self.repo.search(query).await
    }

    /// Partial update. A content change recomputes the derived fields so the
    /// preview invariants keep holding.
    pub async fn update(
        &self,
        id: Uuid,
        mut update: DocumentUpdate,
    ) -> Result<Document, KennisbankError> {
        if let Some(content) = &update.content {
            if content.trim().is_empty() {
                return Err(KennisbankError::EmptyContent(
                    "Inhoud mag niet leeg zijn".to_string(),
                ));
            }
            let existing = self.get(id).await?;
            let title = update.title.as_deref().unwrap_or(&existing.title);
            update.one_liner = Some(preview::one_liner(title, content));
        }

        self.repo
            .update(id, update)
            .await?
            .ok_or_else(|| KennisbankError::DoesNotExist(format!("Document met ID {id}")))
    }

    /// Remove the record and best-effort delete the retained original.
    pub async fn delete(&self, id: Uuid) -> Result<(), KennisbankError> {
        let document = self.get(id).await?;

        let removed = self.repo.remove_by_id(id).await?;
        if removed == 0 {
            return Err(KennisbankError::DoesNotExist(format!("Document met ID {id}")));
        }

        if let Some(blob_id) = document.original_file_id {
            if let Err(e) = self.blob.delete(blob_id).await {
                warn!("Could not delete original {blob_id}: {e}");
            }
        }

        Ok(())
    }

    /// The retained original bytes plus serving metadata.
    pub async fn original_file(
        &self,
        id: Uuid,
    ) -> Result<(Vec<u8>, &'static str, String), KennisbankError> {
        let document = self.get(id).await?;

        let Some(blob_id) = document.original_file_id.filter(|_| document.has_original_file)
        else {
            return Err(KennisbankError::DoesNotExist(
                "Origineel bestand niet beschikbaar".to_string(),
            ));
        };

        let bytes = self.blob.read(blob_id).await?;
        let content_type = content_type_for(&document.file_type);
        let filename = document
            .original_filename
            .unwrap_or_else(|| "document".to_string());

        Ok((bytes, content_type, filename))
    }

    /// Recompute and persist the rule based one-liner.
    pub async fn regenerate_one_liner(&self, id: Uuid) -> Result<Document, KennisbankError> {
        let document = self.get(id).await?;
        let one_liner = preview::one_liner(&document.title, &document.content);

        self.repo
            .update(
                id,
                DocumentUpdate {
                    one_liner: Some(one_liner),
                    ..Default::default()
                },
            )
            .await?
            .ok_or_else(|| KennisbankError::DoesNotExist(format!("Document met ID {id}")))
    }

    /// Dump every document's one-liner row for external consumption.
    pub async fn export_one_liners(&self) -> Result<Vec<OneLinerExport>, KennisbankError> {
        Ok(self
            .repo
            .list(None)
            .await?
            .into_iter()
            .map(|d| OneLinerExport {
                id: d.id,
                title: d.title,
                category: d.category,
                one_liner: d.one_liner,
                tags: d.tags,
                created_date: d.created_at.format("%Y-%m-%d").to_string(),
            })
            .collect())
    }

    pub async fn stats(&self) -> Result<Stats, KennisbankError> {
        let categories = self.repo.counts_by_category().await?;
        Ok(Stats {
            total_documents: categories.values().sum(),
            categories,
        })
    }
}

fn title_from_filename(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map(|(stem, _)| stem.to_string())
        .unwrap_or_else(|| filename.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::{blob::FsBlobStore, repo::memory::MemoryRepository},
        core::llm::test::{FailingChat, StubChat, StubTranscriber},
    };

    const DUTCH_NOTE: &str =
        "Magnesium speelt een rol bij honderden enzymatische processen en wordt \
         binnen de orthomoleculaire praktijk vaak ingezet bij spierkrampen, \
         vermoeidheid en stressklachten. Een tekort komt geregeld voor bij \
         mensen met een eenzijdig voedingspatroon.";

    fn service(
        dir: &str,
        llm: Arc<dyn LlmChat + Send + Sync>,
    ) -> (
        MemoryRepository,
        DocumentService<MemoryRepository, FsBlobStore>,
    ) {
        std::fs::create_dir_all(dir).unwrap();
        let repo = MemoryRepository::new();
        let service = DocumentService::new(
            repo.clone(),
            FsBlobStore::new(dir),
            llm,
            Arc::new(StubTranscriber("")),
        );
        (repo, service)
    }

    #[tokio::test]
    async fn paste_small_dutch_note() {
        let dir = "__doc_service_paste_test";
        let llm = Arc::new(StubChat::new(["nl", "magnesium, spierkrampen", "GEEN"]));
        let (repo, service) = service(dir, llm);

        let document = service
            .paste(
                "Test".to_string(),
                DUTCH_NOTE.to_string(),
                DEFAULT_PASTE_CATEGORY.to_string(),
            )
            .await
            .unwrap();

        assert!(!document.is_large_document);
        assert!(document.content_preview.is_none());
        assert_eq!(document.content, DUTCH_NOTE);
        assert!(document.tags.len() <= 7);
        assert_eq!(document.file_type, "text");
        assert_eq!(document.file_size, DUTCH_NOTE.chars().count());
        assert!(!document.was_translated);
        assert!(document.original_language.is_none());

        let stored = repo.get_by_id(document.id).await.unwrap().unwrap();
        assert_eq!(stored.content, DUTCH_NOTE);

        tokio::fs::remove_dir_all(dir).await.unwrap();
    }

    #[tokio::test]
    async fn paste_whitespace_only_writes_nothing() {
        let dir = "__doc_service_empty_test";
        let (repo, service) = service(dir, Arc::new(FailingChat));

        let result = service
            .paste(
                "Leeg".to_string(),
                "   \n\t ".to_string(),
                DEFAULT_PASTE_CATEGORY.to_string(),
            )
            .await;

        assert!(matches!(result, Err(KennisbankError::EmptyContent(_))));
        assert!(repo.list(None).await.unwrap().is_empty());

        tokio::fs::remove_dir_all(dir).await.unwrap();
    }

    #[tokio::test]
    async fn paste_large_content_gets_preview() {
        let dir = "__doc_service_large_test";
        let llm = Arc::new(StubChat::new(["nl", "vitamine", "GEEN"]));
        let (_, service) = service(dir, llm);

        let content = "Vitamine C ondersteunt de weerstand van het lichaam.\n".repeat(60);
        let document = service
            .paste("Vitamine C".to_string(), content.clone(), "artikel".to_string())
            .await
            .unwrap();

        assert!(document.is_large_document);
        let preview = document.content_preview.as_deref().unwrap();
        assert!(preview.contains(&format!("{} tekens", content.chars().count())));
        assert!(document.one_liner.is_some());

        tokio::fs::remove_dir_all(dir).await.unwrap();
    }

    #[tokio::test]
    async fn llm_failure_still_ingests_with_fallbacks() {
        let dir = "__doc_service_fallback_test";
        let (_, service) = service(dir, Arc::new(FailingChat));

        let document = service
            .paste("Test".to_string(), DUTCH_NOTE.to_string(), "artikel".to_string())
            .await
            .unwrap();

        assert_eq!(document.tags, vec!["orthomoleculair", "kennis"]);
        assert!(document.references.is_empty());
        assert_eq!(document.content, DUTCH_NOTE);
        assert!(!document.was_translated);

        tokio::fs::remove_dir_all(dir).await.unwrap();
    }

    #[tokio::test]
    async fn upload_unsupported_extension_is_rejected() {
        let dir = "__doc_service_unsupported_test";
        let (repo, service) = service(dir, Arc::new(FailingChat));

        let result = service
            .upload("archief.zip", None, "artikel".to_string(), vec![1, 2, 3])
            .await;

        assert!(matches!(
            result,
            Err(KennisbankError::UnsupportedFileType(_))
        ));
        assert!(repo.list(None).await.unwrap().is_empty());

        tokio::fs::remove_dir_all(dir).await.unwrap();
    }

    #[tokio::test]
    async fn upload_without_extractable_text_writes_nothing() {
        let dir = "__doc_service_blank_file_test";
        let (repo, service) = service(dir, Arc::new(FailingChat));

        let result = service
            .upload("leeg.txt", None, "artikel".to_string(), b"  \n\t ".to_vec())
            .await;

        let Err(KennisbankError::EmptyContent(message)) = result else {
            panic!("expected empty content error");
        };
        assert_eq!(message, "Geen tekst gevonden in bestand");
        assert!(repo.list(None).await.unwrap().is_empty());

        // No blob was retained either.
        let mut entries = tokio::fs::read_dir(dir).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());

        tokio::fs::remove_dir_all(dir).await.unwrap();
    }

    #[tokio::test]
    async fn upload_txt_uses_filename_as_title() {
        let dir = "__doc_service_txt_test";
        let llm = Arc::new(StubChat::new(["nl", "magnesium", "GEEN"]));
        let (_, service) = service(dir, llm);

        let document = service
            .upload(
                "magnesium-notitie.txt",
                None,
                DEFAULT_UPLOAD_CATEGORY.to_string(),
                DUTCH_NOTE.as_bytes().to_vec(),
            )
            .await
            .unwrap();

        assert_eq!(document.title, "magnesium-notitie");
        assert_eq!(document.file_type, "txt");
        assert!(!document.has_original_file);

        tokio::fs::remove_dir_all(dir).await.unwrap();
    }

    #[tokio::test]
    async fn image_upload_stores_placeholder_and_original() {
        let dir = "__doc_service_image_test";
        let llm = Arc::new(StubChat::new(["anatomie, schema"]));
        let (_, service) = service(dir, llm);

        let bytes = vec![0u8; 128];
        let document = service
            .upload(
                "schema.png",
                Some("Anatomie schema".to_string()),
                "artikel".to_string(),
                bytes.clone(),
            )
            .await
            .unwrap();

        assert_eq!(document.file_type, "png");
        assert!(document.content.contains("Dit is een afbeelding"));
        assert!(document.has_original_file);
        assert_eq!(document.file_size, bytes.len());

        let (original, content_type, filename) =
            service.original_file(document.id).await.unwrap();
        assert_eq!(original, bytes);
        assert_eq!(content_type, "image/png");
        assert_eq!(filename, "schema.png");

        tokio::fs::remove_dir_all(dir).await.unwrap();
    }

    #[tokio::test]
    async fn voice_with_empty_audio_is_rejected() {
        let dir = "__doc_service_voice_test";
        let (repo, service) = service(dir, Arc::new(FailingChat));

        let result = service
            .voice(vec![], "opname.wav", "Opname".to_string(), "aantekening".to_string())
            .await;

        assert!(matches!(result, Err(KennisbankError::EmptyContent(_))));
        assert!(repo.list(None).await.unwrap().is_empty());

        tokio::fs::remove_dir_all(dir).await.unwrap();
    }

    #[tokio::test]
    async fn regenerate_one_liner_is_stable() {
        let dir = "__doc_service_oneliner_test";
        let llm = Arc::new(StubChat::new(["nl", "magnesium", "GEEN"]));
        let (_, service) = service(dir, llm);

        let document = service
            .paste("Magnesium".to_string(), DUTCH_NOTE.to_string(), "artikel".to_string())
            .await
            .unwrap();

        let first = service.regenerate_one_liner(document.id).await.unwrap();
        let second = service.regenerate_one_liner(document.id).await.unwrap();

        assert_eq!(first.one_liner, second.one_liner);
        assert_eq!(first.one_liner, document.one_liner);
        assert!(second.updated_at.is_some());

        tokio::fs::remove_dir_all(dir).await.unwrap();
    }

    #[tokio::test]
    async fn export_contains_every_document() {
        let dir = "__doc_service_export_test";
        let llm = Arc::new(StubChat::new(["nl", "a", "GEEN", "nl", "b", "GEEN"]));
        let (_, service) = service(dir, llm);

        service
            .paste("Eerste".to_string(), DUTCH_NOTE.to_string(), "artikel".to_string())
            .await
            .unwrap();
        service
            .paste("Tweede".to_string(), DUTCH_NOTE.to_string(), "supplement".to_string())
            .await
            .unwrap();

        let export = service.export_one_liners().await.unwrap();
        assert_eq!(export.len(), 2);
        assert!(export.iter().all(|row| row.one_liner.is_some()));

        let stats = service.stats().await.unwrap();
        assert_eq!(stats.total_documents, 2);
        assert_eq!(stats.categories.get("artikel"), Some(&1));

        tokio::fs::remove_dir_all(dir).await.unwrap();
    }
}
