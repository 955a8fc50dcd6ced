use crate::{
    core::{
        llm::LlmChat,
        model::document::{BlogMeta, Document, FILE_TYPE_BLOG},
        pipeline::{preview, tags},
        repo::document::DocumentRepo,
    },
    error::KennisbankError,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Characters of each source document included in the writing prompt.
const SOURCE_SAMPLE: usize = 1500;
/// Meta description length cap, per common SEO guidance.
const META_DESCRIPTION_MAX: usize = 155;

const SYSTEM: &str =
    "Je bent een ervaren schrijver van blogartikelen over orthomoleculaire \
     geneeskunde en kPNI. Schrijf toegankelijke, goed gestructureerde \
     artikelen in het Nederlands op basis van aangeleverde bronnen.";

/// Assembles blog articles out of stored documents.
#[derive(Clone)]
pub struct BlogService<R> {
    repo: R,
    llm: Arc<dyn LlmChat + Send + Sync>,
}

#[derive(Debug)]
pub struct BlogInput {
    pub title: String,
    pub category: String,
    pub source_document_ids: Vec<Uuid>,
    pub custom_instructions: Option<String>,
}

impl<R> BlogService<R>
where
    R: DocumentRepo + Send + Sync,
{
    pub fn new(repo: R, llm: Arc<dyn LlmChat + Send + Sync>) -> Self {
        Self { repo, llm }
    }

    /// Write a blog article from the given source documents and persist it as
    /// a regular document with blog metadata attached.
    ///
    /// Every source id must resolve before anything is written; a missing id
    /// aborts the whole operation. The article body comes from the LLM, with
    /// a fixed template standing in when the call fails.
    pub async fn create(&self, input: BlogInput) -> Result<Document, KennisbankError> {
        let mut sources = Vec::with_capacity(input.source_document_ids.len());

        for id in &input.source_document_ids {
            let document = self.repo.get_by_id(*id).await?.ok_or_else(|| {
                KennisbankError::DoesNotExist(format!("Brondocument met ID {id}"))
            })?;
            sources.push(document);
        }

        let content = self.write_body(&input, &sources).await;
        let blog_tags = tags::generate_tags(&*self.llm, &input.title, &content).await;

        let is_large = preview::is_large(&content);
        let content_preview = is_large.then(|| preview::build_preview(&input.title, &content));
        let one_liner = preview::one_liner(&input.title, &content);
        let file_size = content.chars().count();

        let meta = BlogMeta {
            meta_title: input.title.clone(),
            meta_description: meta_description(&content),
            url_slug: slugify(&input.title),
            featured_image_url: None,
            source_document_ids: input.source_document_ids,
            custom_instructions: input.custom_instructions,
        };

        let document = Document {
            id: Uuid::new_v4(),
            title: input.title,
            category: input.category,
            file_type: FILE_TYPE_BLOG.to_string(),
            content,
            content_preview,
            is_large_document: is_large,
            one_liner: Some(one_liner),
            tags: blog_tags,
            references: vec![],
            file_size,
            original_filename: None,
            has_original_file: false,
            original_file_id: None,
            original_language: None,
            was_translated: false,
            blog: Some(meta),
            created_at: Utc::now(),
            updated_at: None,
        };

        let document = self.repo.insert(document).await?;
        info!("Created blog article '{}' ({})", document.title, document.id);

        Ok(document)
    }

    async fn write_body(&self, input: &BlogInput, sources: &[Document]) -> String {
        let mut source_block = String::new();
        for source in sources {
            let excerpt: String = source.content.chars().take(SOURCE_SAMPLE).collect();
            source_block.push_str(&format!("## Bron: {}\n{excerpt}\n\n", source.title));
        }

        let instructions = input
            .custom_instructions
            .as_deref()
            .unwrap_or("Geen aanvullende instructies.");

        let prompt = format!(
            "Schrijf een blogartikel met de titel \"{}\".\n\n\
             Aanvullende instructies: {instructions}\n\n\
             Gebruik onderstaande bronnen uit de kennisbank:\n\n{source_block}\
             Schrijf het volledige artikel in het Nederlands, met een inleiding, \
             tussenkoppen en een afsluiting. Antwoord alleen met het artikel.",
            input.title
        );

        let session = Uuid::new_v4().to_string();
        match self.llm.complete(SYSTEM, &session, &prompt).await {
            Ok(body) if !body.trim().is_empty() => body,
            Ok(_) => template_body(input),
            Err(e) => {
                warn!("Blog body generation failed, using template: {e}");
                template_body(input)
            }
        }
    }
}

/// Placeholder article used when the model is unavailable.
fn template_body(input: &BlogInput) -> String {
    let mut body = format!(
        "# {title}\n\n\
         Binnen de orthomoleculaire praktijk speelt {lower} een belangrijke \
         rol. Dit artikel bundelt de kennis uit onze eigen documenten over dit \
         onderwerp.\n\n\
         ## Achtergrond\n\n\
         De orthomoleculaire benadering zoekt naar de onderliggende oorzaken \
         van klachten en ondersteunt het lichaam met voeding, supplementen en \
         leefstijl.\n\n\
         ## Praktische toepassing\n\n\
         Overleg altijd met een gekwalificeerd therapeut voordat je met \
         suppletie start.\n",
        title = input.title,
        lower = input.title.to_lowercase(),
    );

    if let Some(instructions) = &input.custom_instructions {
        body.push_str(&format!("\n## Aandachtspunten\n\n{instructions}\n"));
    }

    body
}

/// Bounded plain-text summary for the meta description tag.
fn meta_description(content: &str) -> String {
    let flat: String = content
        .chars()
        .map(|c| if c == '\n' { ' ' } else { c })
        .filter(|c| *c != '#')
        .collect();
    let flat = flat.split_whitespace().collect::<Vec<_>>().join(" ");

    if flat.chars().count() <= META_DESCRIPTION_MAX {
        return flat;
    }

    let cut: String = flat.chars().take(META_DESCRIPTION_MAX - 3).collect();
    format!("{}...", cut.trim_end())
}

/// Lowercased, hyphenated URL slug.
fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_hyphen = true;

    for c in title.to_lowercase().chars() {
        if c.is_alphanumeric() {
            slug.push(c);
            last_hyphen = false;
        } else if !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }

    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::repo::memory::MemoryRepository,
        core::llm::test::{FailingChat, StubChat},
        core::model::document::FILE_TYPE_TEXT,
    };

    fn source_document(title: &str) -> Document {
        Document {
            id: Uuid::new_v4(),
            title: title.to_string(),
            category: "artikel".to_string(),
            file_type: FILE_TYPE_TEXT.to_string(),
            content: "Magnesium ondersteunt spierontspanning en energie.".to_string(),
            content_preview: None,
            is_large_document: false,
            one_liner: None,
            tags: vec![],
            references: vec![],
            file_size: 50,
            original_filename: None,
            has_original_file: false,
            original_file_id: None,
            original_language: None,
            was_translated: false,
            blog: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn slugify_hyphenates_and_lowercases() {
        assert_eq!(slugify("Magnesium & Stress"), "magnesium-stress");
        assert_eq!(slugify("  Vitamine D3! "), "vitamine-d3");
        assert_eq!(slugify("Darmflora"), "darmflora");
    }

    #[test]
    fn meta_description_is_bounded() {
        let long = "magnesium ".repeat(100);
        let description = meta_description(&long);

        assert!(description.chars().count() <= META_DESCRIPTION_MAX);
        assert!(description.ends_with("..."));

        assert_eq!(meta_description("Kort stukje."), "Kort stukje.");
    }

    #[tokio::test]
    async fn create_assembles_article_with_metadata() {
        let repo = MemoryRepository::new();
        let source = repo.insert(source_document("Magnesium basics")).await.unwrap();

        let llm = Arc::new(StubChat::new([
            "Magnesium is een mineraal dat betrokken is bij vele processen.",
            "magnesium, mineralen",
        ]));
        let service = BlogService::new(repo.clone(), llm);

        let article = service
            .create(BlogInput {
                title: "Alles over Magnesium".to_string(),
                category: "blog".to_string(),
                source_document_ids: vec![source.id],
                custom_instructions: None,
            })
            .await
            .unwrap();

        assert_eq!(article.file_type, FILE_TYPE_BLOG);
        let meta = article.blog.as_ref().unwrap();
        assert_eq!(meta.url_slug, "alles-over-magnesium");
        assert_eq!(meta.source_document_ids, vec![source.id]);
        assert!(article.content.contains("mineraal"));
        assert!(article.one_liner.is_some());
    }

    #[tokio::test]
    async fn missing_source_writes_nothing() {
        let repo = MemoryRepository::new();
        let service = BlogService::new(repo.clone(), Arc::new(FailingChat));

        let result = service
            .create(BlogInput {
                title: "Test".to_string(),
                category: "blog".to_string(),
                source_document_ids: vec![Uuid::new_v4()],
                custom_instructions: None,
            })
            .await;

        assert!(matches!(result, Err(KennisbankError::DoesNotExist(_))));
        assert!(repo.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn llm_failure_falls_back_to_template() {
        let repo = MemoryRepository::new();
        let source = repo.insert(source_document("Bron")).await.unwrap();
        let service = BlogService::new(repo.clone(), Arc::new(FailingChat));

        let article = service
            .create(BlogInput {
                title: "Magnesium".to_string(),
                category: "blog".to_string(),
                source_document_ids: vec![source.id],
                custom_instructions: Some("Noem de dosering.".to_string()),
            })
            .await
            .unwrap();

        assert!(article.content.contains("# Magnesium"));
        assert!(article.content.contains("Noem de dosering."));
        assert_eq!(article.tags, vec!["orthomoleculair", "kennis"]);
    }
}
