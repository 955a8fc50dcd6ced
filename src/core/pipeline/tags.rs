use crate::{core::llm::LlmChat, error::KennisbankError};
use tracing::warn;
use uuid::Uuid;

/// Upper bound on generated tags.
pub const MAX_TAGS: usize = 7;
/// Tags used when the LLM call fails.
pub const FALLBACK_TAGS: [&str; 2] = ["orthomoleculair", "kennis"];
/// Content sample length embedded in the prompt.
const CONTENT_SAMPLE: usize = 1000;

const SYSTEM: &str =
    "Je bent een expert in het taggen van medische en orthomoleculaire \
     documenten. Genereer 3-7 relevante tags in het Nederlands voor het \
     document.";

/// Generate topical tags for a document. Best-effort: any failure yields the
/// fixed [FALLBACK_TAGS] pair. Tag content is not validated beyond the count
/// cap.
pub async fn generate_tags(
    llm: &(dyn LlmChat + Send + Sync),
    title: &str,
    content: &str,
) -> Vec<String> {
    match try_generate(llm, title, content).await {
        Ok(tags) => tags,
        Err(e) => {
            warn!("Tag generation failed, using fallback: {e}");
            FALLBACK_TAGS.iter().map(ToString::to_string).collect()
        }
    }
}

async fn try_generate(
    llm: &(dyn LlmChat + Send + Sync),
    title: &str,
    content: &str,
) -> Result<Vec<String>, KennisbankError> {
    let sample: String = content.chars().take(CONTENT_SAMPLE).collect();

    let prompt = format!(
        "Genereer relevante tags voor dit document:\n\n\
         Titel: {title}\n\
         Inhoud: {sample}...\n\n\
         Geef alleen de tags terug, gescheiden door komma's. Gebruik maximaal \
         7 tags. Focus op:\n\
         - Hoofdonderwerpen\n\
         - Supplementen/kruiden die genoemd worden\n\
         - Aandoeningen/symptomen\n\
         - Therapeutische categorieën\n\n\
         Antwoord alleen met de tags, niets anders."
    );

    let session = Uuid::new_v4().to_string();
    let response = llm.complete(SYSTEM, &session, &prompt).await?;

    Ok(response
        .split(',')
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .take(MAX_TAGS)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::llm::test::{FailingChat, StubChat};

    #[tokio::test]
    async fn parses_comma_separated_tags() {
        let llm = StubChat::new(["vitamine C, weerstand , immuunsysteem"]);
        let tags = generate_tags(&llm, "Vitamine C", "Een stuk over vitamine C.").await;

        assert_eq!(tags, vec!["vitamine C", "weerstand", "immuunsysteem"]);
    }

    #[tokio::test]
    async fn caps_at_seven_tags() {
        let llm = StubChat::new(["a, b, c, d, e, f, g, h, i, j"]);
        let tags = generate_tags(&llm, "Titel", "Inhoud").await;

        assert_eq!(tags.len(), MAX_TAGS);
        assert_eq!(tags.last().unwrap(), "g");
    }

    #[tokio::test]
    async fn failure_yields_exact_fallback() {
        let tags = generate_tags(&FailingChat, "Titel", "Inhoud").await;

        assert_eq!(tags, vec!["orthomoleculair", "kennis"]);
    }
}
