use crate::{core::llm::LlmChat, error::KennisbankError};
use tracing::warn;
use uuid::Uuid;

/// Content shorter than this (trimmed) is assumed Dutch and never sent out
/// for detection.
pub const MIN_DETECTION_LEN: usize = 50;
/// Title sample length for the detection call.
const TITLE_SAMPLE: usize = 100;
/// Body sample length for the detection call.
const BODY_SAMPLE: usize = 300;

const DETECT_SYSTEM: &str =
    "Je bent een taaldetector voor medische en orthomoleculaire documenten. \
     Antwoord uitsluitend met een taalcode.";

const TRANSLATE_SYSTEM: &str =
    "Je bent een professionele vertaler gespecialiseerd in medische en \
     orthomoleculaire teksten. Vertaal getrouw naar het Nederlands en behoud \
     de structuur van de tekst.";

/// Output of the language normalization stage.
#[derive(Debug)]
pub struct Normalized {
    /// The Dutch normalized content. Identical to the input unless a
    /// translation took place.
    pub content: String,
    /// Detected language code: `nl`, `en`, `other` or `unknown` when
    /// detection failed.
    pub language: String,
    /// True iff the content was replaced with a translation.
    pub translated: bool,
}

/// Detect the content language and translate English content to Dutch.
///
/// Best-effort: any LLM failure returns the input unchanged with language
/// `unknown`. Detection is not authoritative; the model may classify
/// borderline text differently across calls.
pub async fn normalize(llm: &(dyn LlmChat + Send + Sync), title: &str, content: &str) -> Normalized {
    if content.trim().chars().count() < MIN_DETECTION_LEN {
        return Normalized {
            content: content.to_string(),
            language: "nl".to_string(),
            translated: false,
        };
    }

    let code = match detect(llm, title, content).await {
        Ok(code) => code,
        Err(e) => {
            warn!("Language detection failed: {e}");
            return Normalized {
                content: content.to_string(),
                language: "unknown".to_string(),
                translated: false,
            };
        }
    };

    if !code.contains("en") {
        return Normalized {
            content: content.to_string(),
            language: code,
            translated: false,
        };
    }

    match translate(llm, content).await {
        Ok(translated) => Normalized {
            content: translated,
            language: "en".to_string(),
            translated: true,
        },
        Err(e) => {
            warn!("Translation failed: {e}");
            Normalized {
                content: content.to_string(),
                language: "unknown".to_string(),
                translated: false,
            }
        }
    }
}

async fn detect(
    llm: &(dyn LlmChat + Send + Sync),
    title: &str,
    content: &str,
) -> Result<String, KennisbankError> {
    let title_sample: String = title.chars().take(TITLE_SAMPLE).collect();
    let body_sample: String = content.chars().take(BODY_SAMPLE).collect();

    let prompt = format!(
        "Bepaal de taal van dit document:\n\n\
         Titel: {title_sample}\n\
         Tekst: {body_sample}\n\n\
         Antwoord met precies één code: en, nl of other. Niets anders."
    );

    let session = Uuid::new_v4().to_string();
    let response = llm.complete(DETECT_SYSTEM, &session, &prompt).await?;

    Ok(response.trim().to_lowercase())
}

async fn translate(
    llm: &(dyn LlmChat + Send + Sync),
    content: &str,
) -> Result<String, KennisbankError> {
    let prompt = format!(
        "Vertaal de volgende tekst volledig naar het Nederlands. Behoud \
         alinea's, opsommingen en koppen. Antwoord alleen met de vertaling.\n\n\
         {content}"
    );

    let session = Uuid::new_v4().to_string();
    llm.complete(TRANSLATE_SYSTEM, &session, &prompt).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::llm::test::{FailingChat, StubChat};

    const ENGLISH: &str = "Vitamin D deficiency is associated with impaired immune function \
                           and low mood during the winter months.";

    #[tokio::test]
    async fn short_content_is_a_noop() {
        // The stub would fail when called; it must not be.
        let llm = StubChat::new([]);
        let out = normalize(&llm, "Kort", "Te kort om te detecteren.").await;

        assert_eq!(out.content, "Te kort om te detecteren.");
        assert_eq!(out.language, "nl");
        assert!(!out.translated);
    }

    #[tokio::test]
    async fn english_content_is_translated() {
        let llm = StubChat::new([
            "en",
            "Vitamine D-tekort hangt samen met een verminderde immuunfunctie.",
        ]);
        let out = normalize(&llm, "Vitamin D", ENGLISH).await;

        assert!(out.translated);
        assert_eq!(out.language, "en");
        assert_ne!(out.content, ENGLISH);
    }

    #[tokio::test]
    async fn dutch_content_passes_through() {
        let llm = StubChat::new(["nl"]);
        let content = "Vitamine C speelt een rol bij de weerstand en wordt veel \
                       toegepast binnen de orthomoleculaire praktijk.";
        let out = normalize(&llm, "Vitamine C", content).await;

        assert!(!out.translated);
        assert_eq!(out.language, "nl");
        assert_eq!(out.content, content);
    }

    #[tokio::test]
    async fn detection_failure_degrades_to_unknown() {
        let out = normalize(&FailingChat, "Titel", ENGLISH).await;

        assert!(!out.translated);
        assert_eq!(out.language, "unknown");
        assert_eq!(out.content, ENGLISH);
    }

    #[tokio::test]
    async fn translation_failure_degrades_to_unknown() {
        // Detection succeeds, translation call hits the exhausted stub.
        let llm = StubChat::new(["en"]);
        let out = normalize(&llm, "Vitamin D", ENGLISH).await;

        assert!(!out.translated);
        assert_eq!(out.language, "unknown");
        assert_eq!(out.content, ENGLISH);
    }
}
