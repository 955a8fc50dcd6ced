use crate::{core::llm::LlmChat, error::KennisbankError};
use tracing::warn;
use uuid::Uuid;

/// Upper bound on extracted references.
pub const MAX_REFERENCES: usize = 10;
/// Literal token the model returns when no references were found.
const NONE_TOKEN: &str = "GEEN";
/// Content sample length embedded in the prompt.
const CONTENT_SAMPLE: usize = 2000;

const SYSTEM: &str =
    "Je bent een expert in het identificeren van wetenschappelijke referenties \
     en bronnen in medische documenten.";

/// Extract citations from content. Best-effort: any failure yields an empty
/// list and never propagates to the caller.
pub async fn extract_references(llm: &(dyn LlmChat + Send + Sync), content: &str) -> Vec<String> {
    match try_extract(llm, content).await {
        Ok(references) => references,
        Err(e) => {
            warn!("Reference extraction failed: {e}");
            vec![]
        }
    }
}

async fn try_extract(
    llm: &(dyn LlmChat + Send + Sync),
    content: &str,
) -> Result<Vec<String>, KennisbankError> {
    let sample: String = content.chars().take(CONTENT_SAMPLE).collect();

    let session = Uuid::new_v4().to_string();
    let response = llm.complete(SYSTEM, &session, &prompt(&sample)).await?;

    if response.trim().to_uppercase() == NONE_TOKEN {
        return Ok(vec![]);
    }

    // Lines starting with a dash are formatting artifacts, not content.
    Ok(response
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('-'))
        .map(String::from)
        .take(MAX_REFERENCES)
        .collect())
}

fn prompt(sample: &str) -> String {
    format!(
        "Analyseer deze tekst en identificeer alle referenties, bronnen, \
         studies of citaten:\n\n\
         {sample}...\n\n\
         Geef alleen de gevonden referenties terug, elke referentie op een \
         nieuwe regel.\n\
         Als er geen referenties zijn, antwoord dan met: GEEN\n\n\
         Formaat:\n\
         - Auteur (jaar) - Titel\n\
         - Journal naam, volume, pagina's\n\
         - URL indien vermeld\n\n\
         Antwoord alleen met de referenties of GEEN."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::llm::test::{FailingChat, StubChat};

    #[tokio::test]
    async fn parses_one_reference_per_line() {
        let llm = StubChat::new(["Smith (2019) - Vitamin D and immunity\n\nJansen (2021) - Magnesium"]);
        let refs = extract_references(&llm, "inhoud").await;

        assert_eq!(
            refs,
            vec![
                "Smith (2019) - Vitamin D and immunity",
                "Jansen (2021) - Magnesium"
            ]
        );
    }

    #[tokio::test]
    async fn geen_token_yields_empty_any_case() {
        for reply in ["GEEN", "geen", "  Geen  \n"] {
            let llm = StubChat::new([reply]);
            assert!(extract_references(&llm, "inhoud").await.is_empty());
        }
    }

    #[tokio::test]
    async fn drops_dash_lines() {
        let llm = StubChat::new(["- kopje\nSmith (2019) - Vitamin D\n- nog een kopje"]);
        let refs = extract_references(&llm, "inhoud").await;

        assert_eq!(refs, vec!["Smith (2019) - Vitamin D"]);
    }

    #[tokio::test]
    async fn caps_at_ten_references() {
        let reply = (1..=15)
            .map(|i| format!("Bron {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let llm = StubChat::new([reply.as_str()]);
        let refs = extract_references(&llm, "inhoud").await;

        assert_eq!(refs.len(), MAX_REFERENCES);
    }

    #[tokio::test]
    async fn failure_yields_empty() {
        assert!(extract_references(&FailingChat, "inhoud").await.is_empty());
    }

    #[test]
    fn prompt_format_examples_keep_their_dashes() {
        let prompt = prompt("inhoud");

        assert!(prompt.contains(
            "Formaat:\n- Auteur (jaar) - Titel\n- Journal naam, volume, pagina's\n- URL indien vermeld"
        ));
        assert!(prompt.contains("inhoud..."));
    }
}
