use crate::{
    core::{
        llm::LlmChat,
        model::chat::{ChatMessage, ChatRole},
        repo::{chat::ChatRepo, document::DocumentRepo},
    },
    error::KennisbankError,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Documents included as context in a chat turn.
const CHAT_CONTEXT_LIMIT: usize = 3;
/// Content excerpt length per chat context document.
const CHAT_EXCERPT: usize = 200;
/// Documents included as context in supplement advice.
const ADVICE_CONTEXT_LIMIT: usize = 5;
/// Content excerpt length per advice context document.
const ADVICE_EXCERPT: usize = 300;

/// Categories and tags that mark a document as supplement knowledge.
const SUPPLEMENT_CATEGORIES: &[&str] = &["supplement", "kruiden"];
const SUPPLEMENT_TAGS: &[&str] = &["supplement", "kruiden", "gemmo"];

const SYSTEM_GENERAL: &str =
    "Je bent een expert orthomoleculair natuurgeneeskundige en kPNI therapeut. \
     Je helpt met het beantwoorden van vragen op basis van beschikbare kennis \
     over supplementen, kruiden, diagnostiek en behandelplannen.";
const SYSTEM_CONSULT: &str =
    "Je bent een consult-assistent voor een orthomoleculair natuurgeneeskundige \
     praktijk. Help bij het analyseren van patiëntsymptomen en adviseer over \
     mogelijke diagnostiek.";
const SYSTEM_TREATMENT: &str =
    "Je bent gespecialiseerd in het maken van behandelplannen voor \
     orthomoleculaire therapie en kPNI. Geef concrete en praktische \
     behandeladvies.";
const SYSTEM_SUPPLEMENT: &str =
    "Je bent expert in supplementen, kruiden en gemmo therapie. Geef \
     gedetailleerde adviezen over dosering en combinaties.";

const SYSTEM_TREATMENT_PLAN: &str =
    "Je bent een expert orthomoleculair therapeut gespecialiseerd in kPNI. \
     Maak gedetailleerde behandelplannen met specifieke aanbevelingen voor \
     supplementen, kruiden, leefstijl en aanvullende diagnostiek.";
const SYSTEM_ADVICE: &str =
    "Je bent expert in orthomoleculaire supplementen, kruiden en gemmo \
     therapie. Geef praktische en evidence-based adviezen.";

/// The practice assistant: session chat grounded in keyword-matched documents
/// plus the one-shot treatment plan and supplement advice generators.
#[derive(Clone)]
pub struct ChatService<R> {
    repo: R,
    llm: Arc<dyn LlmChat + Send + Sync>,
}

#[derive(Debug)]
pub struct TreatmentPlanInput {
    pub patient_info: String,
    pub symptoms: String,
    pub diagnosis: String,
}

#[derive(Debug)]
pub struct SupplementAdviceInput {
    pub condition: String,
    pub patient_details: String,
}

impl<R> ChatService<R>
where
    R: DocumentRepo + ChatRepo + Send + Sync,
{
    pub fn new(repo: R, llm: Arc<dyn LlmChat + Send + Sync>) -> Self {
        Self { repo, llm }
    }

    /// Run one chat turn. The user message is persisted before the LLM call,
    /// the assistant reply after; a failing call leaves the user message in
    /// the history.
    pub async fn chat(
        &self,
        session_id: &str,
        message: &str,
        context_type: Option<&str>,
    ) -> Result<String, KennisbankError> {
        self.repo
            .insert_message(ChatMessage::new(session_id, ChatRole::User, message.to_string()))
            .await?;

        let context = self.document_context(message).await?;
        let system = system_for(context_type);

        let response = self
            .llm
            .complete(system, session_id, &format!("{message}{context}"))
            .await?;

        self.repo
            .insert_message(ChatMessage::new(
                session_id,
                ChatRole::Assistant,
                response.clone(),
            ))
            .await?;

        info!("Chat turn completed for session {session_id}");

        Ok(response)
    }

    /// All messages for a session, timestamp ascending.
    pub async fn history(&self, session_id: &str) -> Result<Vec<ChatMessage>, KennisbankError> {
        self.repo.list_session(session_id).await
    }

    /// Generate a structured treatment plan. One-shot, no history.
    pub async fn treatment_plan(
        &self,
        input: TreatmentPlanInput,
    ) -> Result<String, KennisbankError> {
        let prompt = format!(
            "Maak een uitgebreid behandelplan voor de volgende patiënt:\n\n\
             Patiënt informatie: {}\n\
             Symptomen: {}\n\
             Diagnose: {}\n\n\
             Geef een gestructureerd behandelplan met:\n\
             1. Orthomoleculaire supplementen (met dosering)\n\
             2. Kruidenadvies\n\
             3. Gemmo therapie suggesties\n\
             4. Leefstijladviezen\n\
             5. Aanvullende diagnostiek indien nodig\n\
             6. Tijdslijn en evaluatiemomenten",
            input.patient_info, input.symptoms, input.diagnosis
        );

        let session = Uuid::new_v4().to_string();
        self.llm.complete(SYSTEM_TREATMENT_PLAN, &session, &prompt).await
    }

    /// Generate supplement and herb advice, grounded in the supplement corner
    /// of the knowledge base.
    pub async fn supplement_advice(
        &self,
        input: SupplementAdviceInput,
    ) -> Result<String, KennisbankError> {
        let context = self.supplement_context().await?;

        let prompt = format!(
            "Geef supplement- en kruidenadvies voor:\n\n\
             Conditie: {}\n\
             Patiënt details: {}\n\n\
             Geef advies over:\n\
             1. Aanbevolen supplementen met dosering\n\
             2. Kruidenpreparaten\n\
             3. Gemmo therapie\n\
             4. Combinatie-adviezen\n\
             5. Contra-indicaties\n\
             6. Interacties met andere middelen\n\
             {context}",
            input.condition, input.patient_details
        );

        let session = Uuid::new_v4().to_string();
        self.llm.complete(SYSTEM_ADVICE, &session, &prompt).await
    }

    /// Up to [CHAT_CONTEXT_LIMIT] documents matching the first word of the
    /// message, rendered as a context block for the prompt.
    async fn document_context(&self, message: &str) -> Result<String, KennisbankError> {
        let Some(keyword) = message.split_whitespace().next() else {
            return Ok(String::new());
        };

        let documents = self.repo.search(keyword).await?;
        if documents.is_empty() {
            return Ok(String::new());
        }

        let mut context = String::from("\n\nRelevante documenten uit de kennisbank:\n");
        for document in documents.iter().take(CHAT_CONTEXT_LIMIT) {
            let excerpt: String = document.content.chars().take(CHAT_EXCERPT).collect();
            context.push_str(&format!("- {}: {excerpt}...\n", document.title));
        }

        Ok(context)
    }

    async fn supplement_context(&self) -> Result<String, KennisbankError> {
        let documents = self.repo.list(None).await?;

        let relevant: Vec<_> = documents
            .into_iter()
            .filter(|d| {
                SUPPLEMENT_CATEGORIES.contains(&d.category.as_str())
                    || d.tags.iter().any(|t| SUPPLEMENT_TAGS.contains(&t.as_str()))
            })
            .take(ADVICE_CONTEXT_LIMIT)
            .collect();

        if relevant.is_empty() {
            return Ok(String::new());
        }

        let mut context = String::from("\n\nRelevante informatie uit kennisbank:\n");
        for document in &relevant {
            let excerpt: String = document.content.chars().take(ADVICE_EXCERPT).collect();
            context.push_str(&format!("- {}: {excerpt}...\n", document.title));
        }

        Ok(context)
    }
}

/// Unknown or absent context types fall back to the general assistant.
fn system_for(context_type: Option<&str>) -> &'static str {
    match context_type {
        Some("consult") => SYSTEM_CONSULT,
        Some("treatment") => SYSTEM_TREATMENT,
        Some("supplement") => SYSTEM_SUPPLEMENT,
        _ => SYSTEM_GENERAL,
    }
}
