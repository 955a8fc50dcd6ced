use crate::{
    core::llm::{LlmChat, Transcriber},
    error::KennisbankError,
};
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    multipart,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

fn client(api_key: &str) -> reqwest::Client {
    let mut headers = HeaderMap::new();

    let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
        .expect("invalid api key characters");
    auth.set_sensitive(true);
    headers.insert(header::AUTHORIZATION, auth);

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .expect("unable to build client")
}

/// Chat completion client for any OpenAI compatible endpoint.
#[derive(Clone)]
pub struct OpenAiChat {
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiChat {
    /// `endpoint` is the API base, e.g. `https://api.openai.com/v1`.
    pub fn new(endpoint: &str, api_key: &str, model: &str) -> Self {
        Self {
            endpoint: format!("{}/chat/completions", endpoint.trim_end_matches('/')),
            model: model.to_string(),
            client: client(api_key),
        }
    }
}

#[async_trait::async_trait]
impl LlmChat for OpenAiChat {
    async fn complete(
        &self,
        system: &str,
        session_id: &str,
        message: &str,
    ) -> Result<String, KennisbankError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: message.to_string(),
                },
            ],
            user: session_id.to_string(),
        };

        debug!("Requesting completion for session {session_id}");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<CompletionResponse>()
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| KennisbankError::Llm("completion response without choices".to_string()))
    }
}

/// Speech to text client for any OpenAI compatible endpoint.
#[derive(Clone)]
pub struct OpenAiTranscriber {
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiTranscriber {
    pub fn new(endpoint: &str, api_key: &str, model: &str) -> Self {
        Self {
            endpoint: format!("{}/audio/transcriptions", endpoint.trim_end_matches('/')),
            model: model.to_string(),
            client: client(api_key),
        }
    }
}

#[async_trait::async_trait]
impl Transcriber for OpenAiTranscriber {
    async fn transcribe(&self, audio: &[u8], filename: &str) -> Result<String, KennisbankError> {
        let form = multipart::Form::new()
            .text("model", self.model.clone())
            .part(
                "file",
                multipart::Part::bytes(audio.to_vec()).file_name(filename.to_string()),
            );

        debug!("Transcribing '{filename}' ({} bytes)", audio.len());

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json::<TranscriptionResponse>()
            .await?;

        Ok(response.text)
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<Message>,
    user: String,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}
