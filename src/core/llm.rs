use crate::error::KennisbankError;

/// Stateless chat completion capability. The pipeline's tag, reference and
/// translation stages and the chat assistant all go through this seam so they
/// can be exercised with a stub.
#[async_trait::async_trait]
pub trait LlmChat {
    /// Send a single user message under the given system prompt and return the
    /// generated text. `session_id` groups related calls on the provider side;
    /// pipeline stages pass a fresh id per call.
    async fn complete(
        &self,
        system: &str,
        session_id: &str,
        message: &str,
    ) -> Result<String, KennisbankError>;
}

/// Speech to text capability for voice notes.
#[async_trait::async_trait]
pub trait Transcriber {
    async fn transcribe(&self, audio: &[u8], filename: &str) -> Result<String, KennisbankError>;
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use std::{collections::VecDeque, sync::Mutex};

    /// Replays canned responses in order; returns an error once exhausted.
    pub struct StubChat {
        replies: Mutex<VecDeque<String>>,
    }

    impl StubChat {
        pub fn new<const N: usize>(replies: [&str; N]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            }
        }
    }

    #[async_trait::async_trait]
    impl LlmChat for StubChat {
        async fn complete(
            &self,
            _system: &str,
            _session_id: &str,
            _message: &str,
        ) -> Result<String, KennisbankError> {
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| KennisbankError::Llm("stub exhausted".to_string()))
        }
    }

    /// Fails every call, for exercising fallback paths.
    pub struct FailingChat;

    #[async_trait::async_trait]
    impl LlmChat for FailingChat {
        async fn complete(
            &self,
            _system: &str,
            _session_id: &str,
            _message: &str,
        ) -> Result<String, KennisbankError> {
            Err(KennisbankError::Llm("stub failure".to_string()))
        }
    }

    pub struct StubTranscriber(pub &'static str);

    #[async_trait::async_trait]
    impl Transcriber for StubTranscriber {
        async fn transcribe(
            &self,
            _audio: &[u8],
            _filename: &str,
        ) -> Result<String, KennisbankError> {
            Ok(self.0.to_string())
        }
    }
}
