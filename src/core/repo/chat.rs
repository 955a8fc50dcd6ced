use crate::{core::model::chat::ChatMessage, error::KennisbankError};
use std::future::Future;

/// Append-only store for chat turns.
pub trait ChatRepo {
    /// Append a message to its session.
    fn insert_message(
        &self,
        message: ChatMessage,
    ) -> impl Future<Output = Result<ChatMessage, KennisbankError>> + Send;

    /// All messages for a session, timestamp ascending.
    fn list_session(
        &self,
        session_id: &str,
    ) -> impl Future<Output = Result<Vec<ChatMessage>, KennisbankError>> + Send;
}
