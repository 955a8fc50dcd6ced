//! Http specific DTOs.

use kennisbank::core::model::document::Document;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validify::Validate;

#[derive(Debug, Serialize, ToSchema)]
pub(super) struct UploadResponse {
    pub message: String,
    pub document: Document,
}

#[derive(Debug, Serialize, ToSchema)]
pub(super) struct MessageResponse {
    pub message: String,
}

/// Form body for pasted text documents.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(super) struct PasteDocumentPayload {
    #[validate(length(min = 1))]
    pub title: String,

    pub content: String,

    /// Defaults to "aantekening".
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(super) struct ListDocumentsParams {
    /// Only return documents in this category.
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(super) struct ChatPayload {
    #[validate(length(min = 1))]
    pub session_id: String,

    #[validate(length(min = 1))]
    pub message: String,

    /// One of "general", "consult", "treatment", "supplement".
    /// Unknown values fall back to "general".
    pub context_type: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(super) struct ChatResponse {
    pub response: String,
    pub session_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(super) struct TreatmentPlanPayload {
    pub patient_info: String,
    pub symptoms: String,
    pub diagnosis: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(super) struct TreatmentPlanResponse {
    pub treatment_plan: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(super) struct SupplementAdvicePayload {
    pub condition: String,
    pub patient_details: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(super) struct SupplementAdviceResponse {
    pub advice: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(super) struct CreateBlogPayload {
    #[validate(length(min = 1))]
    pub title: String,

    /// Defaults to "blog".
    pub category: Option<String>,

    /// Documents whose content grounds the article. Every id must exist.
    #[validate(length(min = 1))]
    pub source_document_ids: Vec<Uuid>,

    pub custom_instructions: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(super) struct CreateCategoryPayload {
    #[validate(length(min = 1))]
    pub name: String,

    pub description: Option<String>,
}
