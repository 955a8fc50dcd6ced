#[rustfmt::skip]
use super::router::{
    // Documents
    __path_upload_document,
    __path_paste_document,
    __path_voice_document,
    __path_list_documents,
    __path_get_document,
    __path_update_document,
    __path_delete_document,
    __path_download_original,
    __path_search_documents,
    __path_regenerate_one_liner,
    __path_export_one_liners,
    // Blog
    __path_create_blog,
    // Categories
    __path_list_categories,
    __path_create_category,
    __path_delete_category,
    // Chat
    __path_chat,
    __path_chat_history,
    __path_treatment_plan,
    __path_supplement_advice,
    // Stats
    __path_stats,
};
use super::dto::{
    ChatPayload, ChatResponse, CreateBlogPayload, CreateCategoryPayload, MessageResponse,
    PasteDocumentPayload, SupplementAdvicePayload, SupplementAdviceResponse, TreatmentPlanPayload,
    TreatmentPlanResponse, UploadResponse,
};
use kennisbank::core::{
    model::{
        category::Category,
        chat::{ChatMessage, ChatRole},
        document::{BlogMeta, Document, DocumentUpdate},
    },
    service::document::{OneLinerExport, Stats},
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Documents
        upload_document,
        paste_document,
        voice_document,
        list_documents,
        get_document,
        update_document,
        delete_document,
        download_original,
        search_documents,
        regenerate_one_liner,
        export_one_liners,
        // Blog
        create_blog,
        // Categories
        list_categories,
        create_category,
        delete_category,
        // Chat
        chat,
        chat_history,
        treatment_plan,
        supplement_advice,
        // Stats
        stats,
    ),
    components(schemas(
        Document,
        BlogMeta,
        DocumentUpdate,
        Category,
        ChatMessage,
        ChatRole,
        OneLinerExport,
        Stats,
        UploadResponse,
        MessageResponse,
        PasteDocumentPayload,
        ChatPayload,
        ChatResponse,
        TreatmentPlanPayload,
        TreatmentPlanResponse,
        SupplementAdvicePayload,
        SupplementAdviceResponse,
        CreateBlogPayload,
        CreateCategoryPayload,
    ))
)]
pub struct ApiDoc;
