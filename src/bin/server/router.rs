use super::{
    api::ApiDoc,
    dto::{
        ChatPayload, ChatResponse, CreateBlogPayload, CreateCategoryPayload, ListDocumentsParams,
        MessageResponse, PasteDocumentPayload, SupplementAdvicePayload, SupplementAdviceResponse,
        TreatmentPlanPayload, TreatmentPlanResponse, UploadResponse,
    },
};
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Form, Json, Router,
};
use kennisbank::{
    app::state::ServiceState,
    core::{
        model::{
            category::Category,
            chat::ChatMessage,
            document::{is_image_file_type, Document, DocumentUpdate},
        },
        service::{
            blog::BlogInput,
            chat::{SupplementAdviceInput, TreatmentPlanInput},
            document::{OneLinerExport, Stats, DEFAULT_PASTE_CATEGORY, DEFAULT_UPLOAD_CATEGORY},
        },
    },
    error::KennisbankError,
};
use std::time::Duration;
use tower_http::{classify::ServerErrorsFailureClass, cors::CorsLayer, trace::TraceLayer};
use tracing::Span;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;
use validify::Validate;

pub fn router(state: ServiceState, origins: Option<Vec<String>>) -> Router {
    let cors = match origins {
        Some(origins) => {
            let origins = origins
                .into_iter()
                .map(|origin| {
                    tracing::debug!("Adding {origin} to allowed origins");
                    HeaderValue::from_str(&origin)
                })
                .map(Result::unwrap);

            CorsLayer::new()
                .allow_origin(tower_http::cors::AllowOrigin::list(origins))
                .allow_headers(tower_http::cors::Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::DELETE,
                    Method::PUT,
                    Method::PATCH,
                ])
        }
        None => CorsLayer::permissive(),
    };

    service_api(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http().on_failure(
            |error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                tracing::error!("{error}")
            },
        ))
        .layer(cors)
}

fn service_api(state: ServiceState) -> Router {
    Router::new()
        .route("/api/_health", get(health_check))
        .route("/api/documents/upload", post(upload_document))
        .route("/api/documents/voice", post(voice_document))
        .layer(DefaultBodyLimit::max(50_000_000))
        .route("/api/documents/paste", post(paste_document))
        .route("/api/documents", get(list_documents))
        .route("/api/documents/:id", get(get_document))
        .route("/api/documents/:id", put(update_document))
        .route("/api/documents/:id", delete(delete_document))
        .route("/api/documents/:id/file", get(download_original))
        .route(
            "/api/documents/:id/regenerate-oneliner",
            post(regenerate_one_liner),
        )
        .route("/api/documents/search/:query", get(search_documents))
        .route("/api/export/oneliners", get(export_one_liners))
        .route("/api/blog/create", post(create_blog))
        .route("/api/categories", get(list_categories))
        .route("/api/categories", post(create_category))
        .route("/api/categories/:id", delete(delete_category))
        .route("/api/chat", post(chat))
        .route("/api/chat/history/:session_id", get(chat_history))
        .route("/api/treatment-plan", post(treatment_plan))
        .route("/api/supplement-advice", post(supplement_advice))
        .route("/api/stats", get(stats))
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    "OK"
}

// Document router

#[utoipa::path(
    post,
    path = "/api/documents/upload",
    responses(
        (status = 200, description = "Document ingested", body = UploadResponse),
        (status = 400, description = "Empty or unsupported file"),
        (status = 500, description = "Internal server error")
    ),
    request_body = axum::extract::Multipart
)]
async fn upload_document(
    state: State<ServiceState>,
    mut form: Multipart,
) -> Result<Json<UploadResponse>, KennisbankError> {
    let mut file = None;
    let mut filename = None;
    let mut title = None;
    let mut category = None;

    while let Some(field) = form.next_field().await? {
        let Some(name) = field.name().map(String::from) else {
            continue;
        };

        match name.as_str() {
            "file" => {
                filename = field.file_name().map(String::from);
                file = Some(field.bytes().await?);
            }
            "title" => title = Some(field.text().await?),
            "category" => category = Some(field.text().await?),
            _ => continue,
        }
    }

    let (Some(file), Some(filename)) = (file, filename) else {
        return Err(KennisbankError::EmptyContent(
            "Geen bestand ontvangen".to_string(),
        ));
    };

    let category = category
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_UPLOAD_CATEGORY.to_string());

    let document = state
        .document
        .upload(&filename, title, category, file.to_vec())
        .await?;

    let message = if is_image_file_type(&document.file_type) {
        "Afbeelding succesvol geüpload"
    } else {
        "Document succesvol geüpload"
    };

    Ok(Json(UploadResponse {
        message: message.to_string(),
        document,
    }))
}

#[utoipa::path(
    post,
    path = "/api/documents/paste",
    responses(
        (status = 200, description = "Document ingested", body = UploadResponse),
        (status = 400, description = "Empty content"),
        (status = 422, description = "Validation error"),
        (status = 500, description = "Internal server error")
    ),
    request_body = PasteDocumentPayload
)]
async fn paste_document(
    state: State<ServiceState>,
    Form(payload): Form<PasteDocumentPayload>,
) -> Result<Json<UploadResponse>, KennisbankError> {
    payload.validate()?;

    let category = payload
        .category
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PASTE_CATEGORY.to_string());

    let document = state
        .document
        .paste(payload.title, payload.content, category)
        .await?;

    Ok(Json(UploadResponse {
        message: "Document succesvol toegevoegd".to_string(),
        document,
    }))
}

#[utoipa::path(
    post,
    path = "/api/documents/voice",
    responses(
        (status = 200, description = "Voice note transcribed and ingested", body = UploadResponse),
        (status = 400, description = "Empty audio or no speech recognized"),
        (status = 500, description = "Transcription failure")
    ),
    request_body = axum::extract::Multipart
)]
async fn voice_document(
    state: State<ServiceState>,
    mut form: Multipart,
) -> Result<Json<UploadResponse>, KennisbankError> {
    let mut audio = None;
    let mut filename = None;
    let mut title = None;
    let mut category = None;

    while let Some(field) = form.next_field().await? {
        let Some(name) = field.name().map(String::from) else {
            continue;
        };

        match name.as_str() {
            "audio" => {
                filename = field.file_name().map(String::from);
                audio = Some(field.bytes().await?);
            }
            "title" => title = Some(field.text().await?),
            "category" => category = Some(field.text().await?),
            _ => continue,
        }
    }

    let Some(audio) = audio else {
        return Err(KennisbankError::EmptyContent(
            "Geen audio ontvangen".to_string(),
        ));
    };

    let filename = filename.unwrap_or_else(|| "opname.wav".to_string());
    let title = title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| "Spraaknotitie".to_string());
    let category = category
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PASTE_CATEGORY.to_string());

    let document = state
        .document
        .voice(audio.to_vec(), &filename, title, category)
        .await?;

    Ok(Json(UploadResponse {
        message: "Document succesvol toegevoegd".to_string(),
        document,
    }))
}

#[utoipa::path(
    get,
    path = "/api/documents",
    responses(
        (status = 200, description = "List documents, newest first", body = Vec<Document>),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("category" = Option<String>, Query, description = "Category filter"),
    ),
)]
async fn list_documents(
    state: State<ServiceState>,
    Query(params): Query<ListDocumentsParams>,
) -> Result<Json<Vec<Document>>, KennisbankError> {
    let documents = state.document.list(params.category.as_deref()).await?;
    Ok(Json(documents))
}

#[utoipa::path(
    get,
    path = "/api/documents/{id}",
    responses(
        (status = 200, description = "Get document by id", body = Document),
        (status = 404, description = "Document not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "Document ID")
    )
)]
async fn get_document(
    state: State<ServiceState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Document>, KennisbankError> {
    let document = state.document.get(id).await?;
    Ok(Json(document))
}

#[utoipa::path(
    put,
    path = "/api/documents/{id}",
    responses(
        (status = 200, description = "Document updated", body = UploadResponse),
        (status = 400, description = "Empty content"),
        (status = 404, description = "Document not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "Document ID")
    ),
    request_body = DocumentUpdate
)]
async fn update_document(
    state: State<ServiceState>,
    Path(id): Path<Uuid>,
    Json(update): Json<DocumentUpdate>,
) -> Result<Json<UploadResponse>, KennisbankError> {
    let document = state.document.update(id, update).await?;

    Ok(Json(UploadResponse {
        message: "Document bijgewerkt".to_string(),
        document,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/documents/{id}",
    responses(
        (status = 200, description = "Document deleted", body = MessageResponse),
        (status = 404, description = "Document not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "Document ID")
    )
)]
async fn delete_document(
    state: State<ServiceState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, KennisbankError> {
    state.document.delete(id).await?;

    Ok(Json(MessageResponse {
        message: "Document verwijderd".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/documents/{id}/file",
    responses(
        (status = 200, description = "The retained original bytes"),
        (status = 404, description = "No original retained"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "Document ID")
    )
)]
async fn download_original(
    state: State<ServiceState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, KennisbankError> {
    let (bytes, content_type, filename) = state.document.original_file(id).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}

#[utoipa::path(
    get,
    path = "/api/documents/search/{query}",
    responses(
        (status = 200, description = "Matching documents", body = Vec<Document>),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("query" = String, Path, description = "Substring to match against title, content and tags")
    )
)]
async fn search_documents(
    state: State<ServiceState>,
    Path(query): Path<String>,
) -> Result<Json<Vec<Document>>, KennisbankError> {
    let documents = state.document.search(&query).await?;
    Ok(Json(documents))
}

#[utoipa::path(
    post,
    path = "/api/documents/{id}/regenerate-oneliner",
    responses(
        (status = 200, description = "Document with recomputed one-liner", body = Document),
        (status = 404, description = "Document not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "Document ID")
    )
)]
async fn regenerate_one_liner(
    state: State<ServiceState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Document>, KennisbankError> {
    let document = state.document.regenerate_one_liner(id).await?;
    Ok(Json(document))
}

#[utoipa::path(
    get,
    path = "/api/export/oneliners",
    responses(
        (status = 200, description = "One-liner rows for every document", body = Vec<OneLinerExport>),
        (status = 500, description = "Internal server error")
    )
)]
async fn export_one_liners(
    state: State<ServiceState>,
) -> Result<Json<Vec<OneLinerExport>>, KennisbankError> {
    let export = state.document.export_one_liners().await?;
    Ok(Json(export))
}

// Blog router

#[utoipa::path(
    post,
    path = "/api/blog/create",
    responses(
        (status = 200, description = "Blog article created", body = UploadResponse),
        (status = 404, description = "A source document does not exist"),
        (status = 422, description = "Validation error"),
        (status = 500, description = "Internal server error")
    ),
    request_body = CreateBlogPayload
)]
async fn create_blog(
    state: State<ServiceState>,
    Json(payload): Json<CreateBlogPayload>,
) -> Result<Json<UploadResponse>, KennisbankError> {
    payload.validate()?;

    let document = state
        .blog
        .create(BlogInput {
            title: payload.title,
            category: payload.category.unwrap_or_else(|| "blog".to_string()),
            source_document_ids: payload.source_document_ids,
            custom_instructions: payload.custom_instructions,
        })
        .await?;

    Ok(Json(UploadResponse {
        message: "Blogartikel aangemaakt".to_string(),
        document,
    }))
}

// Category router

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "List categories, name ascending", body = Vec<Category>),
        (status = 500, description = "Internal server error")
    )
)]
async fn list_categories(
    state: State<ServiceState>,
) -> Result<Json<Vec<Category>>, KennisbankError> {
    let categories = state.category.list().await?;
    Ok(Json(categories))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    responses(
        (status = 200, description = "Category created", body = Category),
        (status = 409, description = "Category already exists"),
        (status = 422, description = "Validation error"),
        (status = 500, description = "Internal server error")
    ),
    request_body = CreateCategoryPayload
)]
async fn create_category(
    state: State<ServiceState>,
    Json(payload): Json<CreateCategoryPayload>,
) -> Result<Json<Category>, KennisbankError> {
    payload.validate()?;

    let category = state
        .category
        .create(payload.name, payload.description)
        .await?;

    Ok(Json(category))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    responses(
        (status = 200, description = "Category deleted", body = MessageResponse),
        (status = 404, description = "Category not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "Category ID")
    )
)]
async fn delete_category(
    state: State<ServiceState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, KennisbankError> {
    state.category.delete(id).await?;

    Ok(Json(MessageResponse {
        message: "Categorie verwijderd".to_string(),
    }))
}

// Chat router

#[utoipa::path(
    post,
    path = "/api/chat",
    responses(
        (status = 200, description = "Assistant reply", body = ChatResponse),
        (status = 422, description = "Validation error"),
        (status = 500, description = "LLM failure")
    ),
    request_body = ChatPayload
)]
async fn chat(
    state: State<ServiceState>,
    Json(payload): Json<ChatPayload>,
) -> Result<Json<ChatResponse>, KennisbankError> {
    payload.validate()?;

    let response = state
        .chat
        .chat(
            &payload.session_id,
            &payload.message,
            payload.context_type.as_deref(),
        )
        .await?;

    Ok(Json(ChatResponse {
        response,
        session_id: payload.session_id,
    }))
}

#[utoipa::path(
    get,
    path = "/api/chat/history/{session_id}",
    responses(
        (status = 200, description = "Session messages, oldest first", body = Vec<ChatMessage>),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("session_id" = String, Path, description = "Chat session ID")
    )
)]
async fn chat_history(
    state: State<ServiceState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, KennisbankError> {
    let messages = state.chat.history(&session_id).await?;
    Ok(Json(messages))
}

#[utoipa::path(
    post,
    path = "/api/treatment-plan",
    responses(
        (status = 200, description = "Generated treatment plan", body = TreatmentPlanResponse),
        (status = 500, description = "LLM failure")
    ),
    request_body = TreatmentPlanPayload
)]
async fn treatment_plan(
    state: State<ServiceState>,
    Json(payload): Json<TreatmentPlanPayload>,
) -> Result<Json<TreatmentPlanResponse>, KennisbankError> {
    let treatment_plan = state
        .chat
        .treatment_plan(TreatmentPlanInput {
            patient_info: payload.patient_info,
            symptoms: payload.symptoms,
            diagnosis: payload.diagnosis,
        })
        .await?;

    Ok(Json(TreatmentPlanResponse { treatment_plan }))
}

#[utoipa::path(
    post,
    path = "/api/supplement-advice",
    responses(
        (status = 200, description = "Generated supplement advice", body = SupplementAdviceResponse),
        (status = 500, description = "LLM failure")
    ),
    request_body = SupplementAdvicePayload
)]
async fn supplement_advice(
    state: State<ServiceState>,
    Json(payload): Json<SupplementAdvicePayload>,
) -> Result<Json<SupplementAdviceResponse>, KennisbankError> {
    let advice = state
        .chat
        .supplement_advice(SupplementAdviceInput {
            condition: payload.condition,
            patient_details: payload.patient_details,
        })
        .await?;

    Ok(Json(SupplementAdviceResponse { advice }))
}

#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Knowledge base statistics", body = Stats),
        (status = 500, description = "Internal server error")
    )
)]
async fn stats(state: State<ServiceState>) -> Result<Json<Stats>, KennisbankError> {
    let stats = state.document.stats().await?;
    Ok(Json(stats))
}
