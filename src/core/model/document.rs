use crate::error::KennisbankError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// The `file_type` assigned to pasted text documents.
pub const FILE_TYPE_TEXT: &str = "text";
/// The `file_type` assigned to transcribed voice notes.
pub const FILE_TYPE_VOICE: &str = "voice";
/// The `file_type` assigned to generated blog articles.
pub const FILE_TYPE_BLOG: &str = "blog_article";

/// Main knowledge base record. `content` always holds the Dutch normalized
/// text; if the source was English, the original is recoverable only via
/// `original_language`, not from `content`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Document {
    /// Primary key.
    pub id: Uuid,

    /// Display name.
    pub title: String,

    /// Free form classification, e.g. "artikel", "aantekening", "supplement".
    pub category: String,

    /// Origin kind; a file extension, "text", "voice" or "blog_article".
    pub file_type: String,

    /// Full normalized text body. Never empty after ingestion.
    pub content: String,

    /// Extractive excerpt, present only for large documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_preview: Option<String>,

    /// Whether `content` exceeds the large document threshold.
    pub is_large_document: bool,

    /// Rule based single sentence summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_liner: Option<String>,

    /// Topical tags, at most 7.
    pub tags: Vec<String>,

    /// Extracted citations, at most 10.
    pub references: Vec<String>,

    /// Character count of `content`, or the raw byte count for images.
    pub file_size: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,

    /// Whether the original uploaded bytes are retained in blob storage.
    pub has_original_file: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_file_id: Option<Uuid>,

    /// Pre-translation language code, set only when the content was translated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_language: Option<String>,

    pub was_translated: bool,

    /// SEO and provenance fields, present only for blog articles.
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub blog: Option<BlogMeta>,

    pub created_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// SEO metadata and provenance for generated blog articles. Blog articles are
/// stored in the same collection as regular documents with
/// `file_type = "blog_article"`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BlogMeta {
    pub meta_title: String,
    pub meta_description: String,
    pub url_slug: String,
    /// Serialized as an explicit `null` until an image is attached, so the
    /// blog shape always carries the field.
    pub featured_image_url: Option<String>,
    pub source_document_ids: Vec<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,
}

/// DTO for partial updates. Only supplied fields change; every update stamps
/// `updated_at`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DocumentUpdate {
    pub title: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub references: Option<Vec<String>>,
    pub content: Option<String>,
    #[serde(skip)]
    pub one_liner: Option<String>,
}

/// All file types the ingestion pipeline accepts from uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    /// Anything that can be read as a string directly.
    Text,

    /// DOCX document, paragraphs only.
    Docx,

    /// PDF document.
    Pdf,

    /// Image; bypasses text extraction, bytes are retained as the original.
    Image(ImageFormat),
}

impl DocumentType {
    pub fn try_from_file_name(name: &str) -> Result<Self, KennisbankError> {
        let Some((_, ext)) = name.rsplit_once('.') else {
            return Err(KennisbankError::UnsupportedFileType(format!(
                "{name} - missing extension"
            )));
        };
        Self::try_from(ext)
    }

    pub fn is_image(&self) -> bool {
        matches!(self, DocumentType::Image(_))
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentType::Text => write!(f, "txt"),
            DocumentType::Docx => write!(f, "docx"),
            DocumentType::Pdf => write!(f, "pdf"),
            DocumentType::Image(format) => write!(f, "{format}"),
        }
    }
}

impl TryFrom<&str> for DocumentType {
    type Error = KennisbankError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "txt" => Ok(Self::Text),
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            ext => ImageFormat::try_from(ext)
                .map(Self::Image)
                .map_err(|_| KennisbankError::UnsupportedFileType(value.to_owned())),
        }
    }
}

/// Image formats whose bytes are stored unmodified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpg,
    Jpeg,
    Png,
    Gif,
    Bmp,
    Webp,
}

impl ImageFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpg | ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Webp => "image/webp",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageFormat::Jpg => write!(f, "jpg"),
            ImageFormat::Jpeg => write!(f, "jpeg"),
            ImageFormat::Png => write!(f, "png"),
            ImageFormat::Gif => write!(f, "gif"),
            ImageFormat::Bmp => write!(f, "bmp"),
            ImageFormat::Webp => write!(f, "webp"),
        }
    }
}

impl TryFrom<&str> for ImageFormat {
    type Error = KennisbankError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "jpg" => Ok(Self::Jpg),
            "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "gif" => Ok(Self::Gif),
            "bmp" => Ok(Self::Bmp),
            "webp" => Ok(Self::Webp),
            _ => Err(KennisbankError::UnsupportedFileType(value.to_owned())),
        }
    }
}

/// Whether a stored `file_type` string denotes an image upload.
pub fn is_image_file_type(file_type: &str) -> bool {
    ImageFormat::try_from(file_type).is_ok()
}

/// Media type used when serving a retained original, derived from the stored
/// `file_type` string.
pub fn content_type_for(file_type: &str) -> &'static str {
    match file_type {
        "pdf" => "application/pdf",
        ext => ImageFormat::try_from(ext)
            .map(|f| f.content_type())
            .unwrap_or("application/octet-stream"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_type_from_file_name() {
        assert!(matches!(
            DocumentType::try_from_file_name("verslag.pdf"),
            Ok(DocumentType::Pdf)
        ));
        assert!(matches!(
            DocumentType::try_from_file_name("aantekening.TXT"),
            Ok(DocumentType::Text)
        ));
        assert!(matches!(
            DocumentType::try_from_file_name("schema.png"),
            Ok(DocumentType::Image(ImageFormat::Png))
        ));
        assert!(matches!(
            DocumentType::try_from_file_name("archief.zip"),
            Err(KennisbankError::UnsupportedFileType(_))
        ));
        assert!(matches!(
            DocumentType::try_from_file_name("zonder_extensie"),
            Err(KennisbankError::UnsupportedFileType(_))
        ));
    }

    #[test]
    fn image_file_types() {
        assert!(is_image_file_type("png"));
        assert!(is_image_file_type("webp"));
        assert!(!is_image_file_type("pdf"));
        assert!(!is_image_file_type("txt"));
    }

    #[test]
    fn content_types() {
        assert_eq!(content_type_for("pdf"), "application/pdf");
        assert_eq!(content_type_for("jpg"), "image/jpeg");
        assert_eq!(content_type_for("voice"), "application/octet-stream");
    }

    #[test]
    fn blog_fields_are_flattened_into_the_document() {
        let document = Document {
            id: Uuid::new_v4(),
            title: "Artikel".to_string(),
            category: "blog".to_string(),
            file_type: FILE_TYPE_BLOG.to_string(),
            content: "Tekst.".to_string(),
            content_preview: None,
            is_large_document: false,
            one_liner: None,
            tags: vec![],
            references: vec![],
            file_size: 6,
            original_filename: None,
            has_original_file: false,
            original_file_id: None,
            original_language: None,
            was_translated: false,
            blog: Some(BlogMeta {
                meta_title: "Artikel".to_string(),
                meta_description: "Tekst.".to_string(),
                url_slug: "artikel".to_string(),
                featured_image_url: None,
                source_document_ids: vec![],
                custom_instructions: None,
            }),
            created_at: chrono::Utc::now(),
            updated_at: None,
        };

        let value = serde_json::to_value(&document).unwrap();

        // Blog metadata lives at the top level, not under a nested key.
        assert_eq!(value["url_slug"], "artikel");
        assert!(value.get("blog").is_none());
        // An unset featured image is a null field, not an absent one.
        assert_eq!(value["featured_image_url"], serde_json::Value::Null);
        // Absent optionals are omitted entirely.
        assert!(value.get("content_preview").is_none());
        assert!(value.get("original_language").is_none());
    }
}
