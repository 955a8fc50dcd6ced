use std::string::FromUtf8Error;
use thiserror::Error;
use validify::ValidationErrors;

pub mod http;

#[derive(Debug, Error)]
pub enum KennisbankError {
    #[error("Does not exist; {0}")]
    DoesNotExist(String),

    #[error("Entity already exists; {0}")]
    AlreadyExists(String),

    #[error("Invalid file name; {0}")]
    InvalidFileName(String),

    #[error("Unsupported file type; {0}")]
    UnsupportedFileType(String),

    #[error("{0}")]
    EmptyContent(String),

    #[error("LLM; {0}")]
    Llm(String),

    #[error("Transcription; {0}")]
    Transcription(String),

    #[error("IO; {0}")]
    IO(#[from] std::io::Error),

    #[error("FMT; {0}")]
    Fmt(#[from] std::fmt::Error),

    #[error("UTF-8; {0}")]
    Utf8(#[from] FromUtf8Error),

    #[error("JSON error; {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Parse pdf; {0}")]
    ParsePdf(#[from] lopdf::Error),

    #[error("Docx read; {0}")]
    DocxRead(#[from] docx_rs::ReaderError),

    #[error("Validation; {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Http; {0}")]
    Http(#[from] axum::http::Error),

    #[error("Multipart; {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("Axum; {0}")]
    Axum(#[from] axum::Error),

    #[error("Reqwest; {0}")]
    Reqwest(#[from] reqwest::Error),
}
