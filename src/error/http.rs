use super::KennisbankError;
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tracing::error;

impl KennisbankError {
    pub fn status(&self) -> StatusCode {
        use KennisbankError as E;
        use StatusCode as SC;
        match self {
            E::EmptyContent(_) | E::UnsupportedFileType(_) | E::InvalidFileName(_) => {
                SC::BAD_REQUEST
            }
            E::Multipart(_) => SC::BAD_REQUEST,
            E::DoesNotExist(_) => SC::NOT_FOUND,
            E::AlreadyExists(_) => SC::CONFLICT,
            E::Validation(_) => SC::UNPROCESSABLE_ENTITY,
            E::Llm(_)
            | E::Transcription(_)
            | E::IO(_)
            | E::Fmt(_)
            | E::Utf8(_)
            | E::SerdeJson(_)
            | E::ParsePdf(_)
            | E::DocxRead(_)
            | E::Http(_)
            | E::Axum(_) => SC::INTERNAL_SERVER_ERROR,
            E::Reqwest(e) => e.status().unwrap_or(SC::INTERNAL_SERVER_ERROR),
        }
    }
}

/// Error response wrapper.
#[derive(Debug, Serialize)]
struct ResponseError<T: Serialize> {
    error_type: ErrorType,
    body: T,
}

impl<T> ResponseError<T>
where
    T: Serialize,
{
    pub fn new(error_type: ErrorType, body: T) -> Self {
        Self { error_type, body }
    }
}

#[derive(Debug, Serialize)]
enum ErrorType {
    Internal,
    Api,
}

impl<T> IntoResponse for ResponseError<T>
where
    T: Serialize,
{
    fn into_response(self) -> axum::response::Response {
        <Json<ResponseError<T>> as IntoResponse>::into_response(Json(self))
    }
}

impl IntoResponse for KennisbankError {
    fn into_response(self) -> axum::response::Response {
        error!("{self}");

        let status = self.status();

        use ErrorType as ET;
        use KennisbankError as KE;

        match self {
            KE::DoesNotExist(e)
            | KE::AlreadyExists(e)
            | KE::EmptyContent(e)
            | KE::UnsupportedFileType(e)
            | KE::InvalidFileName(e) => (status, ResponseError::new(ET::Api, e)).into_response(),

            KE::Validation(errors) => (status, ResponseError::new(ET::Api, errors)).into_response(),

            KE::Multipart(e) => {
                (status, ResponseError::new(ET::Api, e.to_string())).into_response()
            }

            KE::Llm(e) | KE::Transcription(e) => {
                (status, ResponseError::new(ET::Internal, e)).into_response()
            }

            KE::Reqwest(e) => {
                (status, ResponseError::new(ET::Internal, e.to_string())).into_response()
            }

            KE::IO(_)
            | KE::Fmt(_)
            | KE::Utf8(_)
            | KE::SerdeJson(_)
            | KE::ParsePdf(_)
            | KE::DocxRead(_)
            | KE::Http(_)
            | KE::Axum(_) => (status, self.to_string()).into_response(),
        }
    }
}
