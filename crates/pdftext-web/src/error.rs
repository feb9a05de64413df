//! HTTP mapping for [`ParseError`] and body-read failures.

use axum::{
    Json,
    extract::rejection::BytesRejection,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use pdftext_core::{ErrorBody, ParseError};

/// Handler result type
pub type Result<T> = std::result::Result<T, ApiError>;

/// Everything a handler can fail with.
#[derive(Debug)]
pub enum ApiError {
    Parse(ParseError),
    /// The request body could not be buffered (too large, aborted stream).
    Body(BytesRejection),
}

impl From<ParseError> for ApiError {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        Self::Body(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = match self {
            ApiError::Parse(err) => err,
            ApiError::Body(rejection) => {
                let status = rejection.status();
                tracing::warn!(%status, error = %rejection.body_text(), "request body rejected");
                let body = ErrorBody {
                    error: rejection.body_text(),
                    details: None,
                };
                return (status, Json(body)).into_response();
            }
        };

        let body = Json(ErrorBody::from(&err));
        match &err {
            ParseError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, "POST")],
                body,
            )
                .into_response(),
            ParseError::InvalidRequestBody => (StatusCode::BAD_REQUEST, body).into_response(),
            ParseError::ExtractionFailure(msg) => {
                tracing::error!(error = %msg, "failed to parse PDF");
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}
