use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request, State};
use axum::http::Method;

use pdftext_core::{ParseError, ParseResponse, extract_from_base64, validate_request};

use crate::error::Result;
use crate::state::AppState;

/// `POST /parse-pdf`: base64 PDF in, plain text out.
///
/// Mounted for every method so that non-POST requests get the JSON 405 body
/// instead of axum's empty default. The body is only read once the method
/// has been accepted, so an oversized GET is still a 405.
pub async fn parse_pdf(
    State(state): State<Arc<AppState>>,
    method: Method,
    request: Request,
) -> Result<Json<ParseResponse>> {
    if method != Method::POST {
        return Err(ParseError::MethodNotAllowed.into());
    }

    let body = Bytes::from_request(request, &()).await?;
    let encoded = validate_request(&body)?;
    tracing::debug!(
        backend = state.backend.name(),
        payload_len = encoded.len(),
        "parse request accepted"
    );

    // Both backends are synchronous and CPU bound.
    let backend = Arc::clone(&state.backend);
    let options = state.options;
    let text = tokio::task::spawn_blocking(move || {
        extract_from_base64(&encoded, backend.as_ref(), options)
    })
    .await
    .map_err(|e| ParseError::ExtractionFailure(format!("extraction task failed: {e}")))??;

    Ok(Json(ParseResponse { text }))
}
