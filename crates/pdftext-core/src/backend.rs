use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
}

impl BackendError {
    /// The library's own message, without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            BackendError::OpenError(msg) | BackendError::ExtractionError(msg) => msg,
        }
    }
}

/// Trait for PDF text extraction backends.
///
/// Implementors own the whole PDF side (tokenizing, fonts, content streams);
/// the request pipeline in [`crate::extract_from_base64`] only hands them the
/// decoded bytes and forwards whatever text or error comes back.
pub trait PdfBackend: Send + Sync {
    /// Short identifier used in logs and the health endpoint.
    fn name(&self) -> &str;

    /// Extract the full text content of an in-memory PDF.
    ///
    /// Page text is concatenated in page order, newline separated.
    fn extract_text(&self, bytes: &[u8]) -> Result<String, BackendError>;
}
