use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub mod backend;
pub mod config_file;
pub mod mock;
pub mod payload;
pub mod request;

// Re-export for convenience
pub use backend::{BackendError, PdfBackend};
pub use payload::{PDF_SIGNATURE, check_signature, decode_payload};
pub use request::{ErrorBody, FILE_FIELD, ParseRequest, ParseResponse, validate_request};

/// Fallback `details` string when an extraction error carries no message.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Everything that can go wrong while handling a parse request.
///
/// Each variant maps to exactly one HTTP status in the web layer; none of
/// them is retried.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Method not allowed. Use POST.")]
    MethodNotAllowed,
    #[error("Missing or invalid \"fileBase64\" in request body.")]
    InvalidRequestBody,
    /// Base64 decode error, signature mismatch, or backend failure.
    #[error("Failed to parse PDF: {0}")]
    ExtractionFailure(String),
}

impl ParseError {
    /// The `error` string shown to clients.
    pub fn public_message(&self) -> &'static str {
        match self {
            ParseError::MethodNotAllowed => "Method not allowed. Use POST.",
            ParseError::InvalidRequestBody => {
                "Missing or invalid \"fileBase64\" in request body."
            }
            ParseError::ExtractionFailure(_) => "Failed to parse PDF.",
        }
    }

    /// The `details` string shown to clients, only set for extraction failures.
    pub fn details(&self) -> Option<String> {
        match self {
            ParseError::ExtractionFailure(msg) if msg.trim().is_empty() => {
                Some(UNKNOWN_ERROR.to_string())
            }
            ParseError::ExtractionFailure(msg) => Some(msg.clone()),
            _ => None,
        }
    }
}

impl From<BackendError> for ParseError {
    /// Keeps only the library message so `details` shows what the backend said.
    fn from(err: BackendError) -> Self {
        ParseError::ExtractionFailure(err.message().to_string())
    }
}

/// Which [`PdfBackend`] implementation the process is wired with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// MuPDF (`pdftext-mupdf`).
    #[default]
    Mupdf,
    /// Pure-Rust `pdf-extract` (`pdftext-pdf-extract`).
    PdfExtract,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Mupdf => "mupdf",
            BackendKind::PdfExtract => "pdf-extract",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mupdf" => Ok(BackendKind::Mupdf),
            "pdf-extract" | "pdf_extract" | "pdfextract" => Ok(BackendKind::PdfExtract),
            other => Err(format!(
                "unknown backend '{other}' (expected 'mupdf' or 'pdf-extract')"
            )),
        }
    }
}

/// Resolved runtime configuration.
///
/// Built from defaults, then the TOML cascade, then environment variables; see
/// [`config_file::resolve_config`].
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub backend: BackendKind,
    /// Reject payloads that do not start with `%PDF` before calling the backend.
    pub require_signature: bool,
    /// Maximum accepted request body, in MiB.
    pub max_body_mb: usize,
    /// Whole-request timeout in seconds. `0` disables it.
    pub request_timeout_secs: u64,
    /// Fraction of page height dropped from the top of each page (MuPDF only).
    pub header_exclusion: f32,
    /// Fraction of page height dropped from the bottom of each page (MuPDF only).
    pub footer_exclusion: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            backend: BackendKind::default(),
            require_signature: true,
            max_body_mb: 50,
            request_timeout_secs: 60,
            header_exclusion: 0.0,
            footer_exclusion: 0.0,
        }
    }
}

impl Config {
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            require_signature: self.require_signature,
        }
    }
}

/// Per-call knobs for the extraction pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    pub require_signature: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            require_signature: true,
        }
    }
}

/// Decode a base64 payload and extract its text with `backend`.
///
/// Pipeline:
/// 1. Base64-decode the payload
/// 2. Check the `%PDF` signature (unless disabled)
/// 3. Hand the bytes to the backend
pub fn extract_from_base64(
    encoded: &str,
    backend: &dyn PdfBackend,
    options: ExtractOptions,
) -> Result<String, ParseError> {
    let bytes = decode_payload(encoded)?;
    extract_from_bytes(&bytes, backend, options)
}

/// Extract text from already-decoded PDF bytes.
pub fn extract_from_bytes(
    bytes: &[u8],
    backend: &dyn PdfBackend,
    options: ExtractOptions,
) -> Result<String, ParseError> {
    if options.require_signature {
        check_signature(bytes)?;
    }

    tracing::debug!(backend = backend.name(), size = bytes.len(), "extracting text");
    let text = backend.extract_text(bytes)?;
    Ok(text)
}
