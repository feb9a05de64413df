use std::panic::{self, AssertUnwindSafe};

use pdftext_core::{BackendError, PdfBackend};

/// [`PdfBackend`] over the pure-Rust `pdf-extract` crate.
///
/// No C toolchain or AGPL dependency, at the cost of weaker handling of
/// unusual fonts. `pdf-extract` panics on some malformed documents instead of
/// returning an error, so every call runs under `catch_unwind`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractBackend;

impl PdfExtractBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for PdfExtractBackend {
    fn name(&self) -> &str {
        "pdf-extract"
    }

    fn extract_text(&self, bytes: &[u8]) -> Result<String, BackendError> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(bytes)
        }));

        match outcome {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(BackendError::ExtractionError(e.to_string())),
            Err(payload) => {
                let msg = panic_message(payload.as_ref());
                tracing::warn!(error = %msg, "pdf-extract panicked");
                Err(BackendError::ExtractionError(msg))
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "pdf-extract panicked".to_string()
    }
}
