use std::sync::Arc;

use pdftext_core::{ExtractOptions, PdfBackend};

/// Shared application state accessible from all handlers.
///
/// Built once at startup and never mutated afterwards.
pub struct AppState {
    pub backend: Arc<dyn PdfBackend>,
    pub options: ExtractOptions,
}

impl AppState {
    pub fn new(backend: Arc<dyn PdfBackend>, options: ExtractOptions) -> Self {
        Self { backend, options }
    }
}
