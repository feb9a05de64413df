//! HTTP surface for pdftext.
//!
//! The binary in `main.rs` only resolves configuration and serves the
//! [`Router`] built here; tests drive the same router in-process.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{any, get};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use pdftext_core::{BackendKind, Config, PdfBackend};
use pdftext_mupdf::MupdfBackend;
use pdftext_pdf_extract::PdfExtractBackend;

pub mod error;
pub mod handlers;
pub mod state;

pub use state::AppState;

/// Construct the extraction backend selected by `config`.
///
/// Called once at startup; every request shares the returned instance.
pub fn build_backend(config: &Config) -> Arc<dyn PdfBackend> {
    match config.backend {
        BackendKind::Mupdf => Arc::new(
            MupdfBackend::new()
                .with_header_exclusion(config.header_exclusion)
                .with_footer_exclusion(config.footer_exclusion),
        ),
        BackendKind::PdfExtract => Arc::new(PdfExtractBackend::new()),
    }
}

/// Build the application router with its middleware stack.
pub fn app(state: Arc<AppState>, config: &Config) -> Router {
    let body_limit = DefaultBodyLimit::max(config.max_body_mb.saturating_mul(1024 * 1024));

    let router = Router::new()
        .route("/parse-pdf", any(handlers::parse_pdf::parse_pdf))
        .route("/api/parse-pdf", any(handlers::parse_pdf::parse_pdf))
        .route("/health", get(handlers::health::health))
        .layer(body_limit)
        .with_state(state);

    let router = if config.request_timeout_secs > 0 {
        router.layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
    } else {
        router
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
