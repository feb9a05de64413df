//! Mock extraction backend for testing.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::backend::{BackendError, PdfBackend};

/// A configurable mock response for [`MockBackend`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Simulate a successful extraction.
    Text(String),
    /// Simulate a library failure with the given message.
    Error(String),
}

/// A hand-rolled mock implementing [`PdfBackend`] for tests.
///
/// Returns the same response for every call, counts calls and remembers the
/// last input so tests can assert on what reached the backend.
pub struct MockBackend {
    response: MockResponse,
    call_count: AtomicUsize,
    last_input: Mutex<Option<Vec<u8>>>,
}

impl MockBackend {
    /// Create a mock that always returns `response`.
    pub fn new(response: MockResponse) -> Self {
        Self {
            response,
            call_count: AtomicUsize::new(0),
            last_input: Mutex::new(None),
        }
    }

    /// How many times `extract_text()` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Bytes passed to the most recent `extract_text()` call.
    pub fn last_input(&self) -> Option<Vec<u8>> {
        self.last_input
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl PdfBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn extract_text(&self, bytes: &[u8]) -> Result<String, BackendError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_input.lock() {
            *last = Some(bytes.to_vec());
        }

        match &self.response {
            MockResponse::Text(text) => Ok(text.clone()),
            MockResponse::Error(msg) => Err(BackendError::ExtractionError(msg.clone())),
        }
    }
}
