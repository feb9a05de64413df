use mupdf::{Document, TextPageFlags};

use pdftext_core::{BackendError, PdfBackend};

/// MIME type handed to MuPDF when opening a document from memory.
const PDF_MAGIC: &str = "application/pdf";

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency
/// (which is AGPL-3.0) so that the core and the alternate backend do not
/// transitively depend on it.
///
/// Header and footer bands are kept by default. Setting a ratio drops text
/// blocks that sit entirely inside the top (header) or start inside the
/// bottom (footer) fraction of each page, which keeps running heads and page
/// numbers out of the extracted text.
#[derive(Debug, Clone, Default)]
pub struct MupdfBackend {
    /// Fraction of page height from bottom to exclude as footer (0.0–1.0).
    /// `None` disables footer exclusion.
    footer_exclusion_ratio: Option<f32>,
    /// Fraction of page height from top to exclude as header (0.0–1.0).
    /// `None` disables header exclusion.
    header_exclusion_ratio: Option<f32>,
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the footer exclusion ratio. Pass `0.0` to disable.
    pub fn with_footer_exclusion(mut self, ratio: f32) -> Self {
        self.footer_exclusion_ratio = exclusion(ratio);
        self
    }

    /// Set the header exclusion ratio. Pass `0.0` to disable.
    pub fn with_header_exclusion(mut self, ratio: f32) -> Self {
        self.header_exclusion_ratio = exclusion(ratio);
        self
    }
}

fn exclusion(ratio: f32) -> Option<f32> {
    if ratio > 0.0 {
        Some(ratio.min(1.0))
    } else {
        None
    }
}

impl PdfBackend for MupdfBackend {
    fn name(&self) -> &str {
        "mupdf"
    }

    fn extract_text(&self, bytes: &[u8]) -> Result<String, BackendError> {
        let document = Document::from_bytes(bytes, PDF_MAGIC)
            .map_err(|e| BackendError::OpenError(e.to_string()))?;

        // MuPDF repairs unreadable input into an empty document instead of failing.
        let page_count = document
            .page_count()
            .map_err(|e| BackendError::OpenError(e.to_string()))?;
        if page_count == 0 {
            return Err(BackendError::OpenError("document has no pages".to_string()));
        }

        let mut pages_text = Vec::new();

        for page_result in document
            .pages()
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?
        {
            let page = page_result.map_err(|e| BackendError::ExtractionError(e.to_string()))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

            let page_bounds = page
                .bounds()
                .map_err(|e| BackendError::ExtractionError(e.to_string()))?;
            let page_height = page_bounds.y1 - page_bounds.y0;

            let header_threshold = self
                .header_exclusion_ratio
                .map(|r| page_bounds.y0 + page_height * r);
            let footer_threshold = self
                .footer_exclusion_ratio
                .map(|r| page_bounds.y1 - page_height * r);

            let mut page_text = String::new();
            for block in text_page.blocks() {
                let block_bounds = block.bounds();

                if let Some(threshold) = header_threshold
                    && block_bounds.y1 <= threshold
                {
                    continue;
                }
                if let Some(threshold) = footer_threshold
                    && block_bounds.y0 >= threshold
                {
                    continue;
                }

                for line in block.lines() {
                    let line_text: String = line
                        .chars()
                        .map(|c| c.char().unwrap_or('\u{FFFD}'))
                        .collect();
                    page_text.push_str(&line_text);
                    page_text.push('\n');
                }
            }
            pages_text.push(page_text);
        }

        Ok(pages_text.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclusion_defaults_off() {
        let backend = MupdfBackend::new();
        assert_eq!(backend.header_exclusion_ratio, None);
        assert_eq!(backend.footer_exclusion_ratio, None);
    }

    #[test]
    fn zero_ratio_disables_exclusion() {
        let backend = MupdfBackend::new()
            .with_header_exclusion(0.04)
            .with_footer_exclusion(0.05)
            .with_header_exclusion(0.0);
        assert_eq!(backend.header_exclusion_ratio, None);
        assert_eq!(backend.footer_exclusion_ratio, Some(0.05));
    }

    #[test]
    fn ratio_is_clamped() {
        let backend = MupdfBackend::new().with_footer_exclusion(3.0);
        assert_eq!(backend.footer_exclusion_ratio, Some(1.0));
    }
}
