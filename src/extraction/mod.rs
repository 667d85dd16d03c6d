//! Per-page text extraction with an OCR fallback for image-only pages.
//!
//! The native text layer is read with `lopdf`. Pages whose text layer is empty (or cannot be
//! decoded) are handed to an [`OcrEngine`]; OCR failures leave the page empty instead of
//! failing the document.

mod ocr;

pub use ocr::{DisabledOcr, OcrEngine, OcrError, TesseractOcr, build_ocr_engine};

use lopdf::Document;
use once_cell::unsync::OnceCell;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors that prevent a document from being read at all.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Input bytes are not a PDF `lopdf` can open.
    #[error("Unable to read PDF: {0}")]
    InvalidPdf(String),
}

/// Where a page's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    /// Embedded text layer.
    TextLayer,
    /// Optical character recognition on the rendered page.
    Ocr,
}

/// Raw, un-normalized text of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage {
    /// 1-based page number within the document.
    pub page_number: u32,
    /// Text as produced by the text layer or OCR.
    pub text: String,
    /// Origin of [`RawPage::text`].
    pub source: TextSource,
}

/// Uploaded PDF bytes plus a lazily written scratch copy for tools that need a path.
///
/// The scratch file is deleted when the value is dropped.
pub struct SourceDocument {
    bytes: Vec<u8>,
    scratch: OnceCell<NamedTempFile>,
}

impl SourceDocument {
    /// Wrap raw PDF bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            scratch: OnceCell::new(),
        }
    }

    /// Raw document bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Write the document to a temporary file (once) and return its path.
    pub fn materialize(&self) -> io::Result<&Path> {
        let file = self.scratch.get_or_try_init(|| {
            let mut file = tempfile::Builder::new()
                .prefix("smartsum-")
                .suffix(".pdf")
                .tempfile()?;
            file.write_all(&self.bytes)?;
            file.flush()?;
            Ok::<_, io::Error>(file)
        })?;
        Ok(file.path())
    }
}

/// Turns a document into ordered raw page texts.
pub trait PageExtractor: Send + Sync {
    /// Extract every page in document order. Pages that yield nothing are returned with empty
    /// text; only an unreadable document is an error.
    fn extract(&self, document: &SourceDocument) -> Result<Vec<RawPage>, ExtractionError>;
}

/// `lopdf`-backed extractor that falls back to OCR when a page has no text layer.
pub struct PdfPageExtractor {
    ocr: Arc<dyn OcrEngine>,
}

impl PdfPageExtractor {
    /// Build an extractor using `ocr` for image-only pages.
    pub fn new(ocr: Arc<dyn OcrEngine>) -> Self {
        Self { ocr }
    }

    fn ocr_page(&self, document: &SourceDocument, page_number: u32) -> String {
        match self.ocr.recognize_page(document, page_number) {
            Ok(text) => {
                tracing::debug!(page = page_number, chars = text.len(), "OCR completed");
                text
            }
            Err(error) => {
                tracing::warn!(page = page_number, error = %error, "OCR failed; treating page as empty");
                String::new()
            }
        }
    }
}

impl PageExtractor for PdfPageExtractor {
    fn extract(&self, document: &SourceDocument) -> Result<Vec<RawPage>, ExtractionError> {
        let pdf = Document::load_mem(document.bytes())
            .map_err(|error| ExtractionError::InvalidPdf(error.to_string()))?;
        let pages = pdf.get_pages();
        tracing::debug!(pages = pages.len(), "Opened PDF");

        let mut extracted = Vec::with_capacity(pages.len());
        for &page_number in pages.keys() {
            let native = pdf.extract_text(&[page_number]).unwrap_or_else(|error| {
                tracing::debug!(page = page_number, error = %error, "Text layer unreadable");
                String::new()
            });

            let page = if native.trim().is_empty() {
                RawPage {
                    page_number,
                    text: self.ocr_page(document, page_number),
                    source: TextSource::Ocr,
                }
            } else {
                RawPage {
                    page_number,
                    text: native,
                    source: TextSource::TextLayer,
                }
            };
            extracted.push(page);
        }

        Ok(extracted)
    }
}

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
mod tests {
    use super::test_support::build_pdf;
    use super::*;
    use std::sync::Mutex;

    struct RecordingOcr {
        reply: Result<&'static str, &'static str>,
        calls: Mutex<Vec<u32>>,
    }

    impl RecordingOcr {
        fn new(reply: Result<&'static str, &'static str>) -> Self {
            Self {
                reply,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl OcrEngine for RecordingOcr {
        fn recognize_page(
            &self,
            _document: &SourceDocument,
            page_number: u32,
        ) -> Result<String, OcrError> {
            self.calls.lock().expect("lock").push(page_number);
            self.reply
                .map(str::to_string)
                .map_err(|message| OcrError::ToolFailed {
                    tool: "stub".into(),
                    details: message.into(),
                })
        }
    }

    #[test]
    fn text_layer_pages_skip_ocr() {
        let ocr = Arc::new(RecordingOcr::new(Ok("unused")));
        let extractor = PdfPageExtractor::new(ocr.clone());
        let document = SourceDocument::new(build_pdf(&[Some("Hello world")]));

        let pages = extractor.extract(&document).expect("pages");

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page_number, 1);
        assert_eq!(pages[0].source, TextSource::TextLayer);
        assert!(pages[0].text.contains("Hello world"));
        assert!(ocr.calls.lock().expect("lock").is_empty());
    }

    #[test]
    fn image_only_pages_fall_back_to_ocr() {
        let ocr = Arc::new(RecordingOcr::new(Ok("Scanned words")));
        let extractor = PdfPageExtractor::new(ocr.clone());
        let document = SourceDocument::new(build_pdf(&[Some("Native"), None]));

        let pages = extractor.extract(&document).expect("pages");

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].source, TextSource::Ocr);
        assert_eq!(pages[1].text, "Scanned words");
        assert_eq!(*ocr.calls.lock().expect("lock"), vec![2]);
    }

    #[test]
    fn ocr_failure_leaves_page_empty() {
        let ocr = Arc::new(RecordingOcr::new(Err("tesseract crashed")));
        let extractor = PdfPageExtractor::new(ocr);
        let document = SourceDocument::new(build_pdf(&[None, Some("Still here")]));

        let pages = extractor.extract(&document).expect("extraction continues");

        assert_eq!(pages.len(), 2);
        assert!(pages[0].text.is_empty());
        assert!(pages[1].text.contains("Still here"));
    }

    #[test]
    fn garbage_input_is_rejected() {
        let extractor = PdfPageExtractor::new(Arc::new(DisabledOcr));
        let document = SourceDocument::new(b"definitely not a pdf".to_vec());

        let error = extractor.extract(&document).expect_err("invalid pdf");
        assert!(matches!(error, ExtractionError::InvalidPdf(_)));
    }

    #[test]
    fn scratch_copy_is_removed_on_drop() {
        let document = SourceDocument::new(b"%PDF-1.5".to_vec());
        let path = document.materialize().expect("scratch").to_path_buf();
        assert_eq!(std::fs::read(&path).expect("read scratch"), b"%PDF-1.5");
        assert_eq!(document.materialize().expect("cached"), path.as_path());

        drop(document);
        assert!(!path.exists());
    }
}
