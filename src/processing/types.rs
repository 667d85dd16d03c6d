//! Core data types and error definitions for the summarization pipeline.

use super::classify::ContentType;
use crate::extraction::{ExtractionError, TextSource};
use crate::summarization::SummaryOutcome;
use serde::Serialize;
use thiserror::Error;

/// Notice shown when no page of a document produced any text.
pub const NO_TEXT_NOTICE: &str = "No text detected. Try uploading a clearer PDF or scanned copy.";

/// Errors emitted by the document pipeline.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// The document could not be opened.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    /// Every page was empty after extraction, OCR, and normalization.
    #[error("{}", NO_TEXT_NOTICE)]
    NoTextDetected {
        /// Number of pages inspected.
        total_pages: usize,
    },
    /// The blocking extraction task panicked or was cancelled.
    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// Normalized, non-empty text of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// 1-based page number within the document.
    pub page_number: u32,
    /// Normalized text; never empty.
    pub text: String,
    /// Whether the text came from the text layer or OCR.
    pub source: TextSource,
}

/// One page's classification and summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageFragment {
    /// 1-based position among the pages that yielded text; used in the section title.
    pub section: usize,
    /// 1-based page number within the document.
    pub page_number: u32,
    /// Detected content type.
    pub content_type: ContentType,
    /// Origin of the summarized text.
    pub source: TextSource,
    /// Provider summary or failure detail.
    pub outcome: SummaryOutcome,
}

/// Result of summarizing a whole document.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    /// SHA-256 of the uploaded bytes, hex encoded.
    pub fingerprint: String,
    /// Pages present in the document.
    pub total_pages: usize,
    /// Pages that yielded text.
    pub extracted_pages: usize,
    /// Extracted pages whose text came from OCR.
    pub ocr_pages: usize,
    /// Model used for every summary.
    pub model: String,
    /// RFC 3339 timestamp of report creation.
    pub generated_at: String,
    /// Per-page results in page order.
    pub fragments: Vec<PageFragment>,
}

impl SummaryReport {
    /// Number of pages whose summarization failed.
    pub fn failed_pages(&self) -> usize {
        self.fragments
            .iter()
            .filter(|fragment| fragment.outcome.is_failure())
            .count()
    }

    /// Final summary document text.
    pub fn render(&self) -> String {
        super::render::render_final_summary(&self.fragments)
    }
}
