//! Page pipeline: extraction, normalization, classification, prompting, and summarization.

use crate::{
    config::Config,
    extraction::{PageExtractor, PdfPageExtractor, SourceDocument, TextSource, build_ocr_engine},
    metrics::{MetricsSnapshot, SummaryMetrics},
    processing::{
        classify::classify,
        normalize::normalize_text,
        prompt::build_prompt,
        types::{PageFragment, PageText, ProcessingError, SummaryReport},
    },
    summarization::{
        SummarizationClient, SummarizationClientError, build_summarization_client,
        summarize_prompt,
    },
};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Characters of page text sent to the provider.
pub const MAX_CHUNK_CHARS: usize = 1800;

/// Coordinates the per-document pipeline.
///
/// The service owns the page extractor, the summarization client, and the metrics registry.
/// Build it once at startup and share it through an `Arc`; the client is read-only after
/// construction.
pub struct SummaryService {
    extractor: Arc<dyn PageExtractor>,
    client: Arc<dyn SummarizationClient>,
    metrics: Arc<SummaryMetrics>,
}

/// Abstraction over the pipeline used by external surfaces (HTTP, CLI).
#[async_trait]
pub trait SummaryApi: Send + Sync {
    /// Summarize every page of a PDF.
    async fn summarize_document(&self, bytes: Vec<u8>) -> Result<SummaryReport, ProcessingError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl SummaryService {
    /// Build a service from explicit collaborators.
    pub fn new(extractor: Arc<dyn PageExtractor>, client: Arc<dyn SummarizationClient>) -> Self {
        Self {
            extractor,
            client,
            metrics: Arc::new(SummaryMetrics::new()),
        }
    }

    /// Build the production service: `lopdf` extraction, configured OCR, hosted chat model.
    pub fn from_config(config: &Config) -> Result<Self, SummarizationClientError> {
        tracing::info!(
            model = %config.summarization_model,
            ocr_enabled = config.ocr.enabled,
            "Initializing summary service"
        );
        let extractor = PdfPageExtractor::new(build_ocr_engine(&config.ocr));
        let client = build_summarization_client(config)?;
        Ok(Self::new(Arc::new(extractor), client))
    }

    /// Extract, normalize, and filter page texts.
    ///
    /// Returns the document's page count alongside the pages that still have text. Blocking
    /// PDF parsing and OCR run on the blocking thread pool; any scratch files are removed before
    /// this returns.
    pub async fn extract_page_texts(
        &self,
        bytes: Vec<u8>,
    ) -> Result<(usize, Vec<PageText>), ProcessingError> {
        let extractor = Arc::clone(&self.extractor);
        let raw_pages = tokio::task::spawn_blocking(move || {
            let document = SourceDocument::new(bytes);
            extractor.extract(&document)
        })
        .await
        .map_err(|error| ProcessingError::Task(error.to_string()))??;

        let total_pages = raw_pages.len();
        let pages = raw_pages
            .into_iter()
            .filter_map(|raw| {
                let text = normalize_text(&raw.text);
                if text.is_empty() {
                    tracing::debug!(page = raw.page_number, "Dropping empty page");
                    None
                } else {
                    Some(PageText {
                        page_number: raw.page_number,
                        text,
                        source: raw.source,
                    })
                }
            })
            .collect();
        Ok((total_pages, pages))
    }

    /// Classify and summarize a single page.
    ///
    /// The whole page is classified; only the text sent to the provider is cut to
    /// [`MAX_CHUNK_CHARS`]. `section` is the page's 1-based position among pages that yielded
    /// text and becomes its title number.
    pub async fn summarize_page(&self, section: usize, page: &PageText) -> PageFragment {
        let content_type = classify(&page.text);
        let chunk = truncate_chars(&page.text, MAX_CHUNK_CHARS);
        tracing::info!(
            section,
            page = page.page_number,
            content_type = %content_type,
            source = ?page.source,
            chars = chunk.chars().count(),
            "Summarizing page"
        );
        let prompt = build_prompt(content_type, chunk);
        let outcome = summarize_prompt(self.client.as_ref(), &prompt).await;
        PageFragment {
            section,
            page_number: page.page_number,
            content_type,
            source: page.source,
            outcome,
        }
    }

    /// Summarize every page of a PDF, strictly in page order.
    ///
    /// Returns [`ProcessingError::NoTextDetected`] before any provider call when no page yields
    /// text. Provider failures never abort the document; they are carried in the fragment.
    pub async fn summarize_document(
        &self,
        bytes: Vec<u8>,
    ) -> Result<SummaryReport, ProcessingError> {
        let fingerprint = document_fingerprint(&bytes);
        tracing::info!(fingerprint = %fingerprint, bytes = bytes.len(), "Processing document");

        let (total_pages, pages) = self.extract_page_texts(bytes).await?;
        if pages.is_empty() {
            tracing::warn!(fingerprint = %fingerprint, total_pages, "No text detected");
            self.metrics.record_empty_document();
            return Err(ProcessingError::NoTextDetected { total_pages });
        }
        tracing::info!(total_pages, extracted = pages.len(), "Extracted pages");

        let mut fragments = Vec::with_capacity(pages.len());
        for (index, page) in pages.iter().enumerate() {
            fragments.push(self.summarize_page(index + 1, page).await);
        }

        let ocr_pages = pages
            .iter()
            .filter(|page| page.source == TextSource::Ocr)
            .count();
        let report = SummaryReport {
            fingerprint,
            total_pages,
            extracted_pages: pages.len(),
            ocr_pages,
            model: self.client.model().to_string(),
            generated_at: OffsetDateTime::now_utc()
                .format(&Rfc3339)
                .unwrap_or_default(),
            fragments,
        };

        let failures = report.failed_pages();
        self.metrics.record_document(
            report.extracted_pages as u64,
            ocr_pages as u64,
            failures as u64,
        );
        tracing::info!(
            fingerprint = %report.fingerprint,
            pages = report.extracted_pages,
            ocr_pages,
            failures,
            "Document summarized"
        );
        Ok(report)
    }

    /// Return a snapshot of the summarization counters.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[async_trait]
impl SummaryApi for SummaryService {
    async fn summarize_document(&self, bytes: Vec<u8>) -> Result<SummaryReport, ProcessingError> {
        SummaryService::summarize_document(self, bytes).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        SummaryService::metrics_snapshot(self)
    }
}

/// SHA-256 of the document bytes, hex encoded.
pub fn document_fingerprint(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Longest prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
