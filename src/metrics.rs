use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing summarization activity.
#[derive(Default)]
pub struct SummaryMetrics {
    documents_processed: AtomicU64,
    documents_without_text: AtomicU64,
    pages_summarized: AtomicU64,
    ocr_pages: AtomicU64,
    summarization_failures: AtomicU64,
}

impl SummaryMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a summarized document.
    pub fn record_document(&self, pages: u64, ocr_pages: u64, failures: u64) {
        self.documents_processed.fetch_add(1, Ordering::Relaxed);
        self.pages_summarized.fetch_add(pages, Ordering::Relaxed);
        self.ocr_pages.fetch_add(ocr_pages, Ordering::Relaxed);
        self.summarization_failures
            .fetch_add(failures, Ordering::Relaxed);
    }

    /// Record a document where no page yielded text.
    pub fn record_empty_document(&self) {
        self.documents_processed.fetch_add(1, Ordering::Relaxed);
        self.documents_without_text.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_processed: self.documents_processed.load(Ordering::Relaxed),
            documents_without_text: self.documents_without_text.load(Ordering::Relaxed),
            pages_summarized: self.pages_summarized.load(Ordering::Relaxed),
            ocr_pages: self.ocr_pages.load(Ordering::Relaxed),
            summarization_failures: self.summarization_failures.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of summarization counters used for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Documents handled since startup, including ones without text.
    pub documents_processed: u64,
    /// Documents rejected because no page yielded text.
    pub documents_without_text: u64,
    /// Pages sent to the summarization provider.
    pub pages_summarized: u64,
    /// Summarized pages whose text came from OCR.
    pub ocr_pages: u64,
    /// Pages whose summary was replaced by an inline error.
    pub summarization_failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_documents_and_pages() {
        let metrics = SummaryMetrics::new();
        metrics.record_document(3, 1, 0);
        metrics.record_document(2, 0, 2);
        metrics.record_empty_document();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.documents_processed, 3);
        assert_eq!(snapshot.documents_without_text, 1);
        assert_eq!(snapshot.pages_summarized, 5);
        assert_eq!(snapshot.ocr_pages, 1);
        assert_eq!(snapshot.summarization_failures, 2);
    }

    #[test]
    fn snapshot_starts_at_zero() {
        assert_eq!(SummaryMetrics::new().snapshot(), MetricsSnapshot::default());
    }
}
