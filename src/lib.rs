#![deny(missing_docs)]

//! Core library for the smart PDF summarizer.

/// HTTP routing and upload handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Per-page PDF text extraction and OCR fallback.
pub mod extraction;
/// Structured logging and tracing setup.
pub mod logging;
/// Summarization counters.
pub mod metrics;
/// Document pipeline: classification, prompting, orchestration, rendering.
pub mod processing;
/// Chat-completion client used for page summaries.
pub mod summarization;
