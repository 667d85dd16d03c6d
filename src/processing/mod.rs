//! Document pipeline: normalization, classification, prompting, and rendering.

pub mod classify;
pub mod normalize;
pub mod prompt;
pub mod render;
mod service;
pub mod types;

pub use classify::{ContentType, classify};
pub use normalize::normalize_text;
pub use prompt::build_prompt;
pub use render::{SUMMARY_FILE_NAME, render_final_summary};
pub use service::{
    MAX_CHUNK_CHARS, SummaryApi, SummaryService, document_fingerprint, truncate_chars,
};
pub use types::{NO_TEXT_NOTICE, PageFragment, PageText, ProcessingError, SummaryReport};
