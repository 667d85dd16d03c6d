//! Shared helpers for integration tests.

use smartsum::extraction::{OcrEngine, OcrError, SourceDocument};
use std::collections::HashMap;

#[path = "../../src/extraction/test_support.rs"]
mod pdf;

pub use pdf::build_pdf;

/// OCR stub answering from a fixed page table; pages missing from the table fail.
pub struct ScriptedOcr(pub HashMap<u32, String>);

impl OcrEngine for ScriptedOcr {
    fn recognize_page(
        &self,
        _document: &SourceDocument,
        page_number: u32,
    ) -> Result<String, OcrError> {
        self.0
            .get(&page_number)
            .cloned()
            .ok_or_else(|| OcrError::ToolFailed {
                tool: "tesseract".into(),
                details: format!("no scripted text for page {page_number}"),
            })
    }
}
