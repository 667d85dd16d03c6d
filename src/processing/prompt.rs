//! Instruction templates chosen per content type.

use super::classify::ContentType;

/// Build the summarization prompt for `chunk`, with the chunk appended after the instruction.
pub fn build_prompt(content_type: ContentType, chunk: &str) -> String {
    format!("{}\n\n{chunk}", instruction(content_type))
}

fn instruction(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Code => "Explain this code in simple terms, covering logic and purpose:",
        ContentType::Math => {
            "Summarize this mathematical content. Extract formulas, results, and explanations:"
        }
        ContentType::Image => {
            "This text was extracted from an image. Describe what the image might represent and summarize it:"
        }
        ContentType::Text => "Summarize this text concisely, keeping all important details:",
    }
}
