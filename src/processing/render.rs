//! Rendering of page fragments into the downloadable summary document.

use super::types::PageFragment;

/// File name offered for the downloadable summary.
pub const SUMMARY_FILE_NAME: &str = "smart_summary.txt";

/// Format one page as a titled Markdown section.
pub fn render_fragment(fragment: &PageFragment) -> String {
    format!(
        "### Page {} ({})\n{}\n",
        fragment.section,
        fragment.content_type.title(),
        fragment.outcome.display_text()
    )
}

/// Concatenate all page sections, separated by blank lines.
pub fn render_final_summary(fragments: &[PageFragment]) -> String {
    fragments
        .iter()
        .map(render_fragment)
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::TextSource;
    use crate::processing::classify::ContentType;
    use crate::summarization::SummaryOutcome;

    fn fragment(
        section: usize,
        page_number: u32,
        content_type: ContentType,
        outcome: SummaryOutcome,
    ) -> PageFragment {
        PageFragment {
            section,
            page_number,
            content_type,
            source: TextSource::TextLayer,
            outcome,
        }
    }

    #[test]
    fn sections_are_titled_and_separated_by_blank_lines() {
        let rendered = render_final_summary(&[
            fragment(1, 1, ContentType::Code, SummaryOutcome::Summary("Defines foo.".into())),
            fragment(2, 3, ContentType::Text, SummaryOutcome::Failed("timeout".into())),
        ]);

        assert_eq!(
            rendered,
            "### Page 1 (Code)\nDefines foo.\n\n\n### Page 2 (Text)\n⚠️ Error during summarization: timeout\n"
        );
    }

    #[test]
    fn no_fragments_render_empty() {
        assert_eq!(render_final_summary(&[]), "");
    }
}
