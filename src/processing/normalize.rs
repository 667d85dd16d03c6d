//! Cleanup applied to every page's extracted text.

/// Replace form feeds with spaces, collapse whitespace runs, and trim the result.
///
/// The ASCII information separators `U+001C..=U+001F` count as whitespace here.
/// Idempotent: normalizing an already normalized string returns it unchanged.
pub fn normalize_text(raw: &str) -> String {
    raw.replace('\u{000C}', " ")
        .split(is_separator)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{001C}'..='\u{001F}').contains(&c)
}
