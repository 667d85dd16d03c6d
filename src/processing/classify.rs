//! Heuristic content-type detection for a page of text.
//!
//! Checks run in a fixed order and the first match wins: code markers, then math symbols,
//! then the "short, few letters" shape typical of OCR output from pictures, then plain text.
//! The math check fires on any hyphen or comparison sign, so ordinary prose can land there.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

const CODE_MARKERS: [&str; 8] = [
    "def ",
    "class ",
    "import ",
    "#",
    ";",
    "{",
    "}",
    "console.log",
];

const MATH_SYMBOLS: [char; 14] = [
    '+', '-', '*', '/', '=', '<', '>', '√', '∑', 'π', '∞', '∫', 'Δ', 'θ',
];

const IMAGE_MAX_TOKENS: usize = 20;
const IMAGE_MAX_LETTERS: usize = 30;

/// Label assigned to a page by [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Source code.
    Code,
    /// Formulas or arithmetic.
    Math,
    /// Sparse text, likely recognized from a picture.
    Image,
    /// Ordinary prose.
    Text,
}

impl ContentType {
    /// Lowercase label (`code`, `math`, `image`, `text`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Math => "math",
            Self::Image => "image",
            Self::Text => "text",
        }
    }

    /// Capitalized label used in section titles.
    pub fn title(self) -> &'static str {
        match self {
            Self::Code => "Code",
            Self::Math => "Math",
            Self::Image => "Image",
            Self::Text => "Text",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a label; anything unrecognized maps to [`ContentType::Text`].
impl FromStr for ContentType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "code" => Self::Code,
            "math" => Self::Math,
            "image" => Self::Image,
            _ => Self::Text,
        })
    }
}

/// Assign a content type to normalized page text.
pub fn classify(text: &str) -> ContentType {
    if CODE_MARKERS.iter().any(|marker| text.contains(marker)) {
        ContentType::Code
    } else if text.contains(MATH_SYMBOLS) {
        ContentType::Math
    } else if looks_like_image_text(text) {
        ContentType::Image
    } else {
        ContentType::Text
    }
}

fn looks_like_image_text(text: &str) -> bool {
    let tokens = text.split_whitespace().count();
    let letters = text.chars().filter(char::is_ascii_alphabetic).count();
    tokens < IMAGE_MAX_TOKENS && letters < IMAGE_MAX_LETTERS
}
