//! Input style detection.

use serde::{Deserialize, Serialize};

use super::common::static_regex;

/// Citation styles understood by the parsers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Gbt,
    Apa,
    Bibtex,
    Web,
    Unknown,
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            InputFormat::Gbt => "GB/T 7714",
            InputFormat::Apa => "APA",
            InputFormat::Bibtex => "BibTeX",
            InputFormat::Web => "web",
            InputFormat::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

static_regex!(bibtex_re, r"@\w+\s*\{");
static_regex!(
    web_dates_re,
    r"\(\s*\d{4}-\d{1,2}-\d{1,2}\s*\)\s*\[\s*\d{4}-\d{1,2}-\d{1,2}\s*\]"
);
static_regex!(web_tag_re, r"(?i)\[(?:EB|DB)/OL\]");
static_regex!(gbt_tag_re, r"\[[JCM]\]");
static_regex!(apa_year_re, r"^[^()\[\]]+?\(\d{4}[a-z]?(?:,[^)]*)?\)");

/// Guess the style of a raw citation
///
/// Signatures overlap, so the checks run in a fixed order and the first
/// match wins: BibTeX record, web entry, GB/T type tag, APA year.
pub fn detect_format(raw: &str) -> InputFormat {
    let text = raw.trim();

    let format = if bibtex_re().is_match(text) {
        InputFormat::Bibtex
    } else if web_dates_re().is_match(text) || web_tag_re().is_match(text) {
        InputFormat::Web
    } else if gbt_tag_re().is_match(text) {
        InputFormat::Gbt
    } else if apa_year_re().is_match(text) {
        InputFormat::Apa
    } else {
        InputFormat::Unknown
    };

    tracing::debug!(%format, "detected citation format");
    format
}

/// Byte offset of the first `@type{` in the text
pub(super) fn bibtex_record_start(raw: &str) -> Option<usize> {
    bibtex_re().find(raw).map(|m| m.start())
}
