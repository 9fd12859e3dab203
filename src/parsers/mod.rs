//! Citation parsers, one per input style.
//!
//! [`detect_format`] picks the style and a static dispatch table maps it to
//! the parser. Every parser returns either a complete [`Citation`] with all
//! mandatory fields of its entry type, or a [`ParseError`].
//!
//! # Example
//!
//! ```
//! use gbt7714::parsers::parse;
//! use gbt7714::models::EntryType;
//!
//! let citation = parse("INNFOS. Robots[EB/OL]. (2020-01-01) [2020-04-30]. https://innfos.com/").unwrap();
//! assert_eq!(citation.entry_type(), EntryType::WebResource);
//! assert_eq!(citation.url(), Some("https://innfos.com/"));
//! ```

mod apa;
pub mod authors;
mod bibtex;
mod common;
mod detect;
mod error;
mod gbt;
pub mod segment;
mod web;

use std::sync::OnceLock;

pub use authors::{Delimiter, NameRules, NormalizedAuthors};
pub use detect::{detect_format, InputFormat};
pub use error::ParseError;

use crate::config::AuthorsConfig;
use crate::models::Citation;

type ParseFn = fn(&str, &NameRules) -> Result<Citation, ParseError>;

const PARSERS: [(InputFormat, ParseFn); 4] = [
    (InputFormat::Bibtex, bibtex::parse_bibtex),
    (InputFormat::Web, web::parse_web),
    (InputFormat::Gbt, gbt::parse_gbt),
    (InputFormat::Apa, apa::parse_apa),
];

/// Parser bound to one set of name rules
#[derive(Debug, Clone, Default)]
pub struct CitationParser {
    rules: NameRules,
}

impl CitationParser {
    pub fn new(config: &AuthorsConfig) -> Self {
        Self {
            rules: NameRules::new(config),
        }
    }

    pub fn rules(&self) -> &NameRules {
        &self.rules
    }

    /// Detect the input style and parse
    pub fn parse(&self, raw: &str) -> Result<Citation, ParseError> {
        self.parse_as(detect_format(raw), raw)
    }

    /// Parse with an explicitly chosen style
    pub fn parse_as(&self, format: InputFormat, raw: &str) -> Result<Citation, ParseError> {
        let parser = PARSERS
            .iter()
            .find(|(candidate, _)| *candidate == format)
            .map(|(_, parser)| parser)
            .ok_or(ParseError::UnrecognizedFormat)?;

        tracing::debug!(%format, "dispatching citation parser");
        let citation = parser(raw.trim(), &self.rules)?;
        tracing::trace!(?citation, "parsed citation");
        Ok(citation)
    }
}

fn default_parser() -> &'static CitationParser {
    static PARSER: OnceLock<CitationParser> = OnceLock::new();
    PARSER.get_or_init(CitationParser::default)
}

/// Parse with the built-in name rules
pub fn parse(raw: &str) -> Result<Citation, ParseError> {
    default_parser().parse(raw)
}
