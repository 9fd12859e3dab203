//! Free-text web citation parser.
//!
//! `Author(s). Title[EB/OL]. (PublishDate) [AccessDate]. URL`. The tag may
//! be missing when the dates are present, and legacy entries may carry only
//! the access date.

use super::authors::{Delimiter, NameRules};
use super::common::{clean_segment, parse_web_tail, split_authors_title, static_regex};
use super::ParseError;
use crate::models::{Citation, CitationBuilder, EntryType};
use crate::utils::text::collapse_whitespace;

static_regex!(tag_re, r"(?i)\[\s*(?:EB|DB)\s*/\s*OL\s*\]");
static_regex!(
    first_date_re,
    r"[(\[]\s*\d{4}(?:-\d{1,2}){0,2}\s*[)\]]"
);

/// Parse a web citation
pub(crate) fn parse_web(raw: &str, rules: &NameRules) -> Result<Citation, ParseError> {
    let text = collapse_whitespace(raw);
    let (authors_raw, rest) = split_authors_title(&text)
        .ok_or_else(|| ParseError::malformed("author", "no period after the author list"))?;

    let (title, tail) = match tag_re().find(rest) {
        Some(tag) => (&rest[..tag.start()], &rest[tag.end()..]),
        None => {
            let date = first_date_re().find(rest).ok_or_else(|| {
                ParseError::malformed("title", "neither an [EB/OL] tag nor dates follow the title")
            })?;
            (&rest[..date.start()], &rest[date.start()..])
        }
    };

    let authors = rules.normalize(authors_raw, Delimiter::List)?;
    let tail = parse_web_tail(tail)?;
    let year = tail
        .publish_date
        .as_deref()
        .and_then(|date| date.get(..4))
        .and_then(|year| year.parse().ok());

    tracing::trace!(title = clean_segment(title), ?year, "web entry");
    let citation = CitationBuilder::new(EntryType::WebResource, clean_segment(title))
        .authors(authors.authors)
        .more_authors(authors.more_authors)
        .maybe_year(year)
        .url(tail.url.unwrap_or_default())
        .publish_date(tail.publish_date.unwrap_or_default())
        .access_date(tail.access_date.unwrap_or_default())
        .build();
    citation.check_required()?;
    Ok(citation)
}
