//! APA reference parser.
//!
//! `Authors. (Year). Title. Source. DOI-or-URL`, where the source clause
//! decides the entry type. The older `Surname, Given, et al. "Title."
//! Container Volume (Year).` form is accepted as a journal article.

use chrono::NaiveDate;

use super::authors::{Delimiter, NameRules};
use super::common::{clean_segment, last_url, normalize_pages, static_regex};
use super::ParseError;
use crate::models::{Citation, CitationBuilder, EntryType};
use crate::utils::text::collapse_whitespace;
use crate::utils::{validate_date, validate_url};

static_regex!(
    head_re,
    r"^(?P<authors>.+?)\s*\((?P<year>\d{4})[a-z]?(?:,\s*(?P<date>[^)]*))?\)\.?\s*(?P<rest>.*)$"
);
static_regex!(
    legacy_re,
    r#"^(?P<authors>.+?)\.\s*["“](?P<title>[^"”]+?)[.,]?["”]\s*(?P<container>.+?),?\s+(?P<volume>\d+)(?:\.(?P<issue>\d+))?\s*\((?P<year>\d{4})\)(?::\s*(?P<pages>[0-9][0-9\-–]*))?\.?$"#
);
static_regex!(
    retrieved_re,
    r"(?i)Retrieved\s+(?:on\s+)?(?P<date>.+?),?\s+from\b\s*"
);
static_regex!(
    doi_re,
    r"(?i)(?:https?://(?:dx\.)?doi\.org/|doi:\s*)?(?P<doi>10\.\d{4,9}/\S+)"
);
static_regex!(
    journal_re,
    r"^(?P<container>[^,]+?),\s*(?P<volume>\d+)\s*(?:\((?P<issue>[^)]+)\))?\s*(?:,\s*(?P<pages>[A-Za-z]?\d+(?:\s*[-–]+\s*[A-Za-z]?\d+)?))?$"
);
static_regex!(pages_re, r"\(\s*(?:pp?\.)\s*(?P<pages>[^)]+)\)");
static_regex!(editors_re, r"^.+?\((?:Eds?|主编)\.?\),?\s*");
static_regex!(
    edition_re,
    r"\s*\((?P<edition>\d+)(?:st|nd|rd|th)\s+ed\.?\)"
);

/// Parse one APA reference
pub(crate) fn parse_apa(raw: &str, rules: &NameRules) -> Result<Citation, ParseError> {
    let text = collapse_whitespace(raw);
    if let Some(citation) = parse_legacy(&text, rules)? {
        return Ok(citation);
    }

    let caps = head_re()
        .captures(&text)
        .ok_or_else(|| ParseError::malformed("year", "no parenthesized year after the authors"))?;
    let year: i32 = caps["year"]
        .parse()
        .map_err(|_| ParseError::malformed("year", "not a number"))?;
    let authors = rules.normalize(&caps["authors"], Delimiter::Apa)?;

    let (title, source) = split_title(&caps["rest"]);
    let (title, edition) = match edition_re().captures(title) {
        Some(ed) => (
            edition_re().replace(title, "").into_owned(),
            Some(ed["edition"].to_string()),
        ),
        None => (title.to_string(), None),
    };

    let tail = Tail::extract(source)?;
    tracing::trace!(?tail, "apa source clause");

    let builder = CitationBuilder::new(EntryType::Journal, title)
        .authors(authors.authors)
        .more_authors(authors.more_authors)
        .year(year)
        .doi(tail.doi.clone().unwrap_or_default());

    let clause = tail.clause.as_str();
    let builder = if let Some(body) = strip_in_prefix(clause) {
        in_clause(builder, body)
    } else if let Some(journal) = journal_re().captures(clause) {
        builder
            .container(&journal["container"])
            .volume(&journal["volume"])
            .issue(journal.name("issue").map_or("", |m| m.as_str()))
            .pages(
                journal
                    .name("pages")
                    .and_then(|m| normalize_pages(m.as_str()))
                    .unwrap_or_default(),
            )
    } else if let Some(url) = tail.url.as_deref() {
        let publish_date = caps
            .name("date")
            .and_then(|date| month_day(year, date.as_str()))
            .unwrap_or_else(|| year.to_string());
        builder
            .entry_type(EntryType::WebResource)
            .url(url)
            .publish_date(publish_date)
            .access_date(tail.access_date.clone().unwrap_or_default())
            .publisher(clause)
    } else if edition.is_some() || rules.mentions_publisher(clause) {
        let (place, publisher) = split_place(clause);
        builder
            .entry_type(EntryType::Book)
            .place(place)
            .publisher(publisher)
            .edition(edition.unwrap_or_default())
    } else if !clause.is_empty() {
        builder.entry_type(EntryType::Conference).container(clause)
    } else {
        return Err(ParseError::malformed("container", "no source after the title"));
    };

    let citation = builder.build();
    citation.check_required()?;
    Ok(citation)
}

/// `Surname, Given, et al. "Title." Container Volume (Year).`
fn parse_legacy(text: &str, rules: &NameRules) -> Result<Option<Citation>, ParseError> {
    let Some(caps) = legacy_re().captures(text) else {
        return Ok(None);
    };
    tracing::debug!("legacy quoted-title reference");

    let authors = rules.normalize(&caps["authors"], Delimiter::Apa)?;
    let year = caps["year"]
        .parse()
        .map_err(|_| ParseError::malformed("year", "not a number"))?;

    let citation = CitationBuilder::new(EntryType::Journal, caps["title"].trim())
        .authors(authors.authors)
        .more_authors(authors.more_authors)
        .container(clean_segment(&caps["container"]))
        .volume(&caps["volume"])
        .issue(caps.name("issue").map_or("", |m| m.as_str()))
        .pages(
            caps.name("pages")
                .and_then(|m| normalize_pages(m.as_str()))
                .unwrap_or_default(),
        )
        .year(year)
        .build();
    citation.check_required()?;
    Ok(Some(citation))
}

/// Split the title at the first sentence end; `?` and `!` stay in the title
fn split_title(rest: &str) -> (&str, &str) {
    let mut chars = rest.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '?' | '!') {
            continue;
        }
        let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
        if at_boundary {
            let end = if c == '.' { i } else { i + c.len_utf8() };
            return (rest[..end].trim(), rest[i + c.len_utf8()..].trim());
        }
    }
    (rest.trim().trim_end_matches('.'), "")
}

/// Identifier and retrieval notes removed from the end of the source clause
#[derive(Debug, Default)]
struct Tail {
    clause: String,
    doi: Option<String>,
    url: Option<String>,
    access_date: Option<String>,
}

impl Tail {
    fn extract(source: &str) -> Result<Self, ParseError> {
        let mut clause = source.to_string();
        let mut tail = Tail::default();

        if let Some(doi) = doi_re().captures(&clause) {
            let span = doi.get(0).map_or(0..0, |m| m.range());
            tail.doi = Some(doi["doi"].trim_end_matches('.').to_string());
            clause.replace_range(span, "");
        } else if let Some(url) = last_url(&clause).map(str::to_string) {
            tail.url = Some(validate_url(&url).map_err(|e| ParseError::malformed("url", e.to_string()))?);
            if let Some(pos) = clause.rfind(&url) {
                clause.replace_range(pos..pos + url.len(), "");
            }
        }

        if let Some(retrieved) = retrieved_re().captures(&clause) {
            let date = retrieved["date"].to_string();
            tail.access_date = Some(parse_long_date(&date).ok_or_else(|| {
                ParseError::malformed("access_date", format!("unrecognized date `{}`", date))
            })?);
            let span = retrieved.get(0).map_or(0..0, |m| m.range());
            clause.replace_range(span, "");
        }

        tail.clause = clean_segment(&clause).to_string();
        Ok(tail)
    }
}

fn strip_in_prefix(clause: &str) -> Option<&str> {
    clause
        .strip_prefix("In ")
        .or_else(|| clause.strip_prefix("in "))
        .map(str::trim)
}

/// `In Editors (Eds.), Proceedings (pp. 1-2). Place: Publisher`
fn in_clause(builder: CitationBuilder, body: &str) -> CitationBuilder {
    let body = match editors_re().find(body) {
        Some(m) => &body[m.end()..],
        None => body,
    };

    let (container, pages, after) = match pages_re().captures(body) {
        Some(caps) => {
            let span = caps.get(0).map_or(0..0, |m| m.range());
            (
                &body[..span.start],
                normalize_pages(&caps["pages"]),
                body[span.end..].trim_start_matches(['.', ',', ' ']),
            )
        }
        None => match body.split_once(". ") {
            Some((container, after)) => (container, None, after),
            None => (body, None, ""),
        },
    };

    let (place, publisher) = split_place(clean_segment(after));
    builder
        .entry_type(EntryType::Conference)
        .container(clean_segment(container))
        .pages(pages.unwrap_or_default())
        .place(place)
        .publisher(publisher)
}

/// `Place: Publisher` or a bare publisher
fn split_place(text: &str) -> (&str, &str) {
    match text.split_once([':', '：']) {
        Some((place, publisher)) => (place.trim(), clean_segment(publisher)),
        None => ("", clean_segment(text)),
    }
}

/// `March 5` within the given year, as `YYYY-MM-DD`
fn month_day(year: i32, text: &str) -> Option<String> {
    let text = text.trim().trim_end_matches('.');
    let full = format!("{} {}", year, text);
    ["%Y %B %d", "%Y %b %d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&full, fmt).ok())
        .map(|date| date.format("%Y-%m-%d").to_string())
}

/// `March 5, 2021`, `5 March 2021` or an ISO date
fn parse_long_date(text: &str) -> Option<String> {
    let text = text.trim();
    if let Ok(date) = validate_date(text) {
        return Some(date);
    }
    ["%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%B %d %Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .map(|date| date.format("%Y-%m-%d").to_string())
}
