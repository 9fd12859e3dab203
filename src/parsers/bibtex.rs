//! BibTeX record parser.
//!
//! Handles a single `@type{key, field = value, ...}` record. Values may be
//! brace-delimited (with nesting), quoted, bare words or numbers, and may
//! be joined with `#`.

use std::collections::HashMap;

use super::authors::{Delimiter, NameRules};
use super::common::{normalize_pages, parse_year, static_regex};
use super::detect::bibtex_record_start;
use super::ParseError;
use crate::models::{Citation, CitationBuilder, EntryType};
use crate::utils::text::strip_latex;
use crate::utils::{validate_date, validate_doi, validate_url};

static_regex!(url_command_re, r"\\url\{([^}]*)\}");

/// A scanned record before field mapping
#[derive(Debug, Default, PartialEq, Eq)]
struct Record {
    kind: String,
    key: String,
    /// Field names are lowercased; values keep their inner markup
    fields: HashMap<String, String>,
}

impl Record {
    /// First present field among `names`, LaTeX stripped; empty when absent
    fn text(&self, names: &[&str]) -> String {
        self.raw(names).map(strip_latex).unwrap_or_default()
    }

    fn raw(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .find_map(|name| self.fields.get(*name))
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
}

impl Scanner {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(ParseError::malformed(
                "record",
                format!("expected `{}`, found `{}`", expected, c),
            )),
            None => Err(unbalanced()),
        }
    }

    fn identifier(&mut self) -> String {
        self.skip_whitespace();
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '.'))
        {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn record(&mut self) -> Result<Record, ParseError> {
        self.expect('@')?;
        let kind = self.identifier().to_lowercase();
        if kind.is_empty() {
            return Err(ParseError::malformed("record", "missing entry type"));
        }

        self.skip_whitespace();
        let close = match self.bump() {
            Some('{') => '}',
            Some('(') => ')',
            _ => return Err(ParseError::malformed("record", "expected `{` after entry type")),
        };

        let mut key = String::new();
        while let Some(c) = self.peek() {
            if c == ',' || c == close {
                break;
            }
            key.push(c);
            self.pos += 1;
        }

        let mut record = Record {
            kind,
            key: key.trim().to_string(),
            fields: HashMap::new(),
        };

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(unbalanced()),
                Some(c) if c == close => {
                    self.pos += 1;
                    break;
                }
                Some(',') => {
                    self.pos += 1;
                    continue;
                }
                Some(_) => {}
            }

            let name = self.identifier().to_lowercase();
            if name.is_empty() {
                return Err(ParseError::malformed(
                    "record",
                    format!("unexpected character near `{}`", self.context()),
                ));
            }
            self.expect('=')?;
            let value = self.value(close)?;
            tracing::trace!(field = %name, value = %value, "bibtex field");
            record.fields.insert(name, value);
        }

        self.skip_whitespace();
        if self.peek().is_some() {
            tracing::debug!(rest = %self.context(), "ignoring text after bibtex record");
        }
        Ok(record)
    }

    /// One field value, following `#` concatenation
    fn value(&mut self, close: char) -> Result<String, ParseError> {
        let mut value = String::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('{') => {
                    self.pos += 1;
                    value.push_str(&self.delimited('}')?);
                }
                Some('"') => {
                    self.pos += 1;
                    value.push_str(&self.delimited('"')?);
                }
                Some(_) => {
                    while let Some(c) = self.peek() {
                        if c == ',' || c == '#' || c == close || c.is_whitespace() {
                            break;
                        }
                        value.push(c);
                        self.pos += 1;
                    }
                }
                None => return Err(unbalanced()),
            }

            self.skip_whitespace();
            if self.peek() == Some('#') {
                self.pos += 1;
            } else {
                return Ok(value);
            }
        }
    }

    /// Text up to `end` at brace depth zero; nested braces are kept
    fn delimited(&mut self, end: char) -> Result<String, ParseError> {
        let mut depth = 0usize;
        let mut text = String::new();
        while let Some(c) = self.bump() {
            match c {
                '\\' => {
                    text.push(c);
                    if let Some(next) = self.bump() {
                        text.push(next);
                    }
                    continue;
                }
                '{' => depth += 1,
                '}' if depth > 0 => depth -= 1,
                c if c == end && depth == 0 => return Ok(text),
                '}' => return Err(unbalanced()),
                _ => {}
            }
            text.push(c);
        }
        Err(unbalanced())
    }

    fn context(&self) -> String {
        let start = self.pos.min(self.chars.len());
        self.chars[start..].iter().take(20).collect()
    }
}

fn unbalanced() -> ParseError {
    ParseError::malformed("record", "unbalanced braces")
}

fn entry_type_of(kind: &str) -> Result<EntryType, ParseError> {
    match kind {
        "article" => Ok(EntryType::Journal),
        "inproceedings" | "conference" => Ok(EntryType::Conference),
        "book" => Ok(EntryType::Book),
        "misc" | "online" | "electronic" | "webpage" | "www" => Ok(EntryType::WebResource),
        other => Err(ParseError::UnsupportedEntryType(other.to_string())),
    }
}

/// Edition as a bare number when it is written as an ordinal
fn normalize_edition(raw: &str) -> String {
    const WORDS: [&str; 10] = [
        "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth",
        "tenth",
    ];
    let lower = raw.trim().trim_end_matches('.').to_lowercase();
    let lower = lower.strip_suffix(" ed").unwrap_or(&lower);
    let lower = lower.strip_suffix(" edition").unwrap_or(lower);

    if let Some(index) = WORDS.iter().position(|w| *w == lower) {
        return (index + 1).to_string();
    }
    let digits: String = lower.chars().take_while(char::is_ascii_digit).collect();
    let suffix = &lower[digits.len()..];
    if !digits.is_empty() && matches!(suffix, "" | "st" | "nd" | "rd" | "th") {
        return digits;
    }
    raw.trim().to_string()
}

/// Parse one BibTeX record
pub(crate) fn parse_bibtex(raw: &str, rules: &NameRules) -> Result<Citation, ParseError> {
    let start = bibtex_record_start(raw).unwrap_or(0);
    let record = Scanner::new(&raw[start..]).record()?;
    let entry_type = entry_type_of(&record.kind)?;
    tracing::debug!(kind = %record.kind, key = %record.key, %entry_type, "parsing bibtex record");

    let author_field = record
        .raw(&["author"])
        .ok_or_else(|| ParseError::malformed("author", "the author field is absent"))?;
    let authors = rules.normalize(author_field, Delimiter::And)?;

    let date = record.raw(&["date"]);
    let year = record
        .raw(&["year"])
        .and_then(parse_year)
        .or_else(|| date.and_then(parse_year));

    let mut builder = CitationBuilder::new(entry_type, record.text(&["title"]))
        .authors(authors.authors)
        .more_authors(authors.more_authors)
        .maybe_year(year)
        .doi(doi(&record));

    builder = match entry_type {
        EntryType::Journal => builder
            .container(record.text(&["journal", "journaltitle"]))
            .volume(record.text(&["volume"]))
            .issue(record.text(&["number", "issue"]))
            .pages(pages(&record))
            .url(record.text(&["url"])),
        EntryType::Conference => builder
            .container(record.text(&["booktitle", "conference"]))
            .pages(pages(&record))
            .place(record.text(&["address", "location"]))
            .publisher(record.text(&["publisher", "organization"])),
        EntryType::Book => builder
            .publisher(record.text(&["publisher"]))
            .place(record.text(&["address", "location"]))
            .edition(
                record
                    .raw(&["edition"])
                    .map(|e| normalize_edition(&strip_latex(e)))
                    .unwrap_or_default(),
            ),
        EntryType::WebResource => web_fields(builder, &record, date)?,
    };

    let citation = builder.build();
    citation.check_required()?;
    Ok(citation)
}

/// A malformed DOI is dropped, not fatal
fn doi(record: &Record) -> String {
    let Some(raw) = record.raw(&["doi"]) else {
        return String::new();
    };
    match validate_doi(raw) {
        Ok(doi) => doi,
        Err(e) => {
            tracing::warn!(doi = raw, "ignoring DOI: {}", e);
            String::new()
        }
    }
}

fn pages(record: &Record) -> String {
    record
        .raw(&["pages"])
        .and_then(normalize_pages)
        .unwrap_or_default()
}

fn web_fields(
    builder: CitationBuilder,
    record: &Record,
    date: Option<&str>,
) -> Result<CitationBuilder, ParseError> {
    let url = record.raw(&["url"]).map(str::to_string).or_else(|| {
        record.raw(&["howpublished"]).and_then(|h| {
            url_command_re()
                .captures(h)
                .map(|caps| caps[1].to_string())
                .or_else(|| h.starts_with("http").then(|| h.to_string()))
        })
    });
    let url = url
        .map(|u| validate_url(&u))
        .transpose()
        .map_err(|e| ParseError::malformed("url", e.to_string()))?;

    let access_date = record
        .raw(&["urldate"])
        .map(validate_date)
        .transpose()
        .map_err(|e| ParseError::malformed("access_date", e.to_string()))?;
    let publish_date = date
        .map(validate_date)
        .transpose()
        .map_err(|e| ParseError::malformed("publish_date", e.to_string()))?;

    Ok(builder
        .url(url.unwrap_or_default())
        .access_date(access_date.unwrap_or_default())
        .publish_date(publish_date.unwrap_or_default())
        .publisher(record.text(&["publisher", "organization"])))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NIPS: &str = r#"@inproceedings{Vaswani2017AttentionIA,
    title={Attention is All you Need},
    author={Ashish Vaswani and Noam M. Shazeer and Niki Parmar and Jakob Uszkoreit and Llion Jones and Aidan N. Gomez and Lukasz Kaiser and Illia Polosukhin},
    booktitle={Neural Information Processing Systems},
    year={2017},
    url={https://api.semanticscholar.org/CorpusID:13756489}
}"#;

    #[test]
    fn test_scan_record() {
        let record = Scanner::new("@Article{k1, Title = {A {Nested} Title}, year = 2020, note = \"x\" # {y}}")
            .record()
            .unwrap();
        assert_eq!(record.kind, "article");
        assert_eq!(record.key, "k1");
        assert_eq!(record.fields["title"], "A {Nested} Title");
        assert_eq!(record.fields["year"], "2020");
        assert_eq!(record.fields["note"], "xy");
    }

    #[test]
    fn test_leading_text_before_record() {
        let raw = "% from scholar\n@article{k, author={Smith, John}, title={T}, journal={J}, \
                   year={2020}, volume={1}, pages={1--2}}";
        let citation = parse_bibtex(raw, &NameRules::default()).unwrap();
        assert_eq!(citation.entry_type(), EntryType::Journal);
        assert_eq!(citation.authors()[0].display_name, "Smith J");
        assert_eq!(citation.pages(), Some("1-2"));
    }

    #[test]
    fn test_parse_inproceedings() {
        let citation = parse_bibtex(NIPS, &NameRules::default()).unwrap();
        assert_eq!(citation.entry_type(), EntryType::Conference);
        assert_eq!(citation.authors().len(), 8);
        assert_eq!(citation.authors()[1].display_name, "Shazeer N M");
        assert_eq!(citation.container(), Some("Neural Information Processing Systems"));
        assert_eq!(citation.year(), Some(2017));
        assert_eq!(citation.pages(), None);
        assert_eq!(citation.raw_key(), None);
    }

    #[test]
    fn test_parse_article() {
        let raw = r#"@article{smith2021,
  author = {Smith, John and Doe, Alice B. and Zhang, Wei},
  title = {A novel method for {S}omething},
  journal = {Journal of Interesting Results},
  volume = {15}, number = {2}, pages = {123--135},
  year = {2021},
  doi = {https://doi.org/10.1234/abc.def/5678}
}"#;
        let citation = parse_bibtex(raw, &NameRules::default()).unwrap();
        assert_eq!(citation.entry_type(), EntryType::Journal);
        assert_eq!(citation.title(), "A novel method for Something");
        assert_eq!(citation.authors()[1].display_name, "Doe A B");
        assert_eq!(citation.issue(), Some("2"));
        assert_eq!(citation.pages(), Some("123-135"));
        assert_eq!(citation.doi(), Some("10.1234/abc.def/5678"));
    }

    #[test]
    fn test_parse_book_and_misc() {
        let book = r#"@book{liu2023, author = {刘伟}, title = {Python 编程实践},
            publisher = {机械工业出版社}, address = {北京}, year = 2023, edition = {Second}}"#;
        let citation = parse_bibtex(book, &NameRules::default()).unwrap();
        assert_eq!(citation.entry_type(), EntryType::Book);
        assert_eq!(citation.edition(), Some("2"));
        assert_eq!(citation.place(), Some("北京"));

        let misc = r#"@misc{innfos, author = {{INNFOS}}, title = {Robots},
            howpublished = {\url{https://innfos.com/}}, urldate = {2020-04-30}}"#;
        let citation = parse_bibtex(misc, &NameRules::default()).unwrap();
        assert_eq!(citation.entry_type(), EntryType::WebResource);
        assert_eq!(citation.url(), Some("https://innfos.com/"));
        assert_eq!(citation.access_date(), Some("2020-04-30"));
        assert!(citation.authors()[0].is_institution);
    }

    #[test]
    fn test_invalid_doi_is_dropped() {
        let raw = "@article{k, author={Smith, J.}, title={T}, journal={J}, year={2020}, doi={not a doi}}";
        let citation = parse_bibtex(raw, &NameRules::default()).unwrap();
        assert_eq!(citation.doi(), None);
    }

    #[test]
    fn test_missing_author() {
        let raw = "@article{k, title={T}, journal={J}, year={2020}}";
        let err = parse_bibtex(raw, &NameRules::default()).unwrap_err();
        assert_eq!(err.field(), Some("author"));
    }

    #[test]
    fn test_unbalanced_braces() {
        let raw = "@article{k, author={A B, title={T}";
        let err = parse_bibtex(raw, &NameRules::default()).unwrap_err();
        assert!(matches!(err, ParseError::MalformedField { field: "record", .. }));
    }

    #[test]
    fn test_unsupported_type() {
        let raw = "@phdthesis{k, author={A B}, title={T}, year={2020}}";
        assert_eq!(
            parse_bibtex(raw, &NameRules::default()),
            Err(ParseError::UnsupportedEntryType("phdthesis".to_string()))
        );
    }

    #[test]
    fn test_normalize_edition() {
        assert_eq!(normalize_edition("2nd"), "2");
        assert_eq!(normalize_edition("Third"), "3");
        assert_eq!(normalize_edition("4"), "4");
        assert_eq!(normalize_edition("Revised"), "Revised");
    }
}
