//! Citation model representing one reference independent of its input style.

use serde::{Deserialize, Serialize};

use crate::config::COMPOUND_SURNAMES;
use crate::parsers::ParseError;
use crate::utils::text::contains_han;

/// The GB/T 7714 entry type of a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Journal article `[J]`
    Journal,
    /// Conference paper `[C]`
    Conference,
    /// Monograph `[M]`
    Book,
    /// Online electronic resource `[EB/OL]`
    WebResource,
}

impl EntryType {
    /// Returns the GB/T type tag without brackets
    pub fn tag(&self) -> &'static str {
        match self {
            EntryType::Journal => "J",
            EntryType::Conference => "C",
            EntryType::Book => "M",
            EntryType::WebResource => "EB/OL",
        }
    }

    /// Resolve a type tag (`J`, `C`, `M`, `EB/OL`, `DB/OL`)
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "J" => Some(EntryType::Journal),
            "C" => Some(EntryType::Conference),
            "M" => Some(EntryType::Book),
            "EB/OL" | "DB/OL" => Some(EntryType::WebResource),
            _ => None,
        }
    }

    /// Fields that must be present for this entry type, besides title and authors
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            EntryType::Journal => &["container", "year"],
            EntryType::Conference => &["container", "year"],
            EntryType::Book => &["publisher", "year"],
            EntryType::WebResource => &["url"],
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.tag())
    }
}

/// One author of a reference, already normalized for display
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Author {
    /// "Surname I I" for Western names, the full name for Chinese names,
    /// verbatim text for institutions
    pub display_name: String,

    /// Institutional authors are never split into name parts
    pub is_institution: bool,
}

impl Author {
    /// Create a personal author from an already normalized name
    pub fn person(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            is_institution: false,
        }
    }

    /// Create an institutional author
    pub fn institution(name: impl Into<String>) -> Self {
        Self {
            display_name: name.into(),
            is_institution: true,
        }
    }

    /// Whether the name is written in Han script
    pub fn is_chinese(&self) -> bool {
        contains_han(&self.display_name)
    }

    /// The family-name part of the display name
    ///
    /// Institutions return their whole name; Western names drop the trailing
    /// initials; Chinese names return their first character, or the first
    /// two when they open with a built-in compound surname such as `欧阳`.
    pub fn surname(&self) -> &str {
        if self.is_institution {
            return &self.display_name;
        }
        if self.is_chinese() {
            let name = self.display_name.as_str();
            let boundary = |n: usize| name.char_indices().nth(n).map(|(idx, _)| idx);
            // A third character must remain for the given name
            if let Some(two) = boundary(2) {
                if COMPOUND_SURNAMES.contains(&&name[..two]) {
                    return &name[..two];
                }
            }
            return boundary(1).map_or(name, |idx| &name[..idx]);
        }

        let mut end = self.display_name.len();
        for word in self.display_name.rsplit(' ') {
            let is_initial = word.len() == 1 && word.chars().all(|c| c.is_ascii_uppercase());
            if !is_initial || end == word.len() {
                break;
            }
            end -= word.len() + 1;
        }
        &self.display_name[..end]
    }
}

/// A single reference in canonical form
///
/// Produced by the parsers and consumed by the formatters. Fields are only
/// readable; use [`Citation::to_builder`] to derive an edited copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub(crate) entry_type: EntryType,
    pub(crate) authors: Vec<Author>,
    pub(crate) more_authors: bool,
    pub(crate) title: String,
    pub(crate) container: Option<String>,
    pub(crate) year: Option<i32>,
    pub(crate) volume: Option<String>,
    pub(crate) issue: Option<String>,
    pub(crate) pages: Option<String>,
    pub(crate) doi: Option<String>,
    pub(crate) url: Option<String>,
    pub(crate) publish_date: Option<String>,
    pub(crate) access_date: Option<String>,
    pub(crate) publisher: Option<String>,
    pub(crate) place: Option<String>,
    pub(crate) edition: Option<String>,
    pub(crate) raw_key: Option<String>,
}

impl Citation {
    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    /// Authors in citation order
    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    /// True when the source text listed fewer authors than the work has
    pub fn more_authors(&self) -> bool {
        self.more_authors
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Journal or proceedings name
    pub fn container(&self) -> Option<&str> {
        self.container.as_deref()
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn volume(&self) -> Option<&str> {
        self.volume.as_deref()
    }

    pub fn issue(&self) -> Option<&str> {
        self.issue.as_deref()
    }

    pub fn pages(&self) -> Option<&str> {
        self.pages.as_deref()
    }

    /// DOI without any resolver prefix
    pub fn doi(&self) -> Option<&str> {
        self.doi.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn publish_date(&self) -> Option<&str> {
        self.publish_date.as_deref()
    }

    pub fn access_date(&self) -> Option<&str> {
        self.access_date.as_deref()
    }

    pub fn publisher(&self) -> Option<&str> {
        self.publisher.as_deref()
    }

    pub fn place(&self) -> Option<&str> {
        self.place.as_deref()
    }

    pub fn edition(&self) -> Option<&str> {
        self.edition.as_deref()
    }

    /// Caller-supplied bibitem key
    pub fn raw_key(&self) -> Option<&str> {
        self.raw_key.as_deref()
    }

    /// Start an edited copy of this citation
    pub fn to_builder(&self) -> CitationBuilder {
        CitationBuilder {
            citation: self.clone(),
        }
    }

    /// Copy of this citation carrying a bibitem key override
    pub fn with_key(&self, key: impl Into<String>) -> Self {
        self.to_builder().raw_key(key).build()
    }

    /// Names of mandatory fields that are empty for this entry type
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.authors.is_empty() {
            missing.push("author");
        }
        for field in self.entry_type.required_fields() {
            let present = match *field {
                "container" => self.container.is_some(),
                "year" => self.year.is_some(),
                "publisher" => self.publisher.is_some(),
                "url" => self.url.is_some(),
                _ => true,
            };
            if !present {
                missing.push(*field);
            }
        }
        missing
    }

    /// Fail with [`ParseError::MalformedField`] on the first missing mandatory field
    pub fn check_required(&self) -> Result<(), ParseError> {
        match self.missing_fields().first().copied() {
            Some(field) => Err(ParseError::missing(field, self.entry_type)),
            None => {
                if self.entry_type == EntryType::Journal {
                    if self.volume.is_none() {
                        tracing::warn!(title = %self.title, "journal entry has no volume");
                    }
                    if self.pages.is_none() {
                        tracing::warn!(title = %self.title, "journal entry has no page range");
                    }
                }
                Ok(())
            }
        }
    }
}

/// Builder for constructing Citation objects
///
/// Empty or whitespace-only strings passed to the optional setters are
/// stored as absent.
#[derive(Debug, Clone)]
pub struct CitationBuilder {
    citation: Citation,
}

fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

impl CitationBuilder {
    /// Create a new builder with required fields
    pub fn new(entry_type: EntryType, title: impl Into<String>) -> Self {
        Self {
            citation: Citation {
                entry_type,
                authors: Vec::new(),
                more_authors: false,
                title: title.into().trim().to_string(),
                container: None,
                year: None,
                volume: None,
                issue: None,
                pages: None,
                doi: None,
                url: None,
                publish_date: None,
                access_date: None,
                publisher: None,
                place: None,
                edition: None,
                raw_key: None,
            },
        }
    }

    pub fn entry_type(mut self, entry_type: EntryType) -> Self {
        self.citation.entry_type = entry_type;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.citation.title = title.into().trim().to_string();
        self
    }

    /// Replace the author list
    pub fn authors(mut self, authors: Vec<Author>) -> Self {
        self.citation.authors = authors;
        self
    }

    /// Append one author
    pub fn author(mut self, author: Author) -> Self {
        self.citation.authors.push(author);
        self
    }

    /// Mark the author list as already truncated in the source
    pub fn more_authors(mut self, more: bool) -> Self {
        self.citation.more_authors = more;
        self
    }

    pub fn container(mut self, container: impl Into<String>) -> Self {
        self.citation.container = non_empty(container);
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.citation.year = Some(year);
        self
    }

    pub fn maybe_year(mut self, year: Option<i32>) -> Self {
        self.citation.year = year;
        self
    }

    pub fn volume(mut self, volume: impl Into<String>) -> Self {
        self.citation.volume = non_empty(volume);
        self
    }

    pub fn issue(mut self, issue: impl Into<String>) -> Self {
        self.citation.issue = non_empty(issue);
        self
    }

    pub fn pages(mut self, pages: impl Into<String>) -> Self {
        self.citation.pages = non_empty(pages);
        self
    }

    /// Set DOI; any resolver prefix is removed
    pub fn doi(mut self, doi: impl Into<String>) -> Self {
        self.citation.doi = crate::utils::normalize_doi(&doi.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.citation.url = non_empty(url);
        self
    }

    pub fn publish_date(mut self, date: impl Into<String>) -> Self {
        self.citation.publish_date = non_empty(date);
        self
    }

    pub fn access_date(mut self, date: impl Into<String>) -> Self {
        self.citation.access_date = non_empty(date);
        self
    }

    pub fn publisher(mut self, publisher: impl Into<String>) -> Self {
        self.citation.publisher = non_empty(publisher);
        self
    }

    pub fn place(mut self, place: impl Into<String>) -> Self {
        self.citation.place = non_empty(place);
        self
    }

    pub fn edition(mut self, edition: impl Into<String>) -> Self {
        self.citation.edition = non_empty(edition);
        self
    }

    pub fn raw_key(mut self, key: impl Into<String>) -> Self {
        self.citation.raw_key = non_empty(key);
        self
    }

    /// Build the Citation
    pub fn build(self) -> Citation {
        self.citation
    }
}
