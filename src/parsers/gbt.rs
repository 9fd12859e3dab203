//! GB/T 7714 citation parser.
//!
//! Reverses the output templates, so any string produced by
//! [`crate::formatters::format_gbt`] parses back to an equal rendering.

use super::authors::{Delimiter, NameRules};
use super::common::{clean_segment, normalize_pages, parse_web_tail, split_authors_title, static_regex};
use super::ParseError;
use crate::models::{Citation, CitationBuilder, EntryType};
use crate::utils::text::collapse_whitespace;

static_regex!(tag_re, r"\[(?P<tag>[A-Z]{1,2}(?:/OL)?)\]");
static_regex!(doi_re, r"(?i)\bDOI\s*[:：]\s*(?P<doi>\S+)");
static_regex!(
    journal_re,
    r"^(?P<container>.+?),\s*(?P<year>\d{4})\s*(?P<rest>[,(:].*)?$"
);
static_regex!(
    journal_rest_re,
    r"^(?:,\s*(?P<volume>[^(:]+?))?\s*(?:\((?P<issue>[^)]*)\))?\s*(?::\s*(?P<pages>.+))?$"
);
static_regex!(
    conference_re,
    r"^(?P<container>.+?)\.\s*(?:(?:(?P<place>[^:：.]+)[:：]\s*)?(?P<publisher>[^,.]+),\s*)?(?P<year>\d{4})(?:\s*:\s*(?P<pages>.+))?$"
);
static_regex!(
    edition_re,
    r"^(?P<edition>\d+)\s*(?:版|(?:st|nd|rd|th)\s+ed\.?)\.?\s*"
);
static_regex!(
    book_re,
    r"^(?:(?P<place>[^:：]+)[:：]\s*)?(?P<publisher>.+?)\s*[,，]\s*(?P<year>\d{4})$"
);

/// Parse a GB/T 7714 citation keyed by its type tag
pub(crate) fn parse_gbt(raw: &str, rules: &NameRules) -> Result<Citation, ParseError> {
    let text = collapse_whitespace(raw);
    let (authors_raw, rest) = split_authors_title(&text)
        .ok_or_else(|| ParseError::malformed("author", "no period after the author list"))?;

    let tag = tag_re()
        .captures(rest)
        .ok_or_else(|| ParseError::malformed("title", "no type tag after the title"))?;
    let span = tag.get(0).map_or(0..0, |m| m.range());
    let entry_type = EntryType::from_tag(&tag["tag"])
        .ok_or_else(|| ParseError::UnsupportedEntryType(tag["tag"].to_string()))?;
    tracing::debug!(%entry_type, "parsing GB/T citation");

    let title = clean_segment(&rest[..span.start]);
    let tail = rest[span.end..].trim_start_matches(['.', ' ']);
    let authors = rules.normalize(authors_raw, Delimiter::List)?;

    let builder = CitationBuilder::new(entry_type, title)
        .authors(authors.authors)
        .more_authors(authors.more_authors);

    let builder = match entry_type {
        EntryType::Journal => journal(builder, tail)?,
        EntryType::Conference => conference(builder, tail)?,
        EntryType::Book => book(builder, tail)?,
        EntryType::WebResource => {
            let web = parse_web_tail(tail)?;
            let year = web
                .publish_date
                .as_deref()
                .and_then(|date| date.get(..4))
                .and_then(|year| year.parse().ok());
            builder
                .maybe_year(year)
                .url(web.url.unwrap_or_default())
                .publish_date(web.publish_date.unwrap_or_default())
                .access_date(web.access_date.unwrap_or_default())
        }
    };

    let citation = builder.build();
    citation.check_required()?;
    Ok(citation)
}

/// Split a trailing `DOI: ...` clause off the body
fn split_doi(tail: &str) -> (&str, Option<&str>) {
    match doi_re().captures(tail) {
        Some(caps) => {
            let start = caps.get(0).map_or(tail.len(), |m| m.start());
            let doi = caps.name("doi").map(|m| m.as_str().trim_end_matches('.'));
            (&tail[..start], doi)
        }
        None => (tail, None),
    }
}

fn parse_year(text: &str) -> Result<i32, ParseError> {
    text.parse()
        .map_err(|_| ParseError::malformed("year", format!("`{}` is not a year", text)))
}

/// `Container, Year, Volume(Issue): Pages. DOI: doi`
fn journal(builder: CitationBuilder, tail: &str) -> Result<CitationBuilder, ParseError> {
    let (body, doi) = split_doi(tail);
    let body = clean_segment(body);
    let caps = journal_re()
        .captures(body)
        .ok_or_else(|| ParseError::malformed("container", "expected `Container, Year` after [J]"))?;

    let mut builder = builder
        .container(caps["container"].trim())
        .year(parse_year(&caps["year"])?)
        .doi(doi.unwrap_or_default());

    if let Some(rest) = caps.name("rest") {
        let parts = journal_rest_re().captures(rest.as_str()).ok_or_else(|| {
            ParseError::malformed("volume", format!("unexpected `{}`", rest.as_str()))
        })?;
        builder = builder
            .volume(parts.name("volume").map_or("", |m| m.as_str()))
            .issue(parts.name("issue").map_or("", |m| m.as_str()))
            .pages(
                parts
                    .name("pages")
                    .and_then(|m| normalize_pages(m.as_str()))
                    .unwrap_or_default(),
            );
    }
    Ok(builder)
}

/// `// Container. Place: Publisher, Year: Pages. DOI: doi`
fn conference(builder: CitationBuilder, tail: &str) -> Result<CitationBuilder, ParseError> {
    let tail = tail.trim_start();
    let tail = tail.strip_prefix("//").unwrap_or(tail).trim_start();
    let (body, doi) = split_doi(tail);
    let body = clean_segment(body);

    let caps = conference_re().captures(body).ok_or_else(|| {
        ParseError::malformed("container", "expected `// Container. Year` after [C]")
    })?;

    Ok(builder
        .container(caps["container"].trim())
        .place(caps.name("place").map_or("", |m| m.as_str()))
        .publisher(caps.name("publisher").map_or("", |m| m.as_str()))
        .year(parse_year(&caps["year"])?)
        .pages(
            caps.name("pages")
                .and_then(|m| normalize_pages(m.as_str()))
                .unwrap_or_default(),
        )
        .doi(doi.unwrap_or_default()))
}

/// `Edition. Place: Publisher, Year.`
fn book(builder: CitationBuilder, tail: &str) -> Result<CitationBuilder, ParseError> {
    let body = clean_segment(tail);
    let (edition, body) = match edition_re().captures(body) {
        Some(caps) => {
            let end = caps.get(0).map_or(0, |m| m.end());
            (caps["edition"].to_string(), &body[end..])
        }
        None => (String::new(), body),
    };

    let caps = book_re().captures(body).ok_or_else(|| {
        ParseError::malformed("publisher", "expected `Place: Publisher, Year` after [M]")
    })?;

    Ok(builder
        .edition(edition)
        .place(caps.name("place").map_or("", |m| m.as_str()))
        .publisher(caps["publisher"].trim())
        .year(parse_year(&caps["year"])?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Citation {
        parse_gbt(raw, &NameRules::default()).unwrap()
    }

    #[test]
    fn test_journal() {
        let citation = parse(
            "Yu H B, Liu J G, Liu L Q, et al. Intelligent robotics and applications[J]. \
             Example Journal, 2023, 12(1): 20-30. DOI: 10.1000/xyz123",
        );
        assert_eq!(citation.entry_type(), EntryType::Journal);
        assert_eq!(citation.authors().len(), 3);
        assert!(citation.more_authors());
        assert_eq!(citation.title(), "Intelligent robotics and applications");
        assert_eq!(citation.container(), Some("Example Journal"));
        assert_eq!(citation.year(), Some(2023));
        assert_eq!(citation.volume(), Some("12"));
        assert_eq!(citation.issue(), Some("1"));
        assert_eq!(citation.pages(), Some("20-30"));
        assert_eq!(citation.doi(), Some("10.1000/xyz123"));
    }

    #[test]
    fn test_journal_partial_numbering() {
        let citation = parse("张三, 李四. 示例标题[J]. 测试期刊, 2024, 10: 1-10.");
        assert_eq!(citation.volume(), Some("10"));
        assert_eq!(citation.issue(), None);

        let citation = parse("张三. 示例标题[J]. 测试期刊, 2024(3): 5-9.");
        assert_eq!(citation.volume(), None);
        assert_eq!(citation.issue(), Some("3"));
        assert_eq!(citation.pages(), Some("5-9"));

        let citation = parse("张三. 示例标题[J]. 测试期刊, 2024.");
        assert_eq!(citation.volume(), None);
        assert_eq!(citation.pages(), None);
    }

    #[test]
    fn test_conference() {
        let citation = parse(
            "Vaswani A, Shazeer N M, Parmar N, et al. Attention is All you Need[C] // \
             Neural Information Processing Systems. 2017.",
        );
        assert_eq!(citation.entry_type(), EntryType::Conference);
        assert_eq!(citation.container(), Some("Neural Information Processing Systems"));
        assert_eq!(citation.year(), Some(2017));

        let citation = parse(
            "Chen L. Fast parsing[C] // Proc. Parsing Workshop. New York: ACM, 2019: 10-20. DOI: 10.1145/1.2",
        );
        assert_eq!(citation.container(), Some("Proc. Parsing Workshop"));
        assert_eq!(citation.place(), Some("New York"));
        assert_eq!(citation.publisher(), Some("ACM"));
        assert_eq!(citation.pages(), Some("10-20"));
        assert_eq!(citation.doi(), Some("10.1145/1.2"));
    }

    #[test]
    fn test_book() {
        let citation = parse("刘伟. Python 编程实践[M]. 2版. 北京: 机械工业出版社, 2023.");
        assert_eq!(citation.entry_type(), EntryType::Book);
        assert_eq!(citation.edition(), Some("2"));
        assert_eq!(citation.place(), Some("北京"));
        assert_eq!(citation.publisher(), Some("机械工业出版社"));
        assert_eq!(citation.year(), Some(2023));

        let citation = parse("Knuth D E. The art of computer programming[M]. 3rd ed. Boston: Addison-Wesley, 1997.");
        assert_eq!(citation.edition(), Some("3"));
        assert_eq!(citation.place(), Some("Boston"));
    }

    #[test]
    fn test_keyword_surname_author() {
        let citation = parse("Press W H, Teukolsky S A. Numerical recipes[M]. 3rd ed. Cambridge: Cambridge University Press, 2007.");
        assert_eq!(citation.authors().len(), 2);
        assert_eq!(citation.authors()[0].display_name, "Press W H");
        assert!(!citation.authors()[0].is_institution);
        assert_eq!(citation.publisher(), Some("Cambridge University Press"));
    }

    #[test]
    fn test_web() {
        let citation = parse("INNFOS. Robots[EB/OL]. (2020-01-01) [2020-04-30]. https://innfos.com/");
        assert_eq!(citation.entry_type(), EntryType::WebResource);
        assert_eq!(citation.authors()[0].display_name, "INNFOS");
        assert_eq!(citation.year(), Some(2020));
        assert_eq!(citation.url(), Some("https://innfos.com/"));
    }

    #[test]
    fn test_unsupported_tag() {
        assert_eq!(
            parse_gbt("张三. 某论文[D]. 北京: 某大学, 2020.", &NameRules::default()),
            Err(ParseError::UnsupportedEntryType("D".to_string()))
        );
    }

    #[test]
    fn test_journal_without_year() {
        let err = parse_gbt("Smith J. Title[J]. Some Journal.", &NameRules::default()).unwrap_err();
        assert_eq!(err.field(), Some("container"));
    }
}
