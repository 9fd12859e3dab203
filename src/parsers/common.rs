//! Low-level extraction helpers shared by the parsers.

use super::ParseError;
use crate::utils::{validate_date, validate_url};

/// Compile a hard-coded pattern once
macro_rules! static_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static ::regex::Regex {
            static RE: ::std::sync::OnceLock<::regex::Regex> = ::std::sync::OnceLock::new();
            RE.get_or_init(|| ::regex::Regex::new($pattern).expect("hard-coded regex is valid"))
        }
    };
}
pub(crate) use static_regex;

static_regex!(year_re, r"\b(\d{4})\b");
static_regex!(publish_date_re, r"\(\s*(\d{4}(?:-\d{1,2}){0,2})\s*\)");
static_regex!(access_date_re, r"\[\s*(\d{4}(?:-\d{1,2}){0,2})\s*\]");
static_regex!(url_re, r"(?i)\b(?:https?|ftp)://\S+");

/// Split `Authors. Rest` at the first period followed by whitespace
///
/// A period inside an initial run such as `Doe A. B.` is accepted as the
/// boundary only when what follows does not look like another initial.
pub(crate) fn split_authors_title(text: &str) -> Option<(&str, &str)> {
    let bytes = text.as_bytes();
    for (i, _) in text.match_indices(['.', '。']) {
        let width = if bytes[i] == b'.' { 1 } else { '。'.len_utf8() };
        let rest = &text[i + width..];
        if !(rest.is_empty() || rest.starts_with(char::is_whitespace) || bytes[i] != b'.') {
            continue;
        }
        let head = text[..i].trim();
        if head.is_empty() {
            continue;
        }
        if follows_initial(head) && next_is_initial(rest) {
            continue;
        }
        return Some((head, rest.trim_start()));
    }
    None
}

fn follows_initial(head: &str) -> bool {
    head.rsplit(|c: char| c.is_whitespace() || c == '.')
        .next()
        .is_some_and(|w| w.chars().count() == 1 && w.chars().all(char::is_uppercase))
}

fn next_is_initial(rest: &str) -> bool {
    let word = rest.trim_start().split([' ', ',']).next().unwrap_or("");
    let letters: Vec<char> = word.chars().filter(|c| *c != '.').collect();
    letters.len() == 1 && letters[0].is_uppercase() && word.ends_with('.')
}

/// Normalize a page range: `123--135`, `123–135` and `pp. 123 - 135` become `123-135`
pub(crate) fn normalize_pages(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('.');
    let trimmed = trimmed
        .strip_prefix("pp.")
        .or_else(|| trimmed.strip_prefix("p."))
        .unwrap_or(trimmed);
    let pages: String = trimmed
        .replace("--", "-")
        .replace(['–', '—'], "-")
        .split('-')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("-");
    if pages.is_empty() {
        None
    } else {
        Some(pages)
    }
}

/// First standalone four-digit year in text
pub(crate) fn parse_year(text: &str) -> Option<i32> {
    year_re()
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
}

/// Dates and URL found in the tail of a web citation
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct WebTail {
    pub publish_date: Option<String>,
    pub access_date: Option<String>,
    pub url: Option<String>,
}

/// Extract `(publish)`, `[access]` and the final URL independently
pub(crate) fn parse_web_tail(tail: &str) -> Result<WebTail, ParseError> {
    let publish_date = publish_date_re()
        .captures(tail)
        .map(|caps| validate_date(&caps[1]))
        .transpose()
        .map_err(|e| ParseError::malformed("publish_date", e.to_string()))?;
    let access_date = access_date_re()
        .captures(tail)
        .map(|caps| validate_date(&caps[1]))
        .transpose()
        .map_err(|e| ParseError::malformed("access_date", e.to_string()))?;

    let url = match last_url(tail) {
        Some(candidate) => Some(
            validate_url(candidate).map_err(|e| ParseError::malformed("url", e.to_string()))?,
        ),
        None => None,
    };

    tracing::trace!(?publish_date, ?access_date, ?url, "web tail");
    Ok(WebTail {
        publish_date,
        access_date,
        url,
    })
}

/// The last scheme-prefixed token, without one trailing period
pub(crate) fn last_url(text: &str) -> Option<&str> {
    url_re().find_iter(text).last().map(|m| {
        let url = m.as_str();
        url.strip_suffix('.').unwrap_or(url)
    })
}

/// Trim surrounding whitespace and trailing sentence punctuation
pub(crate) fn clean_segment(text: &str) -> &str {
    text.trim()
        .trim_end_matches(['.', '。', ',', '，'])
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_authors_title() {
        assert_eq!(
            split_authors_title("Yu H B, Liu J G. Intelligent robotics[J]. X, 2023"),
            Some(("Yu H B, Liu J G", "Intelligent robotics[J]. X, 2023"))
        );
        assert_eq!(
            split_authors_title("INNFOS. Robots[EB/OL]. https://innfos.com/"),
            Some(("INNFOS", "Robots[EB/OL]. https://innfos.com/"))
        );
        assert_eq!(
            split_authors_title("Doe A. B. Title here[J]. X, 2020"),
            Some(("Doe A. B", "Title here[J]. X, 2020"))
        );
        assert_eq!(split_authors_title("no boundary"), None);
    }

    #[test]
    fn test_normalize_pages() {
        assert_eq!(normalize_pages("123--135").as_deref(), Some("123-135"));
        assert_eq!(normalize_pages("pp. 123–135").as_deref(), Some("123-135"));
        assert_eq!(normalize_pages("e1002 ").as_deref(), Some("e1002"));
        assert_eq!(normalize_pages(" "), None);
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("Spring 2019 issue"), Some(2019));
        assert_eq!(parse_year("n.d."), None);
    }

    #[test]
    fn test_parse_web_tail() {
        let tail = parse_web_tail(". (2024-02-07) [2025-07-23]. https://news.dayoo.com/a.htm.").unwrap();
        assert_eq!(tail.publish_date.as_deref(), Some("2024-02-07"));
        assert_eq!(tail.access_date.as_deref(), Some("2025-07-23"));
        assert_eq!(tail.url.as_deref(), Some("https://news.dayoo.com/a.htm"));

        let legacy = parse_web_tail("[2020-04-30]. https://innfos.com/").unwrap();
        assert_eq!(legacy.publish_date, None);
        assert_eq!(legacy.access_date.as_deref(), Some("2020-04-30"));
    }

    #[test]
    fn test_parse_web_tail_invalid_date() {
        let err = parse_web_tail("(2024-02-30) https://a.com").unwrap_err();
        assert_eq!(err.field(), Some("publish_date"));
    }
}
