//! Author-list normalization shared by every parser.
//!
//! Each input style separates authors differently ([`Delimiter`]); after
//! splitting, every token becomes one [`Author`]:
//!
//! - institutions (keyword, acronym or Han marker) are kept verbatim, but a
//!   token shaped like a personal name is never one;
//! - unbroken Han runs go through [`NameRules::segment_han_run`];
//! - Western names become "Surname I I" whatever order the source used.

use std::collections::{HashMap, HashSet};

use super::segment::Segmentation;
use super::ParseError;
use crate::config::{AuthorsConfig, COMPOUND_SURNAMES, SINGLE_SURNAMES};
use crate::models::Author;
use crate::utils::text::{collapse_whitespace, contains_han, is_han_run, strip_latex};

/// Authors shown before the list is cut
pub const MAX_AUTHORS: usize = 3;

/// Lowercase words that belong to the surname when they precede it
const SURNAME_PARTICLES: [&str; 16] = [
    "van", "von", "de", "der", "den", "du", "da", "di", "del", "della", "le", "la", "dos", "das",
    "ten", "ter",
];

/// How the calling format separates authors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// Comma or semicolon, including full-width forms (GB/T, web entries)
    List,
    /// Top-level ` and ` (BibTeX)
    And,
    /// `&` and comma with "Surname, I." pairs (APA)
    Apa,
}

/// Authors extracted from one author segment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedAuthors {
    pub authors: Vec<Author>,
    /// The segment ended with `et al.`, `等` or `others`
    pub more_authors: bool,
}

/// Read-only dictionaries used to recognize institutions and split names
#[derive(Debug, Clone)]
pub struct NameRules {
    single_surnames: HashMap<char, usize>,
    compound_surnames: HashMap<String, usize>,
    institution_keywords: HashSet<String>,
    han_markers: Vec<String>,
    han_suffixes: Vec<String>,
    publisher_keywords: Vec<String>,
    strict_segmentation: bool,
}

impl Default for NameRules {
    fn default() -> Self {
        Self::new(&AuthorsConfig::default())
    }
}

impl NameRules {
    /// Compile the rules from configuration
    pub fn new(config: &AuthorsConfig) -> Self {
        let mut single_surnames = HashMap::new();
        for (rank, c) in SINGLE_SURNAMES.chars().enumerate() {
            single_surnames.entry(c).or_insert(rank);
        }
        let mut compound_surnames: HashMap<String, usize> = COMPOUND_SURNAMES
            .iter()
            .enumerate()
            .map(|(rank, s)| (s.to_string(), rank))
            .collect();

        let offset = single_surnames.len();
        for (i, surname) in config.extra_surnames.iter().enumerate() {
            let surname = surname.trim();
            let mut chars = surname.chars();
            match (chars.next(), chars.next(), chars.next()) {
                (Some(c), None, _) => {
                    single_surnames.entry(c).or_insert(offset + i);
                }
                (Some(_), Some(_), None) => {
                    compound_surnames
                        .entry(surname.to_string())
                        .or_insert(offset + i);
                }
                _ => tracing::warn!(surname, "ignoring surname that is not one or two characters"),
            }
        }

        Self {
            single_surnames,
            compound_surnames,
            institution_keywords: config
                .institution_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            han_markers: config.han_institution_markers.clone(),
            han_suffixes: config.han_institution_suffixes.clone(),
            publisher_keywords: config.publisher_keywords.clone(),
            strict_segmentation: config.strict_segmentation,
        }
    }

    pub(crate) fn single_rank(&self, c: char) -> Option<usize> {
        self.single_surnames.get(&c).copied()
    }

    pub(crate) fn compound_rank(&self, pair: &str) -> Option<usize> {
        self.compound_surnames.get(pair).copied()
    }

    /// Whether a token names an organization rather than a person
    pub fn is_institution(&self, token: &str) -> bool {
        let token = token.trim();
        if token.is_empty() {
            return false;
        }

        if contains_han(token) {
            if self.han_markers.iter().any(|m| token.contains(m.as_str())) {
                return true;
            }
            return token.chars().count() >= 3
                && self.han_suffixes.iter().any(|s| token.ends_with(s.as_str()));
        }

        if has_personal_shape(token) {
            return false;
        }

        let words: Vec<&str> = token
            .split(|c: char| !c.is_alphanumeric() && c != '&')
            .filter(|w| !w.is_empty())
            .collect();

        match words.as_slice() {
            // A lone word is a surname unless it is an acronym
            [word] => is_acronym(word) && !token.contains('.'),
            _ => words
                .iter()
                .any(|w| self.institution_keywords.contains(&w.to_lowercase())),
        }
    }

    /// Whether text mentions a configured publisher keyword
    pub(crate) fn mentions_publisher(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.publisher_keywords.iter().any(|k| {
            let k = k.to_lowercase();
            if contains_han(&k) {
                return lower.contains(&k);
            }
            lower
                .split(|c: char| !c.is_alphanumeric() && c != '-' && c != '\'')
                .any(|w| w == k)
                || (k.contains(' ') && lower.contains(&k))
        })
    }

    /// Split a raw author segment into normalized authors
    pub fn normalize(&self, raw: &str, delimiter: Delimiter) -> Result<NormalizedAuthors, ParseError> {
        let mut result = NormalizedAuthors::default();

        match delimiter {
            Delimiter::List => {
                let unified: String = raw
                    .chars()
                    .map(|c| match c {
                        '，' | '；' | '、' | ';' => ',',
                        c => c,
                    })
                    .collect();
                for token in unified.split(',') {
                    self.push_token(token, &mut result)?;
                }
            }
            Delimiter::And => {
                for token in split_bibtex_names(raw) {
                    let trimmed = token.trim();
                    if is_braced_group(trimmed) {
                        let name = strip_latex(trimmed);
                        if !name.is_empty() {
                            result.authors.push(Author::institution(name));
                        }
                    } else {
                        self.push_token(&strip_latex(trimmed), &mut result)?;
                    }
                }
            }
            Delimiter::Apa => self.push_apa_parts(raw, &mut result)?,
        }

        tracing::trace!(count = result.authors.len(), more = result.more_authors, "normalized authors");
        Ok(result)
    }

    fn push_apa_parts(&self, raw: &str, result: &mut NormalizedAuthors) -> Result<(), ParseError> {
        let unified = raw.replace('&', ",").replace('，', ",");
        let mut pending: Option<&str> = None;

        for part in unified.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            if is_marker(part) {
                result.more_authors = true;
                continue;
            }

            if let Some(surname) = pending.take() {
                if looks_like_given(part) && !self.is_institution(part) {
                    result
                        .authors
                        .push(Author::person(western_display_name(&format!("{}, {}", surname, part))));
                    continue;
                }
                self.push_token(surname, result)?;
            }

            let whole_name = part.contains(' ') && !looks_like_surname(part);
            if whole_name || contains_han(part) || self.is_institution(part) {
                self.push_token(part, result)?;
            } else {
                pending = Some(part);
            }
        }

        if let Some(surname) = pending {
            self.push_token(surname, result)?;
        }
        Ok(())
    }

    fn push_token(&self, token: &str, result: &mut NormalizedAuthors) -> Result<(), ParseError> {
        let token = collapse_whitespace(token);
        let token = token.trim_matches(|c: char| c == ',' || c == ';' || c.is_whitespace());
        if token.is_empty() {
            return Ok(());
        }
        if is_marker(token) {
            result.more_authors = true;
            return Ok(());
        }

        if contains_han(token) {
            return self.push_han_token(token, result);
        }

        if self.is_institution(token) {
            result
                .authors
                .push(Author::institution(token.trim_end_matches('.')));
        } else {
            result.authors.push(Author::person(western_display_name(token)));
        }
        Ok(())
    }

    fn push_han_token(&self, token: &str, result: &mut NormalizedAuthors) -> Result<(), ParseError> {
        let token = token.trim_end_matches(['.', '。']);
        if self.is_institution(token) {
            result.authors.push(Author::institution(token));
            return Ok(());
        }

        let pieces: Vec<&str> = token.split(' ').collect();
        let runs: Vec<String> = if pieces.iter().any(|p| p.chars().count() == 1) {
            vec![pieces.concat()]
        } else {
            pieces.iter().map(|p| p.to_string()).collect()
        };

        for run in runs {
            if !is_han_run(&run) {
                result.authors.push(Author::person(run));
                continue;
            }
            match self.segment_han_run(&run) {
                Segmentation::Single => result.authors.push(Author::person(run)),
                Segmentation::Split(names) => {
                    result.authors.extend(names.into_iter().map(Author::person));
                }
                Segmentation::Ambiguous(reason) => {
                    if self.strict_segmentation {
                        return Err(ParseError::AmbiguousAuthorSegmentation(format!(
                            "{}: {}",
                            run, reason
                        )));
                    }
                    tracing::warn!(run = %run, %reason, "keeping unsplittable Han run as one institution");
                    result.authors.push(Author::institution(run));
                }
            }
        }
        Ok(())
    }
}

/// `et al.`, `等`, `others` and ellipses stand for omitted authors
fn is_marker(token: &str) -> bool {
    let token = token.trim();
    if !token.is_empty() && token.chars().all(|c| c == '.' || c == '…') {
        return true;
    }
    let lower = token.trim_end_matches('.').to_lowercase();
    matches!(lower.as_str(), "et al" | "et. al" | "等" | "等等" | "others")
}

fn is_acronym(word: &str) -> bool {
    word.chars().filter(|c| c.is_ascii_alphabetic()).count() >= 2
        && word
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '&')
}

/// A single initial or a compact group such as `A.`, `N.M.`, `JR`, `J-P`
fn is_initials(word: &str) -> bool {
    let letters: Vec<char> = word.chars().filter(|c| *c != '.' && *c != '-').collect();
    !letters.is_empty() && letters.len() <= 3 && letters.iter().all(|c| c.is_uppercase())
}

/// `W`, `H.` or a dotted group such as `N.M.`; bare `ACM` does not count
fn is_name_initial(word: &str) -> bool {
    is_initials(word)
        && (word.contains('.') || word.chars().filter(|c| c.is_alphabetic()).count() == 1)
}

/// Shapes only a personal name takes: `Surname, Given`, `Surname I I` and
/// `Given I. Surname`
fn has_personal_shape(token: &str) -> bool {
    if let Some((surname, given)) = token.split_once(',') {
        let surname_words = surname.split_whitespace().count();
        return (1..=3).contains(&surname_words) && looks_like_given(given.trim());
    }

    let words: Vec<&str> = token.split_whitespace().collect();
    if words.len() < 2 || words.len() > 5 {
        return false;
    }

    let trailing = words.iter().rev().take_while(|w| is_name_initial(w)).count();
    if trailing > 0 {
        let surname = &words[..words.len() - trailing];
        return (1..=3).contains(&surname.len())
            && surname
                .iter()
                .all(|w| !is_name_initial(w) && w.chars().any(char::is_alphabetic));
    }

    let Some((last, leading)) = words.split_last() else {
        return false;
    };
    let capitalized = |w: &&str| w.chars().next().is_some_and(char::is_uppercase);
    capitalized(last)
        && leading.iter().all(capitalized)
        && leading[1..].iter().all(|w| is_name_initial(w))
        && leading.iter().any(|w| is_name_initial(w))
}

/// The given-name half of an APA "Surname, Given" pair
fn looks_like_given(part: &str) -> bool {
    let words: Vec<&str> = part.split_whitespace().collect();
    if words.is_empty() {
        return false;
    }
    words.iter().all(|w| is_initials(w))
        || (words.len() <= 2
            && words
                .iter()
                .all(|w| w.chars().next().is_some_and(char::is_uppercase) && !w.contains(['(', ')'])))
}

/// Multi-word surnames such as `van Beethoven` or `De la Cruz`
fn looks_like_surname(part: &str) -> bool {
    let words: Vec<&str> = part.split_whitespace().collect();
    words.len() <= 3
        && words[..words.len().saturating_sub(1)]
            .iter()
            .all(|w| SURNAME_PARTICLES.contains(&w.to_lowercase().as_str()))
}

fn is_braced_group(token: &str) -> bool {
    if !(token.starts_with('{') && token.ends_with('}')) {
        return false;
    }
    let mut depth = 0usize;
    for (i, c) in token.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 && i != token.len() - 1 {
                    return false;
                }
            }
            _ => {}
        }
    }
    true
}

/// Split a BibTeX author field on ` and ` outside braces
fn split_bibtex_names(raw: &str) -> Vec<String> {
    let text = collapse_whitespace(raw);
    let mut names = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut rest = text.as_str();

    while let Some(c) = rest.chars().next() {
        if depth == 0 && rest.starts_with(" and ") {
            names.push(std::mem::take(&mut current));
            rest = &rest[5..];
            continue;
        }
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
        current.push(c);
        rest = &rest[c.len_utf8()..];
    }
    names.push(current);
    names
}

/// Normalize a Western personal name to "Surname I I"
///
/// Accepts "Given Surname", "Surname, Given" and already normalized
/// "Surname I I" forms.
pub fn western_display_name(token: &str) -> String {
    let token = collapse_whitespace(token);
    let token = token.trim().trim_end_matches(',');

    let (surname, given): (String, Vec<&str>) = match token.split_once(',') {
        Some((surname, given)) => (
            surname.trim().to_string(),
            given.split_whitespace().collect(),
        ),
        None => {
            let words: Vec<&str> = token.split_whitespace().collect();
            match words.as_slice() {
                [] => return String::new(),
                [only] => return only.trim_end_matches('.').to_string(),
                _ => {}
            }

            let last_is_initial = words.last().is_some_and(|w| is_initials(w));
            if last_is_initial {
                let split = words
                    .iter()
                    .rposition(|w| !is_initials(w))
                    .map(|i| i + 1)
                    .unwrap_or(1);
                (words[..split].join(" "), words[split..].to_vec())
            } else {
                let mut start = words.len() - 1;
                while start > 1
                    && SURNAME_PARTICLES.contains(&words[start - 1].to_lowercase().as_str())
                {
                    start -= 1;
                }
                (words[start..].join(" "), words[..start].to_vec())
            }
        }
    };

    let surname = surname.trim_end_matches('.').to_string();
    let initials = initials_of(&given);
    if initials.is_empty() {
        surname
    } else {
        format!("{} {}", surname, initials.join(" "))
    }
}

fn initials_of(given: &[&str]) -> Vec<String> {
    let mut initials = Vec::new();
    for word in given {
        for part in word.split(['-', '.']).filter(|p| !p.is_empty()) {
            if is_initials(part) {
                initials.extend(part.chars().map(|c| c.to_string()));
            } else if let Some(first) = part.chars().find(|c| c.is_alphabetic()) {
                initials.push(first.to_uppercase().to_string());
            }
        }
    }
    initials
}

/// The marker appended to a cut author list
///
/// "等" when any author, shown or cut, is written in Han script.
pub fn truncation_marker(authors: &[Author]) -> &'static str {
    if authors.iter().any(Author::is_chinese) {
        "等"
    } else {
        "et al."
    }
}

/// Render an author list, keeping at most [`MAX_AUTHORS`] names
pub fn render_author_list(authors: &[Author], more_authors: bool) -> String {
    let shown: Vec<&str> = authors
        .iter()
        .take(MAX_AUTHORS)
        .map(|a| a.display_name.as_str())
        .collect();
    let mut rendered = shown.join(", ");

    if authors.len() > MAX_AUTHORS || more_authors {
        if !rendered.is_empty() {
            rendered.push_str(", ");
        }
        rendered.push_str(truncation_marker(authors));
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn names(result: &NormalizedAuthors) -> Vec<&str> {
        result.authors.iter().map(|a| a.display_name.as_str()).collect()
    }

    #[rstest]
    #[case("Ashish Vaswani", "Vaswani A")]
    #[case("Noam M. Shazeer", "Shazeer N M")]
    #[case("Shazeer, N.M.", "Shazeer N M")]
    #[case("Doe, A. B.", "Doe A B")]
    #[case("Doe A B", "Doe A B")]
    #[case("Jean-Pierre Serre", "Serre J P")]
    #[case("Ludwig van Beethoven", "van Beethoven L")]
    #[case("van Beethoven L", "van Beethoven L")]
    #[case("J. R. R. Tolkien", "Tolkien J R R")]
    #[case("Smith", "Smith")]
    fn test_western_display_name(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(western_display_name(input), expected);
    }

    #[test]
    fn test_list_delimiter() {
        let rules = NameRules::default();
        let result = rules
            .normalize("Yu H B, Liu J G; Liu L Q， 等", Delimiter::List)
            .unwrap();
        assert_eq!(names(&result), vec!["Yu H B", "Liu J G", "Liu L Q"]);
        assert!(result.more_authors);
    }

    #[test]
    fn test_bibtex_delimiter() {
        let rules = NameRules::default();
        let result = rules
            .normalize(
                "Ashish Vaswani and Noam M.\n Shazeer and {Barnes and Noble} and others",
                Delimiter::And,
            )
            .unwrap();
        assert_eq!(names(&result), vec!["Vaswani A", "Shazeer N M", "Barnes and Noble"]);
        assert!(result.authors[2].is_institution);
        assert!(result.more_authors);
    }

    #[test]
    fn test_apa_delimiter() {
        let rules = NameRules::default();
        let result = rules
            .normalize("Smith, J., Doe, A. B., & Zhang, W.", Delimiter::Apa)
            .unwrap();
        assert_eq!(names(&result), vec!["Smith J", "Doe A B", "Zhang W"]);

        let legacy = rules.normalize("Vaswani, Ashish, et al", Delimiter::Apa).unwrap();
        assert_eq!(names(&legacy), vec!["Vaswani A"]);
        assert!(legacy.more_authors);

        let org = rules.normalize("World Health Organization.", Delimiter::Apa).unwrap();
        assert_eq!(names(&org), vec!["World Health Organization"]);
        assert!(org.authors[0].is_institution);
    }

    #[test]
    fn test_institutions() {
        let rules = NameRules::default();
        assert!(rules.is_institution("INNFOS"));
        assert!(rules.is_institution("IEEE"));
        assert!(rules.is_institution("Tsinghua University"));
        assert!(rules.is_institution("大洋网"));
        assert!(rules.is_institution("国家标准化管理委员会"));
        assert!(!rules.is_institution("张三"));
        assert!(!rules.is_institution("Smith J"));
        assert!(!rules.is_institution("A. B."));
        assert!(rules.is_institution("Cambridge University Press"));
        assert!(rules.is_institution("MIT Press"));
    }

    #[rstest]
    #[case("Press W H")]
    #[case("William H. Press")]
    #[case("Press, William H.")]
    #[case("W. H. Press")]
    #[case("Service R")]
    #[case("Press")]
    fn test_keyword_surnames_stay_personal(#[case] token: &str) {
        assert!(!NameRules::default().is_institution(token));
    }

    #[test]
    fn test_keyword_surnames_keep_author_count() {
        let rules = NameRules::default();

        let apa = rules
            .normalize("Press, W. H., & Teukolsky, S. A.", Delimiter::Apa)
            .unwrap();
        assert_eq!(names(&apa), vec!["Press W H", "Teukolsky S A"]);
        assert!(apa.authors.iter().all(|a| !a.is_institution));

        let single = rules.normalize("Service, R.", Delimiter::Apa).unwrap();
        assert_eq!(names(&single), vec!["Service R"]);

        let bibtex = rules
            .normalize("William H. Press and Saul A. Teukolsky", Delimiter::And)
            .unwrap();
        assert_eq!(names(&bibtex), vec!["Press W H", "Teukolsky S A"]);
        assert!(!bibtex.authors[0].is_institution);

        let gbt = rules.normalize("Press W H, Teukolsky S A", Delimiter::List).unwrap();
        assert_eq!(names(&gbt), vec!["Press W H", "Teukolsky S A"]);
        assert!(!gbt.authors[0].is_institution);
    }

    #[test]
    fn test_han_tokens() {
        let rules = NameRules::default();
        let result = rules
            .normalize("张三李四, 王 五, 欧阳 修, 大洋网", Delimiter::List)
            .unwrap();
        assert_eq!(names(&result), vec!["张三", "李四", "王五", "欧阳修", "大洋网"]);
        assert!(result.authors[4].is_institution);
    }

    #[test]
    fn test_ambiguous_han_run() {
        let lenient = NameRules::default();
        let result = lenient.normalize("目的地", Delimiter::List).unwrap();
        assert_eq!(result.authors, vec![Author::institution("目的地")]);

        let strict = NameRules::new(&AuthorsConfig {
            strict_segmentation: true,
            ..AuthorsConfig::default()
        });
        assert!(matches!(
            strict.normalize("目的地", Delimiter::List),
            Err(ParseError::AmbiguousAuthorSegmentation(_))
        ));
    }

    #[test]
    fn test_render_author_list_truncates() {
        let authors: Vec<Author> = ["Vaswani A", "Shazeer N M", "Parmar N", "Uszkoreit J"]
            .iter()
            .map(|n| Author::person(*n))
            .collect();
        assert_eq!(
            render_author_list(&authors, false),
            "Vaswani A, Shazeer N M, Parmar N, et al."
        );
        assert_eq!(
            render_author_list(&authors[..3], false),
            "Vaswani A, Shazeer N M, Parmar N"
        );
    }

    #[test]
    fn test_render_author_list_chinese_marker() {
        let authors = vec![
            Author::person("Wang L"),
            Author::person("Li M"),
            Author::person("Zhou K"),
            Author::person("赵六"),
        ];
        assert_eq!(render_author_list(&authors, false), "Wang L, Li M, Zhou K, 等");
        assert_eq!(
            render_author_list(&[Author::institution("INNFOS")], false),
            "INNFOS"
        );
    }
}
