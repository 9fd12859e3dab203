use super::gbt::format_gbt;
use crate::models::Citation;
use crate::utils::text::ascii_fold;

/// Key derived from the first author's surname and the year
///
/// The surname is folded to lower-case ASCII; `ref` stands in when nothing
/// survives folding, as with Han-script names.
pub fn default_key(citation: &Citation) -> String {
    let surname = citation
        .authors()
        .first()
        .map(|author| ascii_fold(author.surname()))
        .filter(|folded| !folded.is_empty())
        .unwrap_or_else(|| "ref".to_string());

    match citation.year() {
        Some(year) => format!("{}{}", surname, year),
        None => surname,
    }
}

/// Format a citation as a LaTeX `\bibitem` entry
///
/// The key is `key` when given, then the citation's own key, then
/// [`default_key`].
pub fn format_bibitem(citation: &Citation, key: Option<&str>) -> String {
    let key = key
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .or_else(|| citation.raw_key().map(str::to_string))
        .unwrap_or_else(|| default_key(citation));

    format!("\\bibitem{{{}}} {}", key, format_gbt(citation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Author, CitationBuilder, EntryType};

    fn nips() -> Citation {
        CitationBuilder::new(EntryType::Conference, "Attention is All you Need")
            .author(Author::person("Vaswani A"))
            .author(Author::person("Shazeer N M"))
            .container("Neural Information Processing Systems")
            .year(2017)
            .build()
    }

    #[test]
    fn test_default_key() {
        assert_eq!(default_key(&nips()), "vaswani2017");

        let chinese = CitationBuilder::new(EntryType::Book, "示例")
            .author(Author::person("刘伟"))
            .publisher("出版社")
            .year(2023)
            .build();
        assert_eq!(default_key(&chinese), "ref2023");

        let accented = CitationBuilder::new(EntryType::WebResource, "Page")
            .author(Author::person("Müller-Lüdenscheidt K"))
            .url("https://example.com")
            .build();
        assert_eq!(default_key(&accented), "mullerludenscheidt");
    }

    #[test]
    fn test_key_precedence() {
        let citation = nips();
        let expected_body = format_gbt(&citation);

        assert_eq!(
            format_bibitem(&citation, None),
            format!("\\bibitem{{vaswani2017}} {}", expected_body)
        );
        let keyed = citation.with_key("attention");
        assert!(format_bibitem(&keyed, None).starts_with("\\bibitem{attention} "));
        assert!(format_bibitem(&keyed, Some("explicit")).starts_with("\\bibitem{explicit} "));
    }
}
