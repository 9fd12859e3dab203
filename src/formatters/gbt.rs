use crate::models::{Citation, EntryType};
use crate::parsers::authors::render_author_list;
use crate::utils::text::contains_han;

/// Format a citation as a GB/T 7714-2015 reference string
///
/// Optional fields are left out together with their punctuation. The
/// entry body ends with a period, followed by ` DOI: ...` when a DOI is
/// known; web resources end with their URL instead.
pub fn format_gbt(citation: &Citation) -> String {
    let mut out = String::new();

    let authors = render_author_list(citation.authors(), citation.more_authors());
    if !authors.is_empty() {
        out.push_str(&authors);
        if !authors.ends_with('.') {
            out.push('.');
        }
        out.push(' ');
    }

    out.push_str(citation.title());
    out.push('[');
    out.push_str(citation.entry_type().tag());
    out.push(']');

    match citation.entry_type() {
        EntryType::Journal => journal(citation, &mut out),
        EntryType::Conference => conference(citation, &mut out),
        EntryType::Book => book(citation, &mut out),
        EntryType::WebResource => web(citation, &mut out),
    }

    if citation.entry_type() != EntryType::WebResource {
        if let Some(doi) = citation.doi() {
            out.push_str(" DOI: ");
            out.push_str(doi);
        }
    }

    out
}

fn journal(citation: &Citation, out: &mut String) {
    out.push('.');
    if let Some(container) = citation.container() {
        out.push(' ');
        out.push_str(container);
    }
    if let Some(year) = citation.year() {
        out.push_str(&format!(", {}", year));
    }
    if let Some(volume) = citation.volume() {
        out.push_str(", ");
        out.push_str(volume);
    }
    if let Some(issue) = citation.issue() {
        out.push_str(&format!("({})", issue));
    }
    if let Some(pages) = citation.pages() {
        out.push_str(": ");
        out.push_str(pages);
    }
    out.push('.');
}

fn conference(citation: &Citation, out: &mut String) {
    out.push_str(" //");
    if let Some(container) = citation.container() {
        out.push(' ');
        out.push_str(container);
    }
    out.push('.');

    let mut publication = String::new();
    match (citation.place(), citation.publisher()) {
        (Some(place), Some(publisher)) => publication.push_str(&format!("{}: {}", place, publisher)),
        (None, Some(publisher)) => publication.push_str(publisher),
        (Some(place), None) => publication.push_str(place),
        (None, None) => {}
    }
    if let Some(year) = citation.year() {
        if !publication.is_empty() {
            publication.push_str(", ");
        }
        publication.push_str(&year.to_string());
    }
    if let Some(pages) = citation.pages() {
        publication.push_str(": ");
        publication.push_str(pages);
    }

    if !publication.is_empty() {
        out.push(' ');
        out.push_str(&publication);
        out.push('.');
    }
}

fn book(citation: &Citation, out: &mut String) {
    out.push('.');
    if let Some(edition) = citation.edition().and_then(|e| edition_label(e, citation.title())) {
        out.push(' ');
        out.push_str(&edition);
        if !edition.ends_with('.') {
            out.push('.');
        }
    }

    let mut publication = String::new();
    if let Some(place) = citation.place() {
        publication.push_str(place);
        publication.push_str(": ");
    }
    if let Some(publisher) = citation.publisher() {
        publication.push_str(publisher);
    }
    if let Some(year) = citation.year() {
        if !publication.is_empty() && !publication.ends_with(' ') {
            publication.push_str(", ");
        }
        publication.push_str(&year.to_string());
    }

    if !publication.is_empty() {
        out.push(' ');
        out.push_str(publication.trim_end_matches([':', ' ']));
        out.push('.');
    }
}

fn web(citation: &Citation, out: &mut String) {
    let dates: Vec<String> = [
        citation.publish_date().map(|d| format!("({})", d)),
        citation.access_date().map(|d| format!("[{}]", d)),
    ]
    .into_iter()
    .flatten()
    .collect();

    if !dates.is_empty() {
        out.push_str(". ");
        out.push_str(&dates.join(" "));
    }
    if let Some(url) = citation.url() {
        out.push_str(". ");
        out.push_str(url);
    } else {
        out.push('.');
    }
}

/// "2版" for Chinese titles, "2nd ed." otherwise; the first edition is not shown
fn edition_label(edition: &str, title: &str) -> Option<String> {
    let edition = edition.trim();
    match edition.parse::<u32>() {
        Ok(1) => None,
        Ok(n) if contains_han(title) => Some(format!("{}版", n)),
        Ok(n) => Some(format!("{}{} ed.", n, ordinal_suffix(n))),
        Err(_) => Some(edition.to_string()),
    }
}

fn ordinal_suffix(n: u32) -> &'static str {
    match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Author, CitationBuilder};

    fn persons(names: &[&str]) -> Vec<Author> {
        names.iter().map(|n| Author::person(*n)).collect()
    }

    #[test]
    fn test_journal_full() {
        let citation = CitationBuilder::new(EntryType::Journal, "A novel method for something")
            .authors(persons(&["Smith J", "Doe A B", "Zhang W"]))
            .container("Journal of Interesting Results")
            .year(2021)
            .volume("15")
            .issue("2")
            .pages("123-135")
            .doi("https://doi.org/10.1234/abc.def/5678")
            .build();
        assert_eq!(
            format_gbt(&citation),
            "Smith J, Doe A B, Zhang W. A novel method for something[J]. Journal of Interesting Results, 2021, 15(2): 123-135. DOI: 10.1234/abc.def/5678"
        );
    }

    #[test]
    fn test_journal_missing_issue() {
        let citation = CitationBuilder::new(EntryType::Journal, "T")
            .authors(persons(&["Smith J"]))
            .container("J")
            .year(2020)
            .volume("15")
            .pages("123-135")
            .build();
        assert_eq!(format_gbt(&citation), "Smith J. T[J]. J, 2020, 15: 123-135.");
    }

    #[test]
    fn test_journal_issue_without_volume() {
        let citation = CitationBuilder::new(EntryType::Journal, "示例标题")
            .authors(persons(&["张三", "李四", "王五", "赵六"]))
            .container("测试期刊")
            .year(2024)
            .issue("3")
            .build();
        assert_eq!(format_gbt(&citation), "张三, 李四, 王五, 等. 示例标题[J]. 测试期刊, 2024(3).");
    }

    #[test]
    fn test_conference_et_al_no_double_period() {
        let citation = CitationBuilder::new(EntryType::Conference, "Attention is All you Need")
            .authors(persons(&["Vaswani A", "Shazeer N M", "Parmar N", "Uszkoreit J"]))
            .container("Neural Information Processing Systems")
            .year(2017)
            .build();
        assert_eq!(
            format_gbt(&citation),
            "Vaswani A, Shazeer N M, Parmar N, et al. Attention is All you Need[C] // Neural Information Processing Systems. 2017."
        );
    }

    #[test]
    fn test_conference_with_publisher() {
        let citation = CitationBuilder::new(EntryType::Conference, "Fast parsing")
            .authors(persons(&["Chen L"]))
            .container("Proc. Parsing Workshop")
            .place("New York")
            .publisher("ACM")
            .year(2019)
            .pages("10-20")
            .doi("10.1145/1.2")
            .build();
        assert_eq!(
            format_gbt(&citation),
            "Chen L. Fast parsing[C] // Proc. Parsing Workshop. New York: ACM, 2019: 10-20. DOI: 10.1145/1.2"
        );
    }

    #[test]
    fn test_book_editions() {
        let chinese = CitationBuilder::new(EntryType::Book, "Python 编程实践")
            .authors(persons(&["刘伟"]))
            .publisher("机械工业出版社")
            .place("北京")
            .year(2023)
            .edition("2")
            .build();
        assert_eq!(
            format_gbt(&chinese),
            "刘伟. Python 编程实践[M]. 2版. 北京: 机械工业出版社, 2023."
        );

        let english = CitationBuilder::new(EntryType::Book, "The art of computer programming")
            .authors(persons(&["Knuth D E"]))
            .publisher("Addison-Wesley")
            .year(1997)
            .edition("3")
            .build();
        assert_eq!(
            format_gbt(&english),
            "Knuth D E. The art of computer programming[M]. 3rd ed. Addison-Wesley, 1997."
        );

        let first = english.to_builder().edition("1").build();
        assert_eq!(
            format_gbt(&first),
            "Knuth D E. The art of computer programming[M]. Addison-Wesley, 1997."
        );
    }

    #[test]
    fn test_web_two_dates() {
        let citation = CitationBuilder::new(
            EntryType::WebResource,
            "目的地15公里以内，旅客飞抵白云机场可选乘\"短途专车\"",
        )
        .author(Author::institution("大洋网"))
        .publish_date("2024-02-07")
        .access_date("2025-07-23")
        .url("https://news.dayoo.com/guangzhou/202402/07/139995_54628954.htm")
        .build();
        assert_eq!(
            format_gbt(&citation),
            "大洋网. 目的地15公里以内，旅客飞抵白云机场可选乘\"短途专车\"[EB/OL]. (2024-02-07) [2025-07-23]. https://news.dayoo.com/guangzhou/202402/07/139995_54628954.htm"
        );
    }

    #[test]
    fn test_ordinal_suffix() {
        assert_eq!(ordinal_suffix(1), "st");
        assert_eq!(ordinal_suffix(2), "nd");
        assert_eq!(ordinal_suffix(11), "th");
        assert_eq!(ordinal_suffix(23), "rd");
    }
}
