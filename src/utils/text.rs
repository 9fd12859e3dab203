//! Script detection and string cleanup shared by parsers and formatters.

use unicode_normalization::UnicodeNormalization;

/// Whether a character belongs to the Han script (CJK unified ideographs)
pub fn is_han(c: char) -> bool {
    matches!(c,
        '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{20000}'..='\u{2A6DF}'
        | '\u{2A700}'..='\u{2EBEF}'
        | '\u{30000}'..='\u{3134F}'
        | '\u{3007}')
}

pub fn contains_han(s: &str) -> bool {
    s.chars().any(is_han)
}

/// A non-empty string made only of Han characters
pub fn is_han_run(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_han)
}

/// Collapse every whitespace run into a single space
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fold to lower-case ASCII letters and digits
///
/// Diacritics are removed by canonical decomposition; letters without a
/// decomposition get a fixed transliteration, anything else is dropped.
pub fn ascii_fold(s: &str) -> String {
    let mut folded = String::with_capacity(s.len());
    for c in s.nfd() {
        match c {
            'ł' | 'Ł' => folded.push('l'),
            'ø' | 'Ø' => folded.push('o'),
            'đ' | 'Đ' | 'ð' | 'Ð' => folded.push('d'),
            'æ' | 'Æ' => folded.push_str("ae"),
            'œ' | 'Œ' => folded.push_str("oe"),
            'ß' => folded.push_str("ss"),
            'þ' | 'Þ' => folded.push_str("th"),
            c if c.is_ascii_alphanumeric() => folded.push(c.to_ascii_lowercase()),
            _ => {}
        }
    }
    folded
}

fn combining_mark(accent: char) -> char {
    match accent {
        '\'' => '\u{301}',
        '"' => '\u{308}',
        '`' => '\u{300}',
        '^' => '\u{302}',
        '~' => '\u{303}',
        '=' => '\u{304}',
        _ => '\u{307}',
    }
}

/// Remove TeX grouping braces and accent commands from a BibTeX value
pub fn strip_latex(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' | '}' => {}
            '\\' => match chars.peek().copied() {
                Some(accent @ ('\'' | '"' | '`' | '^' | '~' | '=' | '.')) => {
                    chars.next();
                    while chars.peek() == Some(&'{') {
                        chars.next();
                    }
                    if let Some(base) = chars.next() {
                        out.push(base);
                        out.push(combining_mark(accent));
                    }
                }
                Some('&' | '%' | '$' | '#' | '_') => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                Some(c) if c.is_ascii_alphabetic() => {
                    let mut command = String::new();
                    while let Some(&c) = chars.peek() {
                        if !c.is_ascii_alphabetic() {
                            break;
                        }
                        command.push(c);
                        chars.next();
                    }
                    match command.as_str() {
                        "ss" => out.push('ß'),
                        "o" => out.push('ø'),
                        "l" => out.push('ł'),
                        "ae" => out.push('æ'),
                        "aa" => out.push('å'),
                        // c, v, u, H, r and friends only carry an accent
                        _ => {}
                    }
                    if chars.peek() == Some(&' ') && !command.is_empty() {
                        chars.next();
                    }
                }
                _ => out.push(c),
            },
            c => out.push(c),
        }
    }

    collapse_whitespace(&out.nfc().collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_han_detection() {
        assert!(is_han('张'));
        assert!(!is_han('a'));
        assert!(!is_han('，'));
        assert!(contains_han("Python 编程实践"));
        assert!(is_han_run("大洋网"));
        assert!(!is_han_run("张 三"));
        assert!(!is_han_run(""));
    }

    #[test]
    fn test_ascii_fold() {
        assert_eq!(ascii_fold("Vaswani"), "vaswani");
        assert_eq!(ascii_fold("Müller-Lüdenscheidt"), "mullerludenscheidt");
        assert_eq!(ascii_fold("Łukasz"), "lukasz");
        assert_eq!(ascii_fold("van Beethoven"), "vanbeethoven");
        assert_eq!(ascii_fold("张"), "");
    }

    #[test]
    fn test_strip_latex() {
        assert_eq!(strip_latex("{BERT}: Pre-training"), "BERT: Pre-training");
        assert_eq!(strip_latex("M{\\\"u}ller"), "Müller");
        assert_eq!(strip_latex("G\\'{e}rard"), "Gérard");
        assert_eq!(strip_latex("Attention is {All} you   Need"), "Attention is All you Need");
        assert_eq!(strip_latex("Smith \\& Sons"), "Smith & Sons");
    }
}
