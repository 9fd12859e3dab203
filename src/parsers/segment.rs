//! Splitting of unbroken Han-script author runs into personal names.
//!
//! A run such as `张三李四` carries no delimiter, so the split is decided by
//! a surname dictionary ranked by frequency:
//!
//! 1. runs longer than [`MAX_RUN_CHARS`] or not starting with a known surname
//!    are ambiguous;
//! 2. a run of two or three characters, or four characters opening with a
//!    compound surname, is one person;
//! 3. otherwise every partition into chunks of surname plus one or two given
//!    characters is scored by the summed surname ranks; the lowest score wins,
//!    a tie falls back to uniform two-character windows when that partition
//!    is among the tied ones, and is ambiguous otherwise;
//! 4. without any valid partition an even-length run is cut into
//!    two-character windows and an odd-length run is ambiguous.

use std::collections::BTreeMap;

use super::authors::NameRules;

/// Longest run that is still considered a list of personal names
pub const MAX_RUN_CHARS: usize = 24;

/// Outcome of segmenting one Han run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segmentation {
    /// The whole run is one personal name
    Single,
    /// The run holds several names, in order
    Split(Vec<String>),
    /// No confident split exists
    Ambiguous(String),
}

impl NameRules {
    /// Segment a run made only of Han characters
    pub fn segment_han_run(&self, run: &str) -> Segmentation {
        let chars: Vec<char> = run.chars().collect();
        let len = chars.len();

        if len > MAX_RUN_CHARS {
            return Segmentation::Ambiguous(format!("{} characters is too long for a name list", len));
        }
        let leading = self.surnames_at(&chars, 0);
        if leading.is_empty() {
            return Segmentation::Ambiguous("does not start with a known surname".to_string());
        }
        if len <= 3 || (len == 4 && leading.iter().any(|&(width, _)| width == 2)) {
            return Segmentation::Single;
        }

        let mut partitions = BTreeMap::new();
        self.collect_partitions(&chars, 0, &mut Vec::new(), 0, &mut partitions);

        if partitions.is_empty() {
            if len % 2 == 0 {
                tracing::debug!(run, "no surname partition, using two-character windows");
                return Segmentation::Split(windows(&chars, &vec![2; len / 2]));
            }
            return Segmentation::Ambiguous("no surname partition fits".to_string());
        }

        let best = partitions.values().copied().min().unwrap_or(usize::MAX);
        let winners: Vec<&Vec<usize>> = partitions
            .iter()
            .filter(|(_, &score)| score == best)
            .map(|(widths, _)| widths)
            .collect();

        match winners.as_slice() {
            [only] => Segmentation::Split(windows(&chars, only)),
            tied => {
                let uniform = vec![2; len / 2];
                if len % 2 == 0 && tied.iter().any(|widths| **widths == uniform) {
                    Segmentation::Split(windows(&chars, &uniform))
                } else {
                    Segmentation::Ambiguous(format!("{} equally likely splits", tied.len()))
                }
            }
        }
    }

    /// Surname candidates starting at `pos` as (width, rank), compound first
    fn surnames_at(&self, chars: &[char], pos: usize) -> Vec<(usize, usize)> {
        let mut found = Vec::with_capacity(2);
        if pos + 1 < chars.len() {
            let pair: String = chars[pos..pos + 2].iter().collect();
            if let Some(rank) = self.compound_rank(&pair) {
                found.push((2, rank));
            }
        }
        if let Some(rank) = chars.get(pos).and_then(|c| self.single_rank(*c)) {
            found.push((1, rank));
        }
        found
    }

    fn collect_partitions(
        &self,
        chars: &[char],
        pos: usize,
        widths: &mut Vec<usize>,
        score: usize,
        out: &mut BTreeMap<Vec<usize>, usize>,
    ) {
        if pos == chars.len() {
            let entry = out.entry(widths.clone()).or_insert(score);
            *entry = (*entry).min(score);
            return;
        }

        for (surname_width, rank) in self.surnames_at(chars, pos) {
            for given in 1..=2 {
                let width = surname_width + given;
                if pos + width > chars.len() {
                    continue;
                }
                widths.push(width);
                self.collect_partitions(chars, pos + width, widths, score + rank, out);
                widths.pop();
            }
        }
    }
}

fn windows(chars: &[char], widths: &[usize]) -> Vec<String> {
    let mut names = Vec::with_capacity(widths.len());
    let mut start = 0;
    for &width in widths {
        names.push(chars[start..start + width].iter().collect());
        start += width;
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthorsConfig;

    fn rules() -> NameRules {
        NameRules::new(&AuthorsConfig::default())
    }

    fn split(names: &[&str]) -> Segmentation {
        Segmentation::Split(names.iter().map(|n| n.to_string()).collect())
    }

    #[test]
    fn test_single_names() {
        let rules = rules();
        assert_eq!(rules.segment_han_run("张三"), Segmentation::Single);
        assert_eq!(rules.segment_han_run("王小明"), Segmentation::Single);
        assert_eq!(rules.segment_han_run("欧阳修"), Segmentation::Single);
        assert_eq!(rules.segment_han_run("欧阳小明"), Segmentation::Single);
    }

    #[test]
    fn test_two_names() {
        let rules = rules();
        assert_eq!(rules.segment_han_run("张三李四"), split(&["张三", "李四"]));
        assert_eq!(rules.segment_han_run("王小明李华"), split(&["王小明", "李华"]));
    }

    #[test]
    fn test_compound_surname_inside_run() {
        let rules = rules();
        assert_eq!(
            rules.segment_han_run("张三欧阳小明"),
            split(&["张三", "欧阳小明"])
        );
    }

    #[test]
    fn test_unknown_leading_character_is_ambiguous() {
        let rules = rules();
        assert!(matches!(
            rules.segment_han_run("目的地"),
            Segmentation::Ambiguous(_)
        ));
    }

    #[test]
    fn test_too_long_is_ambiguous() {
        let rules = rules();
        let run = "张三".repeat(13);
        assert!(matches!(
            rules.segment_han_run(&run),
            Segmentation::Ambiguous(_)
        ));
    }

    #[test]
    fn test_extra_surnames_extend_dictionary() {
        let mut config = AuthorsConfig::default();
        assert!(matches!(
            rules().segment_han_run("琚明"),
            Segmentation::Ambiguous(_)
        ));
        config.extra_surnames.push("琚".to_string());
        let rules = NameRules::new(&config);
        assert_eq!(rules.segment_han_run("琚明"), Segmentation::Single);
    }
}
