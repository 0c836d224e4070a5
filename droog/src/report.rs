//! Page statistics over a filtered list.
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use smol_str::SmolStr;

use crate::oracle::TermCount;

/// Share of a misspelling among all pages and among misspelled pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRow {
    pub misspelling: SmolStr,
    pub pages: u64,
    pub pct_pages: f64,
    /// includes the pages with the correct spelling
    pub cum_pct_pages: f64,
    pub pct_misspells: f64,
    pub cum_pct_misspells: f64,
}

/// Summary of how often a word is misspelled, and which misspellings carry
/// the most pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub word: SmolStr,
    pub correct_pages: u64,
    pub total_pages: u64,
    pub total_misspells: u64,
    pub rows: Vec<AnalysisRow>,
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Builds the capture table for `word` from its filtered list, keeping the
/// list's order.
pub fn analyze(word: &str, filtered: &[TermCount]) -> Analysis {
    let correct_pages: u64 = filtered
        .iter()
        .filter(|c| c.term == word)
        .map(|c| c.count)
        .sum();
    let total_pages: u64 = filtered.iter().map(|c| c.count).sum();
    let total_misspells = total_pages - correct_pages;

    let mut sum_pages = correct_pages;
    let mut sum_misspells = 0;
    let rows = filtered
        .iter()
        .filter(|c| c.term != word)
        .map(|c| {
            sum_pages += c.count;
            sum_misspells += c.count;
            AnalysisRow {
                misspelling: c.term.clone(),
                pages: c.count,
                pct_pages: percent(c.count, total_pages),
                cum_pct_pages: percent(sum_pages, total_pages),
                pct_misspells: percent(c.count, total_misspells),
                cum_pct_misspells: percent(sum_misspells, total_misspells),
            }
        })
        .collect();

    Analysis {
        word: word.into(),
        correct_pages,
        total_pages,
        total_misspells,
        rows,
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        writeln!(f, "{:<28} {}", "word:", self.word)?;
        writeln!(f, "{:<28} {}", "total # of pages:", self.total_pages)?;
        writeln!(
            f,
            "{:<28} {} ({:.1}%)",
            "pages with correct spelling:",
            self.correct_pages,
            percent(self.correct_pages, self.total_pages)
        )?;
        writeln!(
            f,
            "{:<28} {} ({:.1}%)",
            "pages with misspelling(s):",
            self.total_misspells,
            percent(self.total_misspells, self.total_pages)
        )?;
        writeln!(f, "{:<28} {}", "# of unique misspellings:", self.rows.len())?;
        writeln!(f)?;
        writeln!(f, "{:32}all pages{:11}misspelled pages", "", "")?;
        writeln!(
            f,
            "  # misspelling     pages      %      cum %          %      cum %"
        )?;
        writeln!(
            f,
            "--- ---------------  -----  ------  ------      ------  ------"
        )?;
        for (i, row) in self.rows.iter().enumerate() {
            writeln!(
                f,
                "{:>3} {:<15} {:>6}  {:>5.1}%  {:>5.1}%      {:>5.1}%  {:>5.1}%",
                i + 1,
                row.misspelling,
                row.pages,
                row.pct_pages,
                row.cum_pct_pages,
                row.pct_misspells,
                row.cum_pct_misspells
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Expected n, n% or 'all' where n is a non-negative integer (n% at most 100), got {0:?}")]
pub struct ListSpecError(pub String);

/// How many misspellings of a filtered list to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSpec {
    All,
    /// the first `n` misspellings
    Count(usize),
    /// misspellings until their cumulative share of misspelled pages would
    /// exceed this percentage
    Percent(u8),
}

impl FromStr for ListSpec {
    type Err = ListSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ListSpecError(s.to_string());

        if s == "all" {
            return Ok(ListSpec::All);
        }

        let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

        match s.strip_suffix('%') {
            Some(n) if is_digits(n) => match n.parse::<u8>() {
                Ok(p) if p <= 100 => Ok(ListSpec::Percent(p)),
                _ => Err(err()),
            },
            Some(_) => Err(err()),
            None if is_digits(s) => s.parse().map(ListSpec::Count).map_err(|_| err()),
            None => Err(err()),
        }
    }
}

/// The misspellings of `word` selected by `spec`, in list order.
pub fn select_misspellings<'a>(word: &str, filtered: &'a [TermCount], spec: ListSpec) -> Vec<&'a str> {
    let misspellings = filtered.iter().filter(|c| c.term != word);

    match spec {
        ListSpec::All => misspellings.map(|c| c.term.as_str()).collect(),
        ListSpec::Count(n) => misspellings.take(n).map(|c| c.term.as_str()).collect(),
        ListSpec::Percent(p) => {
            let total: u64 = filtered.iter().filter(|c| c.term != word).map(|c| c.count).sum();
            let mut sum = 0u64;
            misspellings
                .take_while(|c| {
                    sum += c.count;
                    percent(sum, total) <= p as f64
                })
                .map(|c| c.term.as_str())
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filtered() -> Vec<TermCount> {
        vec![
            TermCount::new("tylenol", 600),
            TermCount::new("tylanol", 250),
            TermCount::new("tylenal", 100),
            TermCount::new("tylonol", 50),
        ]
    }

    #[test]
    fn capture_table() {
        let analysis = analyze("tylenol", &filtered());
        assert_eq!(analysis.correct_pages, 600);
        assert_eq!(analysis.total_pages, 1000);
        assert_eq!(analysis.total_misspells, 400);
        assert_eq!(analysis.rows.len(), 3);

        let first = &analysis.rows[0];
        assert_eq!(first.misspelling, "tylanol");
        assert_eq!(first.pct_pages, 25.0);
        assert_eq!(first.cum_pct_pages, 85.0);
        assert_eq!(first.pct_misspells, 62.5);
        assert_eq!(first.cum_pct_misspells, 62.5);

        let last = analysis.rows.last().unwrap();
        assert_eq!(last.cum_pct_pages, 100.0);
        assert_eq!(last.cum_pct_misspells, 100.0);

        let text = analysis.to_string();
        assert!(text.contains("pages with misspelling(s):   400 (40.0%)"));
        assert!(text.contains("  1 tylanol"));
    }

    #[test]
    fn word_not_in_list() {
        let analysis = analyze("tylenol", &filtered()[1..]);
        assert_eq!(analysis.correct_pages, 0);
        assert_eq!(analysis.total_misspells, 400);
        assert_eq!(analysis.rows[0].cum_pct_pages, 62.5);
    }

    #[test]
    fn empty_list_has_no_nan() {
        let analysis = analyze("tylenol", &[]);
        assert_eq!(analysis.total_pages, 0);
        assert!(analysis.rows.is_empty());
        assert!(analysis.to_string().contains("(0.0%)"));
    }

    #[test]
    fn parses_list_spec() {
        assert_eq!("all".parse(), Ok(ListSpec::All));
        assert_eq!("12".parse(), Ok(ListSpec::Count(12)));
        assert_eq!("80%".parse(), Ok(ListSpec::Percent(80)));
        assert_eq!("100%".parse(), Ok(ListSpec::Percent(100)));
        assert!("101%".parse::<ListSpec>().is_err());
        assert!("-3".parse::<ListSpec>().is_err());
        assert!("%".parse::<ListSpec>().is_err());
        assert!("some".parse::<ListSpec>().is_err());
    }

    #[test]
    fn selects_misspellings() {
        let list = filtered();
        assert_eq!(
            select_misspellings("tylenol", &list, ListSpec::All),
            vec!["tylanol", "tylenal", "tylonol"]
        );
        assert_eq!(
            select_misspellings("tylenol", &list, ListSpec::Count(1)),
            vec!["tylanol"]
        );
        assert_eq!(
            select_misspellings("tylenol", &list, ListSpec::Percent(90)),
            vec!["tylanol", "tylenal"]
        );
        assert!(select_misspellings("tylenol", &list, ListSpec::Percent(50)).is_empty());
    }
}
