//! Observed-frequency lookups for ranked candidates.
//!
//! An oracle maps a term to the number of times it occurs in some external
//! corpus, e.g. the hit count of a web search. [`filter_variants`] queries it
//! for the word and a leading share of its candidates, keeping only the terms
//! that actually occur.
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::candidate::{Selection, Variant};

mod search;
mod table;

pub use self::search::{parse_total_results, SearchApiOracle, SearchConfig, DEFAULT_ENDPOINT};
pub use self::table::TableOracle;

/// Errors that can occur while querying a frequency oracle.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum OracleError {
    /// The lookup command could not be started
    #[error("Failed to run {0:?}")]
    Command(String, #[source] std::io::Error),

    /// The lookup command ran but reported a failure
    #[error("Lookup for {term:?} failed: {message}")]
    Failed {
        /// the term being looked up
        term: String,
        /// diagnostic output of the failed lookup
        message: String,
    },

    /// The search response is not valid JSON
    #[error("Invalid search response")]
    Response(#[source] serde_json::Error),

    /// The search response has no usable result count
    #[error("Search response has no total result count")]
    MissingTotal,

    /// The request budget has been used up
    #[error("Request budget of {0} lookups exhausted")]
    BudgetExhausted(usize),
}

/// Source of observed term frequencies.
pub trait FrequencyOracle {
    fn hits(&mut self, term: &str) -> Result<u64, OracleError>;
}

impl<F> FrequencyOracle for F
where
    F: FnMut(&str) -> u64,
{
    fn hits(&mut self, term: &str) -> Result<u64, OracleError> {
        Ok(self(term))
    }
}

/// Caps the number of lookups passed through to an oracle during one run.
///
/// The count starts at zero for every new wrapper; it does not track quota
/// used by earlier runs.
#[derive(Debug)]
pub struct Budgeted<O> {
    inner: O,
    budget: usize,
    used: usize,
}

impl<O: FrequencyOracle> Budgeted<O> {
    pub fn new(inner: O, budget: usize) -> Budgeted<O> {
        Budgeted {
            inner,
            budget,
            used: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.budget - self.used
    }

    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O: FrequencyOracle> FrequencyOracle for Budgeted<O> {
    fn hits(&mut self, term: &str) -> Result<u64, OracleError> {
        if self.used >= self.budget {
            return Err(OracleError::BudgetExhausted(self.budget));
        }
        self.used += 1;
        self.inner.hits(term)
    }
}

/// A term and its observed frequency.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCount {
    pub term: SmolStr,
    pub count: u64,
}

impl TermCount {
    pub fn new(term: impl Into<SmolStr>, count: u64) -> TermCount {
        TermCount {
            term: term.into(),
            count,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// share of each candidate list submitted to the oracle
    pub selection: Selection,
    /// maximum number of candidates looked up; `None` for all of them
    pub limit: Option<usize>,
    /// log progress every this many lookups; zero disables it
    pub progress_every: usize,
}

impl FilterConfig {
    pub const fn default() -> FilterConfig {
        FilterConfig {
            selection: Selection::new(100, 1),
            limit: None,
            progress_every: 100,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig::default()
    }
}

/// Result of a filtering run.
#[derive(Clone, Debug, PartialEq)]
pub struct Filtered {
    /// observed terms, most frequent first
    pub counts: Vec<TermCount>,
    /// terms answered by the oracle, the word included
    pub looked_up: usize,
    /// terms the run meant to look up, the word included
    pub planned: usize,
}

impl Filtered {
    /// Whether every planned term was looked up.
    pub fn is_complete(&self) -> bool {
        self.looked_up == self.planned
    }
}

/// Looks up `word` and the selected share of `d1` and `d2`, returning the
/// terms with a non-zero count, most frequent first.
///
/// The word itself is looked up first, so it stays ahead of candidates with
/// the same count. Running out of lookup budget ends the run early with the
/// counts gathered so far, reported through [`Filtered::is_complete`]; any
/// other oracle failure is returned.
pub fn filter_variants<O: FrequencyOracle + ?Sized>(
    word: &str,
    d1: &[Variant],
    d2: &[Variant],
    oracle: &mut O,
    config: &FilterConfig,
) -> Result<Filtered, OracleError> {
    let candidates = config.selection.take(d1, d2);
    let total = config
        .limit
        .map_or(candidates.len(), |limit| limit.min(candidates.len()));

    let mut counts = Vec::with_capacity(total + 1);
    let terms = std::iter::once(word).chain(candidates.iter().take(total).map(|v| v.value()));

    for (i, term) in terms.enumerate() {
        match oracle.hits(term) {
            Ok(count) => counts.push(TermCount::new(term, count)),
            Err(OracleError::BudgetExhausted(budget)) => {
                log::warn!(
                    "lookup budget of {} exhausted after {} of {} candidates",
                    budget,
                    i.saturating_sub(1),
                    total
                );
                break;
            }
            Err(e) => return Err(e),
        }

        if config.progress_every > 0 && i > 0 && (i - 1) % config.progress_every == 0 {
            log::info!("{}/{}", i - 1, total);
        }
    }

    let looked_up = counts.len();
    counts.retain(|c| c.count > 0);
    counts.sort_by(|a, b| b.count.cmp(&a.count));

    Ok(Filtered {
        counts,
        looked_up,
        planned: total + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variants(values: &[&str], distance: u8) -> Vec<Variant> {
        values
            .iter()
            .map(|v| Variant {
                value: (*v).into(),
                distance,
                probability: 0.1,
                secondary: 0.0,
                provenance: "".into(),
            })
            .collect()
    }

    #[test]
    fn keeps_only_observed_terms() {
        let d1 = variants(&["ct", "kat", "cta"], 1);
        let mut oracle = |term: &str| -> u64 {
            match term {
                "cat" => 900,
                "kat" => 40,
                _ => 0,
            }
        };
        let filtered = filter_variants("cat", &d1, &[], &mut oracle, &FilterConfig::default()).unwrap();
        assert_eq!(filtered.counts, vec![TermCount::new("cat", 900), TermCount::new("kat", 40)]);
        assert!(filtered.is_complete());
        assert_eq!(filtered.looked_up, 4);
    }

    #[test]
    fn word_without_hits_is_dropped() {
        let d1 = variants(&["ct", "kat"], 1);
        let mut oracle = |term: &str| -> u64 { if term == "kat" { 3 } else { 0 } };
        let filtered = filter_variants("cat", &d1, &[], &mut oracle, &FilterConfig::default()).unwrap();
        assert_eq!(filtered.counts, vec![TermCount::new("kat", 3)]);
    }

    #[test]
    fn sorted_by_count_word_first_on_ties() {
        let d1 = variants(&["ct", "kat"], 1);
        let d2 = variants(&["kt"], 2);
        let mut oracle = |term: &str| -> u64 {
            match term {
                "kt" => 50,
                _ => 10,
            }
        };
        let config = FilterConfig {
            selection: Selection::new(100, 100),
            ..FilterConfig::default()
        };
        let filtered = filter_variants("cat", &d1, &d2, &mut oracle, &config).unwrap();
        let terms: Vec<&str> = filtered.counts.iter().map(|c| c.term.as_str()).collect();
        assert_eq!(terms, vec!["kt", "cat", "ct", "kat"]);
    }

    #[test]
    fn honours_selection_and_limit() {
        let d1 = variants(&["a", "b", "c", "d"], 1);
        let d2 = variants(&["e", "f"], 2);
        let mut seen = Vec::new();
        let mut oracle = |term: &str| -> u64 {
            seen.push(term.to_string());
            1
        };
        let config = FilterConfig {
            selection: Selection::new(50, 50),
            limit: Some(2),
            progress_every: 1,
        };
        let filtered = filter_variants("w", &d1, &d2, &mut oracle, &config).unwrap();
        assert_eq!(filtered.counts.len(), 3);
        assert!(filtered.is_complete());
        assert_eq!(seen, vec!["w", "a", "b"]);
    }

    #[test]
    fn budget_cuts_run_short() {
        let d1 = variants(&["a", "b", "c"], 1);
        let mut oracle = Budgeted::new(|_: &str| -> u64 { 7 }, 2);
        let filtered = filter_variants("w", &d1, &[], &mut oracle, &FilterConfig::default()).unwrap();
        assert_eq!(filtered.counts, vec![TermCount::new("w", 7), TermCount::new("a", 7)]);
        assert!(!filtered.is_complete());
        assert_eq!((filtered.looked_up, filtered.planned), (2, 4));
        assert_eq!(oracle.remaining(), 0);
        assert!(matches!(oracle.hits("x"), Err(OracleError::BudgetExhausted(2))));
    }

    #[test]
    fn default_run_over_budget_is_incomplete() {
        let values: Vec<String> = (0..300).map(|i| format!("v{}", i)).collect();
        let names: Vec<&str> = values.iter().map(String::as_str).collect();
        let d1 = variants(&names, 1);
        let mut oracle = Budgeted::new(|_: &str| -> u64 { 5 }, 100);

        let filtered = filter_variants("w", &d1, &[], &mut oracle, &FilterConfig::default()).unwrap();
        assert_eq!(filtered.planned, 301);
        assert_eq!(filtered.looked_up, 100);
        assert_eq!(filtered.counts.len(), 100);
        assert!(!filtered.is_complete());
    }

    #[test]
    fn other_failures_propagate() {
        struct Broken;
        impl FrequencyOracle for Broken {
            fn hits(&mut self, _: &str) -> Result<u64, OracleError> {
                Err(OracleError::MissingTotal)
            }
        }
        let d1 = variants(&["a"], 1);
        let err = filter_variants("w", &d1, &[], &mut Broken, &FilterConfig::default()).unwrap_err();
        assert!(matches!(err, OracleError::MissingTotal));
    }
}
