//! Ranked misspelling candidate.
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::scorer::ScoredEdit;

/// Separator between the two steps of a distance-2 provenance string.
pub const PATH_SEPARATOR: char = '-';

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// A candidate misspelling at edit distance 1 or 2 from a word
pub struct Variant {
    /// the candidate word-form
    pub value: SmolStr,
    /// number of edits from the original word
    pub distance: u8,
    /// probability of the (first) edit
    pub probability: f64,
    /// probability of the second edit; zero at distance 1
    pub secondary: f64,
    /// `x`, `y` and operation code of each edit, e.g. `cad` or `cad-tti`
    pub provenance: SmolStr,
}

impl Variant {
    pub(crate) fn from_edit(scored: ScoredEdit) -> Variant {
        Variant {
            provenance: scored.edit.provenance(),
            value: scored.edit.word,
            distance: 1,
            probability: scored.probability,
            secondary: 0.0,
        }
    }

    /// Joins a distance-1 variant of the word with a distance-1 variant of
    /// that variant.
    pub(crate) fn compose(first: &Variant, second: &Variant) -> Variant {
        let mut provenance = String::with_capacity(first.provenance.len() + second.provenance.len() + 1);
        provenance.push_str(&first.provenance);
        provenance.push(PATH_SEPARATOR);
        provenance.push_str(&second.provenance);

        Variant {
            value: second.value.clone(),
            distance: 2,
            probability: first.probability,
            secondary: second.probability,
            provenance: provenance.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Probability of the whole edit path, assuming independent edits.
    pub fn joint(&self) -> f64 {
        if self.distance > 1 {
            self.probability * self.secondary
        } else {
            self.probability
        }
    }

    /// Orders edit paths by joint probability, then first step, then second.
    pub(crate) fn cmp_path(&self, other: &Variant) -> Ordering {
        self.joint()
            .total_cmp(&other.joint())
            .then_with(|| self.probability.total_cmp(&other.probability))
            .then_with(|| self.secondary.total_cmp(&other.secondary))
    }

    /// Ranking order: most probable first, then alphabetical.
    pub(crate) fn cmp_rank(&self, other: &Variant) -> Ordering {
        other
            .joint()
            .total_cmp(&self.joint())
            .then_with(|| self.value.cmp(&other.value))
    }
}
