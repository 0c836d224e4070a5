//! Noisy-channel edit probabilities.
//!
//! Each probability is a smoothed ratio of a confusion count to the frequency
//! of the context it was observed in:
//!
//! | operation     | numerator              | denominator     |
//! |---------------|------------------------|-----------------|
//! | insertion     | `max(ins[x][y], floor)` | `chars[x]`      |
//! | substitution  | `max(sub[x][y], floor)` | `chars[y]`      |
//! | deletion      | `max(del[x][y], floor)` | `bigrams[x][y]` |
//! | transposition | `max(trn[x][y], floor)` | `bigrams[x][y]` |
//!
//! Deletions and transpositions score zero when the bigram is unknown or
//! rarer than the configured threshold.
use serde::{Deserialize, Serialize};

use crate::edit::{Edit, EditKind};
use crate::model::ConfusionModel;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// lower bound applied to every confusion count
    pub floor: u64,
    /// bigrams seen fewer times than this do not support deletion or
    /// transposition edits
    pub bigram_threshold: u64,
}

impl ScorerConfig {
    pub const fn default() -> ScorerConfig {
        ScorerConfig {
            floor: 1,
            bigram_threshold: 250,
        }
    }
}

impl Default for ScorerConfig {
    fn default() -> Self {
        ScorerConfig::default()
    }
}

/// An [`Edit`] with its channel probability.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEdit {
    pub edit: Edit,
    pub probability: f64,
}

/// Computes edit probabilities against a borrowed model.
#[derive(Debug, Clone)]
pub struct Scorer<'a> {
    model: &'a ConfusionModel,
    config: ScorerConfig,
}

impl<'a> Scorer<'a> {
    pub fn new(model: &'a ConfusionModel, config: ScorerConfig) -> Scorer<'a> {
        Scorer { model, config }
    }

    pub fn model(&self) -> &'a ConfusionModel {
        self.model
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    #[inline]
    fn floored(&self, kind: EditKind, x: char, y: char) -> f64 {
        self.model.confusion().get(kind, x, y).max(self.config.floor) as f64
    }

    /// Ratio of `count` to `denominator`, zero when there is nothing to
    /// divide by.
    #[inline]
    fn ratio(count: f64, denominator: Option<u64>) -> f64 {
        match denominator {
            Some(d) if d > 0 => count / d as f64,
            _ => 0.0,
        }
    }

    fn gated_bigram(&self, x: char, y: char) -> Option<u64> {
        self.model
            .bigrams()
            .get(x, y)
            .filter(|count| *count >= self.config.bigram_threshold)
    }

    /// Probability of typing `y` after `x`.
    pub fn p_insertion(&self, x: char, y: char) -> f64 {
        Self::ratio(
            self.floored(EditKind::Insertion, x, y),
            self.model.characters().get(x),
        )
    }

    /// Probability of dropping `y` after `x`.
    pub fn p_deletion(&self, x: char, y: char) -> f64 {
        match self.gated_bigram(x, y) {
            Some(count) => Self::ratio(self.floored(EditKind::Deletion, x, y), Some(count)),
            None => 0.0,
        }
    }

    /// Probability of typing `x` where `y` was meant.
    pub fn p_substitution(&self, x: char, y: char) -> f64 {
        Self::ratio(
            self.floored(EditKind::Substitution, x, y),
            self.model.characters().get(y),
        )
    }

    /// Probability of typing `yx` where `xy` was meant.
    pub fn p_transposition(&self, x: char, y: char) -> f64 {
        match self.gated_bigram(x, y) {
            Some(count) => Self::ratio(self.floored(EditKind::Transposition, x, y), Some(count)),
            None => 0.0,
        }
    }

    pub fn probability(&self, kind: EditKind, x: char, y: char) -> f64 {
        match kind {
            EditKind::Insertion => self.p_insertion(x, y),
            EditKind::Deletion => self.p_deletion(x, y),
            EditKind::Substitution => self.p_substitution(x, y),
            EditKind::Transposition => self.p_transposition(x, y),
        }
    }

    pub fn score(&self, edit: Edit) -> ScoredEdit {
        let probability = self.probability(edit.kind, edit.x, edit.y);
        log::trace!("{} {} -> {}", edit.provenance(), edit.word, probability);
        ScoredEdit { edit, probability }
    }

    pub fn score_edits(&self, edits: Vec<Edit>) -> Vec<ScoredEdit> {
        edits.into_iter().map(|edit| self.score(edit)).collect()
    }
}
