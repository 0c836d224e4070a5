//! Ranked misspelling candidates at edit distance 1 and 2.
//!
//! Distance-1 candidates are the scored single-edit neighbourhood of a word,
//! one entry per distinct string. Distance-2 candidates apply the same step to
//! every distance-1 candidate and keep, per string, the path with the highest
//! joint probability.
use hashbrown::hash_map::Entry;
use hashbrown::{HashMap, HashSet};
use itertools::Itertools;
use serde::Serialize;
use smol_str::SmolStr;

use crate::alphabet::{self, InputError};
use crate::edit;
use crate::model::{ConfusionModel, CorpusSource};
use crate::scorer::{ScoredEdit, Scorer, ScorerConfig};

mod select;
mod variant;

pub use self::select::Selection;
pub use self::variant::{Variant, PATH_SEPARATOR};

/// Both ranked candidate lists for one word.
#[derive(Clone, Debug, Serialize)]
pub struct Candidates {
    pub word: SmolStr,
    pub d1: Vec<Variant>,
    pub d2: Vec<Variant>,
}

impl Candidates {
    /// The most probable share of each list, distance 1 first.
    pub fn likely(&self, selection: &Selection) -> Vec<&Variant> {
        selection.take(&self.d1, &self.d2)
    }
}

/// Generates and ranks candidates using a [`Scorer`].
#[derive(Debug, Clone)]
pub struct Ranker<'a> {
    scorer: Scorer<'a>,
}

impl<'a> Ranker<'a> {
    pub fn new(scorer: Scorer<'a>) -> Ranker<'a> {
        Ranker { scorer }
    }

    pub fn with_model(model: &'a ConfusionModel, config: ScorerConfig) -> Ranker<'a> {
        Ranker::new(Scorer::new(model, config))
    }

    pub fn scorer(&self) -> &Scorer<'a> {
        &self.scorer
    }

    /// Distinct single-edit variants of `word`, most probable first.
    pub fn d1_candidates(&self, word: &str) -> Result<Vec<Variant>, InputError> {
        alphabet::validate_word(word)?;
        Ok(self.rank_d1(word))
    }

    /// Distinct two-edit variants of `word` that are not also single-edit
    /// variants, ordered by joint probability.
    pub fn d2_candidates(&self, word: &str) -> Result<Vec<Variant>, InputError> {
        alphabet::validate_word(word)?;
        let d1s = self.rank_d1(word);
        Ok(self.rank_d2(word, &d1s))
    }

    /// Both candidate lists, sharing the distance-1 pass.
    pub fn candidates(&self, word: &str) -> Result<Candidates, InputError> {
        alphabet::validate_word(word)?;
        let d1 = self.rank_d1(word);
        let d2 = self.rank_d2(word, &d1);
        log::debug!("{}: {} d1 and {} d2 candidates", word, d1.len(), d2.len());

        Ok(Candidates {
            word: word.into(),
            d1,
            d2,
        })
    }

    fn rank_d1(&self, word: &str) -> Vec<Variant> {
        let scored = self.scorer.score_edits(edit::edits(word));
        let mut best: HashMap<SmolStr, ScoredEdit> = HashMap::with_capacity(scored.len());

        // Earlier edits win ties, so the enumeration order decides provenance.
        for s in scored
            .into_iter()
            .filter(|s| s.edit.word.as_str() != word && !s.edit.word.is_empty())
        {
            match best.entry(s.edit.word.clone()) {
                Entry::Occupied(mut e) => {
                    if e.get().probability < s.probability {
                        e.insert(s);
                    }
                }
                Entry::Vacant(e) => {
                    e.insert(s);
                }
            }
        }

        best.into_iter()
            .map(|(_, s)| Variant::from_edit(s))
            .sorted_by(Variant::cmp_rank)
            .collect()
    }

    fn rank_d2(&self, word: &str, d1s: &[Variant]) -> Vec<Variant> {
        let near: HashSet<&str> = d1s.iter().map(Variant::value).collect();
        let mut best: HashMap<SmolStr, Variant> = HashMap::new();

        for first in d1s {
            for second in self.rank_d1(&first.value) {
                if second.value() == word || near.contains(second.value()) {
                    continue;
                }

                keep_best_path(&mut best, Variant::compose(first, &second));
            }
        }

        best.into_iter()
            .map(|(_, v)| v)
            .sorted_by(Variant::cmp_rank)
            .collect()
    }
}

/// Stores `path` unless the stored path for the same string has a strictly
/// greater (joint, first, second) key; on a full tie the later path wins.
fn keep_best_path(best: &mut HashMap<SmolStr, Variant>, path: Variant) {
    match best.entry(path.value.clone()) {
        Entry::Occupied(mut e) => {
            if e.get().cmp_path(&path) != std::cmp::Ordering::Greater {
                e.insert(path);
            }
        }
        Entry::Vacant(e) => {
            e.insert(path);
        }
    }
}

/// Loads the confusion model from `source` and returns both ranked candidate
/// lists for `word`.
pub fn generate<S: CorpusSource + ?Sized>(
    source: &S,
    word: &str,
    config: &ScorerConfig,
) -> Result<Candidates, crate::Error> {
    alphabet::validate_word(word)?;
    let model = ConfusionModel::load(source)?;
    Ok(Ranker::with_model(&model, config.clone()).candidates(word)?)
}
