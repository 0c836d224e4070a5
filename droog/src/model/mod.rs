//! Confusion counts and character statistics backing the channel model.
//!
//! A [`ConfusionModel`] is built once per generation run and then only read;
//! scorers borrow it.
use hashbrown::HashMap;

use crate::alphabet::{self, SYMBOL_COUNT};
use crate::edit::EditKind;

pub mod corpus;
pub mod error;

pub use self::corpus::{CorpusSource, DirectoryCorpus, MisspellingRecord};
pub use self::error::ModelError;

type Plane = [[u64; SYMBOL_COUNT]; SYMBOL_COUNT];

/// Per-operation `x -> y` counts over the sentinel and the 26 letters.
///
/// Every cell exists and starts at zero.
#[derive(Clone)]
pub struct ConfusionMatrix {
    planes: Box<[Plane; 4]>,
}

impl Default for ConfusionMatrix {
    fn default() -> Self {
        ConfusionMatrix::new()
    }
}

impl ConfusionMatrix {
    pub fn new() -> ConfusionMatrix {
        ConfusionMatrix {
            planes: Box::new([[[0; SYMBOL_COUNT]; SYMBOL_COUNT]; 4]),
        }
    }

    /// Adds `count` observations of `x -> y` under `kind`.
    pub fn add(&mut self, kind: EditKind, x: char, y: char, count: u64) -> Result<(), ModelError> {
        let xi = alphabet::symbol_index(x).ok_or(ModelError::UnknownSymbol(x))?;
        let yi = alphabet::symbol_index(y).ok_or(ModelError::UnknownSymbol(y))?;
        let cell = &mut self.planes[kind.index()][xi][yi];
        *cell = cell.saturating_add(count);
        Ok(())
    }

    /// The count for `x -> y`; zero for characters outside the alphabet.
    #[inline]
    pub fn get(&self, kind: EditKind, x: char, y: char) -> u64 {
        match (alphabet::symbol_index(x), alphabet::symbol_index(y)) {
            (Some(xi), Some(yi)) => self.planes[kind.index()][xi][yi],
            _ => 0,
        }
    }

    /// Sum of all cells for `kind`.
    pub fn total(&self, kind: EditKind) -> u64 {
        self.planes[kind.index()]
            .iter()
            .flat_map(|row| row.iter())
            .sum()
    }
}

impl std::fmt::Debug for ConfusionMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        let mut m = f.debug_map();
        for kind in EditKind::ALL.iter() {
            m.entry(kind, &self.total(*kind));
        }
        m.finish()
    }
}

/// Occurrence count of single characters.
#[derive(Debug, Clone, Default)]
pub struct CharacterFrequency(HashMap<char, u64>);

impl CharacterFrequency {
    pub fn new() -> CharacterFrequency {
        CharacterFrequency::default()
    }

    pub fn insert(&mut self, c: char, count: u64) {
        self.0.insert(c, count);
    }

    pub fn get(&self, c: char) -> Option<u64> {
        self.0.get(&c).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(char, u64)> for CharacterFrequency {
    fn from_iter<I: IntoIterator<Item = (char, u64)>>(iter: I) -> Self {
        CharacterFrequency(iter.into_iter().collect())
    }
}

/// Occurrence count of two-character sequences, keyed first by the leading
/// character.
#[derive(Debug, Clone, Default)]
pub struct BigramFrequency(HashMap<char, HashMap<char, u64>>);

impl BigramFrequency {
    pub fn new() -> BigramFrequency {
        BigramFrequency::default()
    }

    pub fn insert(&mut self, first: char, second: char, count: u64) {
        self.0.entry(first).or_default().insert(second, count);
    }

    /// The count for `xy`, or `None` if the bigram was never recorded.
    pub fn get(&self, x: char, y: char) -> Option<u64> {
        self.0.get(&x).and_then(|row| row.get(&y)).copied()
    }

    pub fn len(&self) -> usize {
        self.0.values().map(|row| row.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<(char, char, u64)> for BigramFrequency {
    fn from_iter<I: IntoIterator<Item = (char, char, u64)>>(iter: I) -> Self {
        let mut out = BigramFrequency::new();
        for (x, y, count) in iter {
            out.insert(x, y, count);
        }
        out
    }
}

/// The read-only context every probability is computed from.
#[derive(Debug, Clone)]
pub struct ConfusionModel {
    confusion: ConfusionMatrix,
    characters: CharacterFrequency,
    bigrams: BigramFrequency,
}

impl ConfusionModel {
    /// Aggregates misspelling records into a confusion matrix and pairs it
    /// with the frequency tables.
    ///
    /// The character table must hold a positive count for the sentinel and
    /// every letter, since those counts are probability denominators.
    pub fn build<I>(
        records: I,
        characters: CharacterFrequency,
        bigrams: BigramFrequency,
    ) -> Result<ConfusionModel, ModelError>
    where
        I: IntoIterator<Item = MisspellingRecord>,
    {
        let mut confusion = ConfusionMatrix::new();
        let mut record_count = 0usize;
        for record in records {
            confusion.add(record.kind, record.x, record.y, record.count)?;
            record_count += 1;
        }

        if let Some(c) = alphabet::symbols().find(|c| characters.get(*c).unwrap_or(0) == 0) {
            return Err(ModelError::MissingCharacterCount(c));
        }

        log::debug!(
            "confusion model: {} records {:?}, {} characters, {} bigrams",
            record_count,
            confusion,
            characters.len(),
            bigrams.len()
        );

        Ok(ConfusionModel {
            confusion,
            characters,
            bigrams,
        })
    }

    /// Reads all three corpora from `source` and builds the model.
    pub fn load<S: CorpusSource + ?Sized>(source: &S) -> Result<ConfusionModel, ModelError> {
        let records = source.misspellings()?;
        let characters = source.character_counts()?;
        let bigrams = source.bigram_counts()?;
        ConfusionModel::build(records, characters, bigrams)
    }

    pub fn confusion(&self) -> &ConfusionMatrix {
        &self.confusion
    }

    pub fn characters(&self) -> &CharacterFrequency {
        &self.characters
    }

    pub fn bigrams(&self) -> &BigramFrequency {
        &self.bigrams
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn records_accumulate() {
        let model = model_with(
            &["cat"],
            vec![
                record(EditKind::Deletion, 'c', 'a', 3),
                record(EditKind::Deletion, 'c', 'a', 2),
                record(EditKind::Insertion, '@', 'x', 7),
            ],
        );
        assert_eq!(model.confusion().get(EditKind::Deletion, 'c', 'a'), 5);
        assert_eq!(model.confusion().get(EditKind::Insertion, '@', 'x'), 7);
        assert_eq!(model.confusion().get(EditKind::Substitution, 'c', 'a'), 0);
        assert_eq!(model.confusion().get(EditKind::Deletion, 'C', 'a'), 0);
        assert_eq!(model.confusion().total(EditKind::Deletion), 5);
    }

    #[test]
    fn unknown_symbol_is_fatal() {
        let characters = alphabet::symbols().map(|c| (c, 1)).collect();
        let err = ConfusionModel::build(
            vec![record(EditKind::Substitution, 'é', 'e', 1)],
            characters,
            BigramFrequency::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::UnknownSymbol('é')));
    }

    #[test]
    fn missing_denominator_is_fatal() {
        let characters: CharacterFrequency = alphabet::ALPHABET.iter().map(|c| (*c, 10)).collect();
        let err = ConfusionModel::build(vec![], characters, BigramFrequency::new()).unwrap_err();
        assert!(matches!(err, ModelError::MissingCharacterCount('@')));
    }

    #[test]
    fn bigram_lookup() {
        let bigrams: BigramFrequency = vec![('c', 'a', 1000), ('a', 't', 12)].into_iter().collect();
        assert_eq!(bigrams.get('c', 'a'), Some(1000));
        assert_eq!(bigrams.get('a', 't'), Some(12));
        assert_eq!(bigrams.get('t', 'a'), None);
        assert_eq!(bigrams.len(), 2);
    }
}
