//! Reading the misspelling corpus and the aggregate frequency tables.
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::ModelError;
use super::{BigramFrequency, CharacterFrequency};
use crate::edit::EditKind;

pub const MISSPELLINGS_FILE: &str = "misspellings.txt";
pub const CHAR_COUNTS_FILE: &str = "char_counts.txt";
pub const BIGRAM_COUNTS_FILE: &str = "bigram_counts.txt";

/// One observed misspelling and the edit that explains it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MisspellingRecord {
    pub misspelling: String,
    /// how many times the misspelling was observed
    pub count: u64,
    pub correct: String,
    pub kind: EditKind,
    pub x: char,
    pub y: char,
}

/// Supplier of the three corpora a [`ConfusionModel`](super::ConfusionModel)
/// is built from.
pub trait CorpusSource {
    fn misspellings(&self) -> Result<Vec<MisspellingRecord>, ModelError>;
    fn character_counts(&self) -> Result<CharacterFrequency, ModelError>;
    fn bigram_counts(&self) -> Result<BigramFrequency, ModelError>;
}

/// Comma-delimited corpus files in a single data directory:
///
/// * `misspellings.txt`: `misspelling,count,correct,type,x,y`
/// * `char_counts.txt`: `c,count`
/// * `bigram_counts.txt`: `xy,count`
///
/// Lines starting with `#` are ignored.
#[derive(Debug, Clone)]
pub struct DirectoryCorpus {
    path: PathBuf,
}

impl DirectoryCorpus {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<DirectoryCorpus, ModelError> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(ModelError::MissingCorpus(path.to_path_buf()));
        }

        Ok(DirectoryCorpus {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn reader(&self, name: &str) -> Result<(PathBuf, csv::Reader<File>), ModelError> {
        let path = self.path.join(name);
        let file = File::open(&path).map_err(|e| ModelError::Io(path.clone(), e))?;
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(file);
        Ok((path, reader))
    }
}

impl CorpusSource for DirectoryCorpus {
    fn misspellings(&self) -> Result<Vec<MisspellingRecord>, ModelError> {
        let (path, mut reader) = self.reader(MISSPELLINGS_FILE)?;
        let records = reader
            .deserialize()
            .collect::<Result<Vec<MisspellingRecord>, _>>()
            .map_err(|e| ModelError::Parse(path.clone(), e))?;
        log::debug!("{} misspelling records from {:?}", records.len(), path);
        Ok(records)
    }

    fn character_counts(&self) -> Result<CharacterFrequency, ModelError> {
        let (path, mut reader) = self.reader(CHAR_COUNTS_FILE)?;
        reader
            .deserialize::<(char, u64)>()
            .collect::<Result<CharacterFrequency, _>>()
            .map_err(|e| ModelError::Parse(path, e))
    }

    fn bigram_counts(&self) -> Result<BigramFrequency, ModelError> {
        let (path, mut reader) = self.reader(BIGRAM_COUNTS_FILE)?;
        let mut bigrams = BigramFrequency::new();

        for record in reader.records() {
            let record = record.map_err(|e| ModelError::Parse(path.clone(), e))?;
            let (bigram, count): (String, u64) = record
                .deserialize(None)
                .map_err(|e| ModelError::Parse(path.clone(), e))?;

            let mut chars = bigram.chars();
            match (chars.next(), chars.next(), chars.next()) {
                (Some(x), Some(y), None) => bigrams.insert(x, y, count),
                _ => {
                    return Err(ModelError::InvalidBigram {
                        path,
                        line: record.position().map(|p| p.line()).unwrap_or(0),
                        bigram,
                    })
                }
            }
        }

        Ok(bigrams)
    }
}
