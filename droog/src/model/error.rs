//! Confusion model loading errors.
use std::path::PathBuf;

/// Errors that can occur while loading or building a confusion model.
///
/// All of them are fatal: a generation run never proceeds on partial tables.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ModelError {
    /// The corpus directory does not exist
    #[error("Corpus directory not found: {0:?}")]
    MissingCorpus(PathBuf),

    /// A corpus file could not be opened
    #[error("Failed to open corpus file {0:?}")]
    Io(PathBuf, #[source] std::io::Error),

    /// A corpus file has a malformed record
    #[error("Malformed record in {0:?}")]
    Parse(PathBuf, #[source] csv::Error),

    /// A bigram table key is not exactly two characters long
    #[error("Invalid bigram {bigram:?} in {path:?} at line {line}")]
    InvalidBigram {
        /// the bigram table file
        path: PathBuf,
        /// 1-based line number of the record
        line: u64,
        /// the rejected key
        bigram: String,
    },

    /// A misspelling record refers to a character outside the alphabet
    #[error("Unknown symbol {0:?} in confusion record")]
    UnknownSymbol(char),

    /// The character table lacks a positive count for a symbol that is used
    /// as a denominator
    #[error("Missing or zero character count for {0:?}")]
    MissingCharacterCount(char),
}
