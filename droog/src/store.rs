//! Delimited-list persistence of candidate and filtered lists.
//!
//! Every word gets its own directory under the results root, holding up to
//! four lists named `<word>_<kind>_variants.txt`.
use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::alphabet::{self, InputError};
use crate::candidate::Variant;
use crate::oracle::TermCount;

/// Errors that can occur while reading or writing result lists.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The word cannot name a results directory
    #[error("Invalid word")]
    Word(#[from] InputError),

    /// A list file or directory could not be accessed
    #[error("I/O error on {0:?}")]
    Io(PathBuf, #[source] std::io::Error),

    /// A list file has a malformed row
    #[error("Malformed list {0:?}")]
    Csv(PathBuf, #[source] csv::Error),
}

/// The lists kept for a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    /// ranked distance-1 candidates
    D1,
    /// ranked distance-2 candidates
    D2,
    /// the most probable candidates, terms only
    Likely,
    /// candidates with observed frequencies
    Filtered,
}

impl ListKind {
    pub const fn name(self) -> &'static str {
        match self {
            ListKind::D1 => "d1",
            ListKind::D2 => "d2",
            ListKind::Likely => "likely",
            ListKind::Filtered => "filtered",
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        f.write_str(self.name())
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .from_reader(reader)
}

fn csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer)
}

/// Writes `value,distance,probability,secondary,provenance` rows.
pub fn write_variants<'a, W, I>(writer: W, variants: I) -> Result<(), csv::Error>
where
    W: Write,
    I: IntoIterator<Item = &'a Variant>,
{
    write_rows(writer, variants)
}

pub fn read_variants<R: Read>(reader: R) -> Result<Vec<Variant>, csv::Error> {
    csv_reader(reader).deserialize().collect()
}

/// Writes `term,count` rows.
pub fn write_counts<W: Write>(writer: W, counts: &[TermCount]) -> Result<(), csv::Error> {
    write_rows(writer, counts)
}

pub fn read_counts<R: Read>(reader: R) -> Result<Vec<TermCount>, csv::Error> {
    csv_reader(reader).deserialize().collect()
}

pub(crate) fn read_counts_path(path: &Path) -> Result<Vec<TermCount>, StoreError> {
    let file = File::open(path).map_err(|e| StoreError::Io(path.to_path_buf(), e))?;
    read_counts(file).map_err(|e| StoreError::Csv(path.to_path_buf(), e))
}

fn write_rows<W, I, T>(writer: W, rows: I) -> Result<(), csv::Error>
where
    W: Write,
    I: IntoIterator<Item = T>,
    T: Serialize,
{
    let mut writer = csv_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// A directory of per-word result lists.
#[derive(Debug, Clone)]
pub struct ResultStore {
    root: PathBuf,
}

impl ResultStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> ResultStore {
        ResultStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn word_dir(&self, word: &str) -> PathBuf {
        self.root.join(word)
    }

    pub fn path(&self, word: &str, kind: ListKind) -> PathBuf {
        self.word_dir(word)
            .join(format!("{}_{}_variants.txt", word, kind.name()))
    }

    pub fn has_word(&self, word: &str) -> bool {
        self.word_dir(word).is_dir()
    }

    pub fn exists(&self, word: &str, kind: ListKind) -> bool {
        self.path(word, kind).is_file()
    }

    /// The kinds among `kinds` that have no list yet.
    pub fn missing(&self, word: &str, kinds: &[ListKind]) -> Vec<ListKind> {
        kinds
            .iter()
            .copied()
            .filter(|kind| !self.exists(word, *kind))
            .collect()
    }

    /// Writes a list through a temporary file so a failed write never leaves
    /// a truncated list behind.
    fn save_with<F>(&self, word: &str, kind: ListKind, write: F) -> Result<PathBuf, StoreError>
    where
        F: FnOnce(&mut File) -> Result<(), csv::Error>,
    {
        alphabet::validate_word(word)?;
        let dir = self.word_dir(word);
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::Io(dir.clone(), e))?;

        let path = self.path(word, kind);
        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| StoreError::Io(dir.clone(), e))?;
        write(tmp.as_file_mut()).map_err(|e| StoreError::Csv(path.clone(), e))?;
        tmp.persist(&path)
            .map_err(|e| StoreError::Io(path.clone(), e.error))?;

        log::debug!("wrote {:?}", path);
        Ok(path)
    }

    fn open(&self, word: &str, kind: ListKind) -> Result<(PathBuf, File), StoreError> {
        alphabet::validate_word(word)?;
        let path = self.path(word, kind);
        let file = File::open(&path).map_err(|e| StoreError::Io(path.clone(), e))?;
        Ok((path, file))
    }

    pub fn save_candidates<'a, I>(&self, word: &str, kind: ListKind, variants: I) -> Result<PathBuf, StoreError>
    where
        I: IntoIterator<Item = &'a Variant>,
    {
        self.save_with(word, kind, |file| write_variants(file, variants))
    }

    /// Writes only the candidate strings, one per line.
    pub fn save_terms<'a, I>(&self, word: &str, kind: ListKind, variants: I) -> Result<PathBuf, StoreError>
    where
        I: IntoIterator<Item = &'a Variant>,
    {
        self.save_with(word, kind, |file| {
            write_rows(file, variants.into_iter().map(|v| (v.value(),)))
        })
    }

    pub fn read_candidates(&self, word: &str, kind: ListKind) -> Result<Vec<Variant>, StoreError> {
        let (path, file) = self.open(word, kind)?;
        read_variants(file).map_err(|e| StoreError::Csv(path, e))
    }

    /// Both ranked candidate lists.
    pub fn read_distances(&self, word: &str) -> Result<(Vec<Variant>, Vec<Variant>), StoreError> {
        Ok((
            self.read_candidates(word, ListKind::D1)?,
            self.read_candidates(word, ListKind::D2)?,
        ))
    }

    pub fn save_filtered(&self, word: &str, counts: &[TermCount]) -> Result<PathBuf, StoreError> {
        self.save_with(word, ListKind::Filtered, |file| write_counts(file, counts))
    }

    pub fn read_filtered(&self, word: &str) -> Result<Vec<TermCount>, StoreError> {
        let (path, file) = self.open(word, ListKind::Filtered)?;
        read_counts(file).map_err(|e| StoreError::Csv(path, e))
    }

    /// Reads single-column term lists such as [`ListKind::Likely`].
    pub fn read_terms(&self, word: &str, kind: ListKind) -> Result<Vec<String>, StoreError> {
        let (path, file) = self.open(word, kind)?;
        read_column(file).map_err(|e| StoreError::Csv(path, e))
    }
}

fn read_column<R: Read, T: DeserializeOwned>(reader: R) -> Result<Vec<T>, csv::Error> {
    csv_reader(reader)
        .deserialize::<(T,)>()
        .map(|row| row.map(|(t,)| t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(value: &str, distance: u8, probability: f64, secondary: f64, provenance: &str) -> Variant {
        Variant {
            value: value.into(),
            distance,
            probability,
            secondary,
            provenance: provenance.into(),
        }
    }

    #[test]
    fn layout() {
        let store = ResultStore::new("results");
        assert_eq!(
            store.path("warfarin", ListKind::D2),
            Path::new("results/warfarin/warfarin_d2_variants.txt")
        );
    }

    #[test]
    fn candidate_lists_survive_a_save() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        let d1 = vec![
            variant("ct", 1, 0.005, 0.0, "cad"),
            variant("kat", 1, 0.1 / 3.0, 0.0, "kcs"),
        ];
        let d2 = vec![variant("kct", 2, 0.005, 0.03, "cad-kcs")];

        assert!(!store.has_word("cat"));
        store.save_candidates("cat", ListKind::D1, &d1).unwrap();
        store.save_candidates("cat", ListKind::D2, &d2).unwrap();
        store.save_terms("cat", ListKind::Likely, d1.iter().chain(d2.iter())).unwrap();

        assert!(store.has_word("cat"));
        assert_eq!(store.missing("cat", &[ListKind::D1, ListKind::Filtered]), vec![ListKind::Filtered]);
        let (r1, r2) = store.read_distances("cat").unwrap();
        assert_eq!(r1, d1);
        assert_eq!(r2, d2);
        assert_eq!(
            store.read_terms("cat", ListKind::Likely).unwrap(),
            vec!["ct", "kat", "kct"]
        );

        let raw = std::fs::read_to_string(store.path("cat", ListKind::D2)).unwrap();
        assert_eq!(raw, "kct,2,0.005,0.03,cad-kcs\n");
    }

    #[test]
    fn filtered_lists() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        let counts = vec![TermCount::new("cat", 900), TermCount::new("kat", 40)];
        store.save_filtered("cat", &counts).unwrap();
        assert_eq!(store.read_filtered("cat").unwrap(), counts);
        assert_eq!(
            std::fs::read_to_string(store.path("cat", ListKind::Filtered)).unwrap(),
            "cat,900\nkat,40\n"
        );
    }

    #[test]
    fn errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        assert!(matches!(
            store.read_filtered("cat").unwrap_err(),
            StoreError::Io(..)
        ));
        assert!(matches!(
            store.save_filtered("../cat", &[]).unwrap_err(),
            StoreError::Word(_)
        ));

        std::fs::create_dir_all(store.word_dir("cat")).unwrap();
        std::fs::write(store.path("cat", ListKind::D1), "ct,one,0.1,0.0,cad\n").unwrap();
        assert!(matches!(
            store.read_candidates("cat", ListKind::D1).unwrap_err(),
            StoreError::Csv(..)
        ));
    }
}
