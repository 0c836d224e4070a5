//! Hit counts answered from a saved table.
use std::path::Path;

use hashbrown::HashMap;
use smol_str::SmolStr;

use super::{FrequencyOracle, OracleError, TermCount};
use crate::store::{self, StoreError};

/// Frequencies known in advance, e.g. from an earlier filtered list.
///
/// Terms missing from the table count as zero.
#[derive(Debug, Clone, Default)]
pub struct TableOracle {
    counts: HashMap<SmolStr, u64>,
}

impl TableOracle {
    /// Reads a `term,count` file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<TableOracle, StoreError> {
        Ok(store::read_counts_path(path.as_ref())?.into_iter().collect())
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<TermCount> for TableOracle {
    fn from_iter<I: IntoIterator<Item = TermCount>>(iter: I) -> Self {
        TableOracle {
            counts: iter.into_iter().map(|c| (c.term, c.count)).collect(),
        }
    }
}

impl FrequencyOracle for TableOracle {
    fn hits(&mut self, term: &str) -> Result<u64, OracleError> {
        Ok(self.counts.get(term).copied().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn answers_from_table() {
        let mut oracle: TableOracle = vec![TermCount::new("cat", 10), TermCount::new("kat", 2)]
            .into_iter()
            .collect();
        assert_eq!(oracle.hits("kat").unwrap(), 2);
        assert_eq!(oracle.hits("cta").unwrap(), 0);
    }

    #[test]
    fn reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cat,900\nkat,40").unwrap();
        let mut oracle = TableOracle::open(file.path()).unwrap();
        assert_eq!(oracle.len(), 2);
        assert_eq!(oracle.hits("cat").unwrap(), 900);
    }
}
