//! Run configuration, usually read from a JSON file.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::candidate::Selection;
use crate::oracle::{FilterConfig, SearchConfig};
use crate::scorer::ScorerConfig;

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DroogConfig {
    #[serde(default)]
    pub scorer: ScorerConfig,
    /// share of each ranked list saved as the "likely" list
    #[serde(default = "DroogConfig::default_likely")]
    pub likely: Selection,
    #[serde(default)]
    pub filter: FilterConfig,
    /// search API credentials; without them only table lookups are possible
    #[serde(default)]
    pub search: Option<SearchConfig>,
    /// directory holding the misspelling, character and bigram corpora
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
}

impl DroogConfig {
    const fn default_likely() -> Selection {
        Selection::new(15, 1)
    }

    pub fn default() -> DroogConfig {
        DroogConfig {
            scorer: ScorerConfig::default(),
            likely: DroogConfig::default_likely(),
            filter: FilterConfig::default(),
            search: None,
            data_dir: default_data_dir(),
            results_dir: default_results_dir(),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<DroogConfig, crate::Error> {
        let path = path.as_ref();
        let file =
            std::fs::File::open(path).map_err(|e| crate::Error::Config(path.to_path_buf(), e))?;
        serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| crate::Error::Config(path.to_path_buf(), e.into()))
    }
}

impl Default for DroogConfig {
    fn default() -> Self {
        DroogConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DroogConfig::default();
        assert_eq!(config.scorer.floor, 1);
        assert_eq!(config.scorer.bigram_threshold, 250);
        assert_eq!(config.likely, Selection::new(15, 1));
        assert_eq!(config.filter.selection, Selection::new(100, 1));
        assert_eq!(config.filter.limit, None);
        assert!(config.search.is_none());
    }

    #[test]
    fn partial_json() {
        let config: DroogConfig = serde_json::from_str(
            r#"{
                "scorer": { "bigram_threshold": 100 },
                "filter": { "limit": 90 },
                "search": { "key": "k", "cx": "c" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.scorer.floor, 1);
        assert_eq!(config.scorer.bigram_threshold, 100);
        assert_eq!(config.filter.limit, Some(90));
        assert_eq!(config.filter.selection, Selection::new(100, 1));
        assert_eq!(config.likely, Selection::new(15, 1));
        assert_eq!(
            config.search.unwrap().endpoint,
            crate::oracle::DEFAULT_ENDPOINT
        );
        assert_eq!(config.results_dir, Path::new("results"));
    }

    #[test]
    fn reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, br#"{"data_dir": "corpora"}"#).unwrap();
        let config = DroogConfig::from_path(file.path()).unwrap();
        assert_eq!(config.data_dir, Path::new("corpora"));

        std::io::Write::write_all(&mut file, b"}").unwrap();
        assert!(DroogConfig::from_path(file.path()).is_err());
    }
}
