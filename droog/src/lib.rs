/*! Generation of likely misspellings with a noisy-channel model.

Given a correctly spelled word, `droog` enumerates every string one or two
edits away (insertion, deletion, substitution, transposition of adjacent
letters), scores each edit with probabilities estimated from a corpus of
observed misspellings, and ranks the results. The ranked lists can then be
checked against an external frequency oracle, such as a web search API, to
keep only the misspellings people actually type.

# Usage examples

```no_run
use droog::model::DirectoryCorpus;
use droog::scorer::ScorerConfig;

let corpus = DirectoryCorpus::open("data")?;
let candidates = droog::candidate::generate(&corpus, "warfarin", &ScorerConfig::default())?;

for variant in candidates.d1.iter().take(10) {
    println!("{}\t{}", variant.value, variant.probability);
}
# Ok::<(), droog::Error>(())
```

The `droog` binary in the `droog-bin` crate of this repository wraps the
whole pipeline: generation, filtering, storage and reporting.
*/

use std::path::PathBuf;

pub mod alphabet;
pub mod candidate;
pub mod config;
pub mod edit;
pub mod model;
pub mod oracle;
pub mod report;
pub mod scorer;
pub mod store;

pub use crate::alphabet::InputError;
pub use crate::candidate::{Candidates, Ranker, Selection, Variant};
pub use crate::config::DroogConfig;
pub use crate::model::{ConfusionModel, ModelError};
pub use crate::oracle::{Filtered, FrequencyOracle, OracleError, TermCount};
pub use crate::report::ListSpecError;
pub use crate::scorer::{Scorer, ScorerConfig};
pub use crate::store::{ListKind, ResultStore, StoreError};

/// Any error produced by this crate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The word is not a lowercase a-z string
    #[error(transparent)]
    Input(#[from] InputError),

    /// The corpora could not be loaded
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A frequency lookup failed
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// A result list could not be read or written
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A list selection could not be parsed
    #[error(transparent)]
    ListSpec(#[from] ListSpecError),

    /// The configuration file could not be read
    #[error("Failed to read configuration from {0:?}")]
    Config(PathBuf, #[source] std::io::Error),
}
