//! Hit counts from a Custom Search JSON API.
use std::process::Command;

use serde::{Deserialize, Serialize};

use super::{FrequencyOracle, OracleError};

pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

/// Credentials and endpoint of the search API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// API key
    pub key: String,
    /// search engine id
    pub cx: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    queries: Queries,
}

#[derive(Deserialize)]
struct Queries {
    request: Vec<Request>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Request {
    total_results: Option<TotalResults>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TotalResults {
    Number(u64),
    Text(String),
}

/// Extracts `queries.request[0].totalResults` from a search response body.
pub fn parse_total_results(body: &[u8]) -> Result<u64, OracleError> {
    let response: SearchResponse = serde_json::from_slice(body).map_err(OracleError::Response)?;

    match response.queries.request.into_iter().next().and_then(|r| r.total_results) {
        Some(TotalResults::Number(n)) => Ok(n),
        Some(TotalResults::Text(s)) => s.trim().parse().map_err(|_| OracleError::MissingTotal),
        None => Err(OracleError::MissingTotal),
    }
}

/// Queries the search API once per term through the `curl` executable.
///
/// Terms are searched as quoted phrases so the engine does not rewrite them.
#[derive(Debug, Clone)]
pub struct SearchApiOracle {
    config: SearchConfig,
    program: String,
}

impl SearchApiOracle {
    pub fn new(config: SearchConfig) -> SearchApiOracle {
        SearchApiOracle {
            config,
            program: "curl".to_string(),
        }
    }

    /// Uses `program` instead of `curl`; it is called with the same arguments.
    pub fn with_program(mut self, program: impl Into<String>) -> SearchApiOracle {
        self.program = program.into();
        self
    }

    /// Arguments of the lookup for `term`. `curl` percent-encodes every
    /// query parameter and appends them to the endpoint.
    pub fn args(&self, term: &str) -> Vec<String> {
        vec![
            "--silent".to_string(),
            "--show-error".to_string(),
            "--fail".to_string(),
            "--get".to_string(),
            "--data-urlencode".to_string(),
            format!("key={}", self.config.key),
            "--data-urlencode".to_string(),
            format!("cx={}", self.config.cx),
            "--data-urlencode".to_string(),
            format!("q=\"{}\"", term),
            self.config.endpoint.clone(),
        ]
    }
}

impl FrequencyOracle for SearchApiOracle {
    fn hits(&mut self, term: &str) -> Result<u64, OracleError> {
        let output = Command::new(&self.program)
            .args(self.args(term))
            .output()
            .map_err(|e| OracleError::Command(self.program.clone(), e))?;

        if !output.status.success() {
            return Err(OracleError::Failed {
                term: term.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let count = parse_total_results(&output.stdout)?;
        log::debug!("{}: {} hits", term, count);
        Ok(count)
    }
}
