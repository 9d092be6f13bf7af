//! Pipeline configuration.
//!
//! Stored as a JSON object; every field is optional:
//! ```json
//! {
//!   "source": "data/gss2018.csv",
//!   "sentinels": ["IAP", "DK", ".a"],
//!   "default_na": true
//! }
//! ```

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::{PipelineError, Result};

/// Public GSS 2018 extract the dashboard was built around.
pub const DEFAULT_SOURCE: &str =
    "https://github.com/jkropko/DS-6001/raw/master/localdata/gss2018.csv";

/// Survey-specific tokens that mean "no answer".
pub const DEFAULT_SENTINELS: &[&str] = &[
    "IAP",
    "IAP,DK,NA,uncodeable",
    "NOT SURE",
    "DK",
    "IAP, DK, NA, uncodeable",
    ".a",
    "CAN'T CHOOSE",
];

/// Generic CSV null spellings, honoured when `default_na` is on.
const GENERIC_NA: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "#N/A", "<NA>", "None",
];

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub source: Option<String>,
    pub sentinels: Vec<String>,
    pub default_na: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source: None,
            sentinels: DEFAULT_SENTINELS.iter().map(|s| s.to_string()).collect(),
            default_na: true,
        }
    }
}

impl PipelineConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| PipelineError::Config(e.to_string()))
    }

    /// Resolves the source location: explicit value, then config, then
    /// `GSS_SOURCE`, then [`DEFAULT_SOURCE`].
    pub fn resolve_source(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_string)
            .or_else(|| self.source.clone())
            .or_else(|| std::env::var("GSS_SOURCE").ok())
            .unwrap_or_else(|| DEFAULT_SOURCE.to_string())
    }

    pub fn missing_values(&self) -> MissingValues {
        MissingValues::new(&self.sentinels, self.default_na)
    }
}

/// The set of tokens that read as a missing value.
#[derive(Debug, Clone)]
pub struct MissingValues {
    tokens: HashSet<String>,
}

impl MissingValues {
    pub fn new<S: AsRef<str>>(sentinels: &[S], default_na: bool) -> Self {
        let mut tokens: HashSet<String> = sentinels
            .iter()
            .map(|s| s.as_ref().trim().to_string())
            .collect();
        if default_na {
            tokens.extend(GENERIC_NA.iter().map(|s| s.to_string()));
        }
        Self { tokens }
    }

    /// `true` if `value` (trimmed) is a missing-value token.
    pub fn is_missing(&self, value: &str) -> bool {
        self.tokens.contains(value.trim())
    }
}

impl Default for MissingValues {
    fn default() -> Self {
        PipelineConfig::default().missing_values()
    }
}
