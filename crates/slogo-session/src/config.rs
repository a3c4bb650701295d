//! Session configuration.

use crate::error::SessionError;
use serde::{Deserialize, Serialize};
use slogo_lexer::DEFAULT_LANGUAGE;
use std::path::Path;

/// Extension given to saved command histories.
pub const DEFAULT_HISTORY_EXTENSION: &str = "logovar";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Language pack active when the session starts.
    pub language: String,
    /// Extension appended to history files that lack it.
    pub history_extension: String,
    /// Stop evaluating a line after this many nodes. `None` never stops.
    pub step_limit: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            history_extension: DEFAULT_HISTORY_EXTENSION.to_string(),
            step_limit: None,
        }
    }
}

impl SessionConfig {
    /// Load a configuration from a JSON file. Missing fields take their
    /// default values.
    pub fn from_json_file(path: &Path) -> Result<Self, SessionError> {
        let text = std::fs::read_to_string(path).map_err(|e| SessionError::io(path, e))?;
        serde_json::from_str(&text).map_err(|source| SessionError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
