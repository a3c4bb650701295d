//! The result record handed to the presentation layer after each line.

use serde::{Deserialize, Serialize};
use slogo_eval::ForestOutcome;
use slogo_types::{SlogoError, WorldSnapshot};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// The line as submitted.
    pub command: String,
    /// Space-separated root values, or the error message when the line
    /// failed.
    pub return_value: String,
    pub error: bool,
    /// The first error leaf, when evaluation produced one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error_detail: Option<SlogoError>,
    pub snapshot: WorldSnapshot,
}

impl ExecutionResult {
    pub(crate) fn from_outcome(
        command: &str,
        outcome: ForestOutcome,
        snapshot: WorldSnapshot,
    ) -> Self {
        let return_value = match &outcome.error {
            Some(err) => err.message.clone(),
            None => format_values(&outcome.values),
        };
        Self {
            command: command.to_string(),
            return_value,
            error: outcome.error.is_some(),
            error_detail: outcome.error,
            snapshot,
        }
    }

    /// A result carrying a plain status message.
    pub(crate) fn message(
        command: &str,
        message: impl Into<String>,
        error: bool,
        snapshot: WorldSnapshot,
    ) -> Self {
        Self {
            command: command.to_string(),
            return_value: message.into(),
            error,
            error_detail: None,
            snapshot,
        }
    }
}

/// Join root values with single spaces.
pub fn format_values(values: &[f64]) -> String {
    values
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
