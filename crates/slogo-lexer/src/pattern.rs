//! Ordered pattern tables.
//!
//! Language-pack data is line-oriented `Key = regex` text:
//! - `#` at the start of a line begins a comment
//! - blank lines are ignored
//! - entries keep file order, which is also match order
//!
//! Values are used verbatim as regular expressions (no escape processing).
//! Every pattern must match a whole token and matches case-insensitively.

use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while loading pattern or translation data.
#[derive(Debug, Error)]
pub enum PatternError {
    /// A non-comment line without a `=` separator or with an empty key.
    #[error("{table}:{line}: malformed entry '{text}'")]
    MalformedEntry {
        table: String,
        line: usize,
        text: String,
    },

    /// A value that is not a valid regular expression.
    #[error("{table}: invalid pattern for '{symbol}'")]
    InvalidPattern {
        table: String,
        symbol: String,
        #[source]
        error: regex::Error,
    },
}

/// Parse `Key = value` entries, preserving their order.
pub fn parse_entries(table: &str, text: &str) -> Result<Vec<(String, String)>, PatternError> {
    let mut entries = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let malformed = || PatternError::MalformedEntry {
            table: table.to_string(),
            line: i + 1,
            text: line.to_string(),
        };
        let (key, value) = line.split_once('=').ok_or_else(malformed)?;
        let key = key.trim();
        if key.is_empty() {
            return Err(malformed());
        }
        entries.push((key.to_string(), value.trim().to_string()));
    }
    Ok(entries)
}

/// Compile a pattern that must match the whole token, ignoring case.
fn compile_full_match(table: &str, symbol: &str, pattern: &str) -> Result<Regex, PatternError> {
    RegexBuilder::new(&format!(r"\A(?:{pattern})\z"))
        .case_insensitive(true)
        .build()
        .map_err(|error| PatternError::InvalidPattern {
            table: table.to_string(),
            symbol: symbol.to_string(),
            error,
        })
}

// ══════════════════════════════════════════════════════════════════════════════
// PatternTable
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
struct PatternEntry {
    symbol: String,
    regex: Regex,
}

/// An ordered list of (symbolic name, matcher) pairs. First match wins.
#[derive(Debug, Clone, Default)]
pub struct PatternTable {
    entries: Vec<PatternEntry>,
}

impl PatternTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a table from `Key = regex` text.
    pub fn parse(table: &str, text: &str) -> Result<Self, PatternError> {
        let mut entries = Vec::new();
        for (symbol, pattern) in parse_entries(table, text)? {
            let regex = compile_full_match(table, &symbol, &pattern)?;
            entries.push(PatternEntry { symbol, regex });
        }
        Ok(Self { entries })
    }

    /// Append every entry of `other` after this table's entries.
    pub fn chain(mut self, other: PatternTable) -> Self {
        self.entries.extend(other.entries);
        self
    }

    /// Resolve a token to the symbolic name of the first matching entry.
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.regex.is_match(token))
            .map(|entry| entry.symbol.as_str())
    }

    /// Symbolic names in match order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.symbol.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// TranslationTable
// ══════════════════════════════════════════════════════════════════════════════

/// Second resolution level: symbolic name → command-type identifier.
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    types: BTreeMap<String, String>,
}

impl TranslationTable {
    pub fn parse(table: &str, text: &str) -> Result<Self, PatternError> {
        let types = parse_entries(table, text)?.into_iter().collect();
        Ok(Self { types })
    }

    pub fn command_type(&self, symbol: &str) -> Option<&str> {
        self.types.get(symbol).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
