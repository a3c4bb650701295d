//! Built-in and user-registered language packs.

use crate::pattern::{PatternError, PatternTable, TranslationTable};
use thiserror::Error;

/// Base syntax table, appended after every language pack.
pub const SYNTAX: &str = include_str!("../languages/Syntax.properties");

/// Symbolic name → command-type identifier table.
pub const TRANSLATION: &str = include_str!("../languages/Translation.properties");

pub const DEFAULT_LANGUAGE: &str = "English";

const BUILTIN_PACKS: &[(&str, &str)] = &[
    ("English", include_str!("../languages/English.properties")),
    ("French", include_str!("../languages/French.properties")),
    ("Spanish", include_str!("../languages/Spanish.properties")),
    ("German", include_str!("../languages/German.properties")),
];

#[derive(Debug, Error)]
pub enum LanguageError {
    #[error("unknown language pack '{0}'")]
    UnknownPack(String),

    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// Named language-pack sources.
///
/// Lookups ignore case. Registering a pack under an existing name replaces
/// it.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    packs: Vec<(String, String)>,
}

impl LanguageRegistry {
    /// A registry holding only the built-in packs.
    pub fn builtin() -> Self {
        Self {
            packs: BUILTIN_PACKS
                .iter()
                .map(|(name, source)| (name.to_string(), source.to_string()))
                .collect(),
        }
    }

    /// Validate and register a pack from `Key = regex` text.
    pub fn register(&mut self, name: &str, source: &str) -> Result<(), PatternError> {
        PatternTable::parse(name, source)?;
        match self.position(name) {
            Some(i) => self.packs[i] = (name.to_string(), source.to_string()),
            None => self.packs.push((name.to_string(), source.to_string())),
        }
        Ok(())
    }

    /// Canonical (registered) spelling of a pack name.
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.packs[i].0.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.packs.iter().map(|(name, _)| name.as_str())
    }

    /// Compile the full active table for a pack: the pack first, then the
    /// base syntax.
    pub fn compile(&self, name: &str) -> Result<PatternTable, LanguageError> {
        let i = self
            .position(name)
            .ok_or_else(|| LanguageError::UnknownPack(name.to_string()))?;
        let (pack_name, source) = &self.packs[i];
        let pack = PatternTable::parse(pack_name, source)?;
        let syntax = PatternTable::parse("Syntax", SYNTAX)?;
        Ok(pack.chain(syntax))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.packs
            .iter()
            .position(|(pack, _)| pack.eq_ignore_ascii_case(name))
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Load the built-in translation table.
pub fn builtin_translations() -> Result<TranslationTable, PatternError> {
    TranslationTable::parse("Translation", TRANSLATION)
}
