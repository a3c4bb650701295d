//! SLogo lexer: language-pack pattern tables and token classification.

pub mod classifier;
pub mod language;
pub mod pattern;

pub use classifier::{Classifier, COMMENT_SYMBOL};
pub use language::{LanguageError, LanguageRegistry, DEFAULT_LANGUAGE};
pub use pattern::{PatternError, PatternTable, TranslationTable};
