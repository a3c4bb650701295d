//! One interpreter session: world, classifier and command history.
//!
//! ```text
//! line → directive? ─yes→ host action
//!          │no
//!          ↓
//!        Classifier → TreeBuilder → Evaluator → ExecutionResult
//! ```

use crate::config::SessionConfig;
use crate::directive::{Directive, DirectiveKind};
use crate::error::SessionError;
use crate::result::ExecutionResult;
use slogo_lexer::Classifier;
use slogo_types::{World, WorldSnapshot};
use std::path::{Path, PathBuf};

pub struct Session {
    config: SessionConfig,
    world: World,
    classifier: Classifier,
    /// Accepted input lines, oldest first. Directives are never recorded.
    history: Vec<String>,
}

impl Session {
    /// Start a session with a fresh world.
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        let classifier = Classifier::new(&config.language)?;
        Ok(Self {
            config,
            world: World::new(),
            classifier,
            history: Vec::new(),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        self.world.snapshot()
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn language(&self) -> &str {
        self.classifier.language()
    }

    /// Switch the active language pack for subsequently classified input.
    /// An unknown pack leaves the current one active.
    pub fn set_language(&mut self, language: &str) -> Result<(), SessionError> {
        self.classifier.set_language(language)?;
        self.config.language = self.classifier.language().to_string();
        Ok(())
    }

    /// Register an extra language pack from `Key = regex` text.
    pub fn register_language(&mut self, name: &str, source: &str) -> Result<(), SessionError> {
        self.classifier.register_language(name, source)?;
        Ok(())
    }

    // ══════════════════════════════════════════════════════════════════════
    // Execution
    // ══════════════════════════════════════════════════════════════════════

    /// Execute one line of input: a host directive, or a program line that
    /// is classified, built and evaluated against the world.
    pub fn execute(&mut self, line: &str) -> ExecutionResult {
        match Directive::parse(line) {
            Some(directive) => self.run_directive(line, directive),
            None => self.run_line(line),
        }
    }

    /// Run a program line through the pipeline and record it in history.
    fn run_line(&mut self, line: &str) -> ExecutionResult {
        tracing::debug!(line, "executing");
        self.history.push(line.to_string());

        let commands = self.classifier.classify(line, self.world.procedures());
        let mut roots = slogo_parser::build(commands);
        let outcome = slogo_eval::evaluate_forest(&mut roots, &mut self.world, self.config.step_limit);

        if let Some(err) = &outcome.error {
            tracing::debug!(code = %err.code, message = %err.message, "line failed");
        }
        ExecutionResult::from_outcome(line, outcome, self.world.snapshot())
    }

    fn run_directive(&mut self, line: &str, directive: Directive<'_>) -> ExecutionResult {
        let Some(argument) = directive.argument else {
            let message = format!("{} needs an argument", directive.kind.keyword());
            return ExecutionResult::message(line, message, true, self.snapshot());
        };

        let status = match directive.kind {
            DirectiveKind::ChangeLanguage => self
                .set_language(argument)
                .map(|()| format!("Language set to {}", self.language())),
            DirectiveKind::SaveHistory => self
                .save_history(Path::new(argument))
                .map(|path| format!("Command history saved to {}", path.display())),
            DirectiveKind::LoadHistory => self
                .load_history(Path::new(argument))
                .map(|results| format!("Loaded {} commands from {argument}", results.len())),
        };

        match status {
            Ok(message) => ExecutionResult::message(line, message, false, self.snapshot()),
            Err(err) => {
                tracing::warn!(directive = directive.kind.keyword(), error = %err, "directive failed");
                ExecutionResult::message(line, err.to_string(), true, self.snapshot())
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // History
    // ══════════════════════════════════════════════════════════════════════

    /// Write the history one entry per line, each as a JSON string so an
    /// entry spanning several lines survives the round trip. The configured
    /// extension is appended when the path does not already carry it.
    /// Returns the path written.
    pub fn save_history(&self, path: &Path) -> Result<PathBuf, SessionError> {
        let path = with_extension(path, &self.config.history_extension);
        let mut text = String::new();
        for entry in &self.history {
            text.push_str(&encode_entry(entry));
            text.push('\n');
        }
        std::fs::write(&path, text).map_err(|e| SessionError::io(&path, e))?;
        tracing::debug!(path = %path.display(), entries = self.history.len(), "saved history");
        Ok(path)
    }

    /// Replay every non-empty entry of a history file, in order. Replayed
    /// entries are recorded in this session's history.
    pub fn load_history(&mut self, path: &Path) -> Result<Vec<ExecutionResult>, SessionError> {
        let text = std::fs::read_to_string(path).map_err(|e| SessionError::io(path, e))?;
        let results: Vec<_> = text
            .lines()
            .map(decode_entry)
            .filter(|entry| !entry.trim().is_empty())
            .map(|entry| self.run_line(&entry))
            .collect();
        tracing::debug!(path = %path.display(), entries = results.len(), "loaded history");
        Ok(results)
    }
}

/// One history entry as a single-line JSON string.
fn encode_entry(entry: &str) -> String {
    serde_json::Value::from(entry).to_string()
}

/// Decode a history line. Lines that are not JSON strings are taken
/// verbatim, so hand-written histories of plain program lines still load.
fn decode_entry(line: &str) -> String {
    let line = line.trim();
    serde_json::from_str::<String>(line).unwrap_or_else(|_| line.to_string())
}

/// Append `.{extension}` unless `path` already ends with it.
fn with_extension(path: &Path, extension: &str) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == extension) {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_extension() {
        assert_eq!(
            with_extension(Path::new("/tmp/square"), "logovar"),
            PathBuf::from("/tmp/square.logovar")
        );
        assert_eq!(
            with_extension(Path::new("/tmp/square.logovar"), "logovar"),
            PathBuf::from("/tmp/square.logovar")
        );
        assert_eq!(
            with_extension(Path::new("/tmp/square.txt"), "logovar"),
            PathBuf::from("/tmp/square.txt.logovar")
        );
    }

    #[test]
    fn test_history_entry_encoding() {
        assert_eq!(encode_entry("fd 10"), r#""fd 10""#);
        assert_eq!(encode_entry("to sq [ ]\n[ fd 10 ]"), r#""to sq [ ]\n[ fd 10 ]""#);
        assert_eq!(decode_entry(&encode_entry("to sq [ ]\n[ fd 10 ]")), "to sq [ ]\n[ fd 10 ]");
        assert_eq!(decode_entry("  fd 10  "), "fd 10");
        assert_eq!(decode_entry("make \"x 5"), "make \"x 5");
    }

    #[test]
    fn test_unknown_starting_language() {
        let config = SessionConfig {
            language: "Klingon".into(),
            ..SessionConfig::default()
        };
        assert!(matches!(
            Session::new(config),
            Err(SessionError::Language(_))
        ));
    }
}
