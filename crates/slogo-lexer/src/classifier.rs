//! Token classification: raw text → flat sequence of unparameterized
//! commands.
//!
//! Each token is resolved in two steps, surface syntax → symbolic name →
//! command-type identifier, and instantiated through the command registry.
//! Tokens that resolve to nothing are looked up as user procedures, and
//! failing that become "command not found" error markers. Classification
//! never aborts on a bad token.

use crate::language::{builtin_translations, LanguageError, LanguageRegistry, DEFAULT_LANGUAGE};
use crate::pattern::{PatternTable, TranslationTable};
use slogo_types::{normalize_name, Command, CommandKind, ProcedureTable, SlogoError};

/// Symbol that discards the rest of its physical line.
pub const COMMENT_SYMBOL: &str = "Comment";

/// The token classifier for one session.
#[derive(Debug, Clone)]
pub struct Classifier {
    registry: LanguageRegistry,
    language: String,
    patterns: PatternTable,
    translations: TranslationTable,
}

impl Classifier {
    /// Create a classifier using the built-in packs with `language` active.
    pub fn new(language: &str) -> Result<Self, LanguageError> {
        Self::with_registry(LanguageRegistry::builtin(), language)
    }

    /// Create a classifier with the default (English) pack active.
    pub fn english() -> Result<Self, LanguageError> {
        Self::new(DEFAULT_LANGUAGE)
    }

    pub fn with_registry(registry: LanguageRegistry, language: &str) -> Result<Self, LanguageError> {
        let patterns = registry.compile(language)?;
        let translations = builtin_translations()?;
        let language = registry
            .canonical_name(language)
            .unwrap_or(language)
            .to_string();
        Ok(Self {
            registry,
            language,
            patterns,
            translations,
        })
    }

    /// Name of the active language pack.
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// Switch the active language pack.
    ///
    /// The new table is compiled in full before it replaces the old one;
    /// on error the previous pack stays active.
    pub fn set_language(&mut self, language: &str) -> Result<(), LanguageError> {
        let patterns = self.registry.compile(language)?;
        self.patterns = patterns;
        self.language = self
            .registry
            .canonical_name(language)
            .unwrap_or(language)
            .to_string();
        tracing::debug!(language = %self.language, "switched language pack");
        Ok(())
    }

    /// Register an extra language pack from `Key = regex` text.
    pub fn register_language(&mut self, name: &str, source: &str) -> Result<(), LanguageError> {
        self.registry.register(name, source)?;
        if self.language.eq_ignore_ascii_case(name) {
            self.set_language(name)?;
        }
        Ok(())
    }

    /// First level: token → symbolic name.
    pub fn symbol(&self, token: &str) -> Option<&str> {
        self.patterns.resolve(token)
    }

    /// Both levels: token → command-type identifier.
    pub fn command_type(&self, token: &str) -> Option<&str> {
        self.symbol(token)
            .and_then(|symbol| self.translations.command_type(symbol))
    }

    /// Resolve and instantiate a built-in command for `token`.
    pub fn instantiate(&self, token: &str) -> Option<CommandKind> {
        self.command_type(token).and_then(CommandKind::from_type_id)
    }

    /// Whether `name` already denotes a built-in command or a user
    /// procedure, so it may not name a new procedure.
    pub fn is_existing_command(&self, name: &str, procedures: &ProcedureTable) -> bool {
        let builtin = matches!(
            self.instantiate(name),
            Some(kind) if !matches!(kind, CommandKind::Constant(_) | CommandKind::Variable(_))
        );
        builtin || procedures.contains(name)
    }

    /// Classify a line of input into a flat command sequence.
    pub fn classify(&self, input: &str, procedures: &ProcedureTable) -> Vec<Command> {
        let mut commands = Vec::new();

        'lines: for line in input.lines() {
            let mut tokens = line.split_whitespace();
            while let Some(token) = tokens.next() {
                if self.symbol(token) == Some(COMMENT_SYMBOL) {
                    continue 'lines;
                }

                let command = match self.instantiate(token) {
                    Some(CommandKind::Constant(_)) => match token.parse::<f64>() {
                        Ok(value) => Command::constant(value),
                        Err(_) => self.user_command_or_error(token, procedures),
                    },
                    Some(CommandKind::Variable(_)) => Command::variable(normalize_name(token)),
                    Some(CommandKind::MakeUserInstruction { .. }) => match tokens.next() {
                        None => Command::error(SlogoError::missing_procedure_name(token)),
                        Some(name) if self.is_existing_command(name, procedures) => {
                            tracing::debug!(name, "rejected procedure name collision");
                            commands.push(Command::error(SlogoError::existing_command(name)));
                            break 'lines;
                        }
                        Some(name) => Command::new(CommandKind::MakeUserInstruction {
                            name: normalize_name(name),
                        }),
                    },
                    Some(kind) => Command::new(kind),
                    None => self.user_command_or_error(token, procedures),
                };

                tracing::trace!(token, command = %command.kind.name(), "classified token");
                commands.push(command);
            }
        }

        commands
    }

    /// Fall back to a user-procedure call, pre-loaded with the stored
    /// parameter list and body.
    fn user_command_or_error(&self, token: &str, procedures: &ProcedureTable) -> Command {
        match procedures.get(token) {
            Some(procedure) => {
                let mut call = Command::new(CommandKind::UserCommand {
                    name: normalize_name(token),
                });
                call.push_param(procedure.params.clone());
                call.push_param(procedure.body.clone());
                call
            }
            None => {
                tracing::debug!(token, "command not found");
                Command::error(SlogoError::command_not_found(token))
            }
        }
    }
}
