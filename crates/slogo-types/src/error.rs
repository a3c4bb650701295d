use serde::{Deserialize, Serialize};
use std::fmt;

/// Error category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Lexical,
    Arity,
    Structure,
    Name,
    Bracket,
    Runtime,
}

/// Numeric error code (E100–E699).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Lexical errors (E100–E199) ──
    pub const COMMAND_NOT_FOUND: Self = Self(100);

    // ── Arity errors (E200–E299) ──
    pub const NOT_ENOUGH_PARAMETERS: Self = Self(200);

    // ── Structure errors (E300–E399) ──
    pub const MALFORMED_FOR: Self = Self(300);
    pub const MALFORMED_MAKE_VARIABLE: Self = Self(301);
    pub const MALFORMED_USER_COMMAND: Self = Self(302);
    pub const MALFORMED_PROCEDURE_DEF: Self = Self(303);
    pub const MALFORMED_DOTIMES: Self = Self(304);
    pub const MALFORMED_COLOR: Self = Self(305);
    pub const MALFORMED_TURTLE_LIST: Self = Self(306);

    // ── Name errors (E400–E499) ──
    pub const EXISTING_COMMAND: Self = Self(400);
    pub const MISSING_PROCEDURE_NAME: Self = Self(401);

    // ── Bracket errors (E500–E599) ──
    pub const MISSING_CLOSING_BRACKET: Self = Self(500);
    pub const NESTING_TOO_DEEP: Self = Self(501);

    // ── Runtime errors (E600–E699) ──
    pub const DIVISION_BY_ZERO: Self = Self(600);
    pub const STEP_LIMIT_EXCEEDED: Self = Self(601);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Lexical,
            200..=299 => ErrorCategory::Arity,
            300..=399 => ErrorCategory::Structure,
            400..=499 => ErrorCategory::Name,
            500..=599 => ErrorCategory::Bracket,
            _ => ErrorCategory::Runtime,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexical => write!(f, "lexical"),
            Self::Arity => write!(f, "arity"),
            Self::Structure => write!(f, "structure"),
            Self::Name => write!(f, "name"),
            Self::Bracket => write!(f, "bracket"),
            Self::Runtime => write!(f, "runtime"),
        }
    }
}

/// A structured error carried inside the command tree.
///
/// Errors never unwind: the classifier, tree builder and evaluator embed
/// them as [`crate::CommandKind::Error`] leaves so the rest of the line keeps
/// running. The presentation layer reads [`SlogoError::message`] directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlogoError {
    /// Error code (e.g., E100).
    pub code: ErrorCode,
    /// Error category (derived from code).
    pub category: ErrorCategory,
    /// Human-readable error message.
    pub message: String,
    /// The offending input token, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl SlogoError {
    /// Create a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            category: code.category(),
            message: message.into(),
            token: None,
        }
    }

    /// Attach the token that triggered the error.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn command_not_found(token: &str) -> Self {
        Self::new(
            ErrorCode::COMMAND_NOT_FOUND,
            format!("Command not found: {token}"),
        )
        .with_token(token)
    }

    pub fn not_enough_parameters(command: &str) -> Self {
        Self::new(
            ErrorCode::NOT_ENOUGH_PARAMETERS,
            format!("Not enough parameters for command {command}"),
        )
    }

    pub fn existing_command(token: &str) -> Self {
        Self::new(
            ErrorCode::EXISTING_COMMAND,
            format!("Cannot redefine existing command: {token}"),
        )
        .with_token(token)
    }

    pub fn missing_procedure_name(token: &str) -> Self {
        Self::new(
            ErrorCode::MISSING_PROCEDURE_NAME,
            "Missing name for new command",
        )
        .with_token(token)
    }

    pub fn missing_closing_bracket(opening: &str) -> Self {
        Self::new(
            ErrorCode::MISSING_CLOSING_BRACKET,
            format!("Missing closing bracket for '{opening}'"),
        )
    }

    pub fn nesting_too_deep(limit: usize) -> Self {
        Self::new(
            ErrorCode::NESTING_TOO_DEEP,
            format!("Commands nested more than {limit} deep"),
        )
    }

    pub fn malformed_for() -> Self {
        Self::new(
            ErrorCode::MALFORMED_FOR,
            "For loop header must be [ :variable start end increment ]",
        )
    }

    pub fn malformed_dotimes() -> Self {
        Self::new(
            ErrorCode::MALFORMED_DOTIMES,
            "DoTimes header must be [ :variable limit ]",
        )
    }

    pub fn malformed_make_variable() -> Self {
        Self::new(
            ErrorCode::MALFORMED_MAKE_VARIABLE,
            "Make must be followed by a variable name",
        )
    }

    pub fn malformed_user_command() -> Self {
        Self::new(
            ErrorCode::MALFORMED_USER_COMMAND,
            "User command parameters must be variables",
        )
    }

    pub fn malformed_procedure_def() -> Self {
        Self::new(
            ErrorCode::MALFORMED_PROCEDURE_DEF,
            "New command needs a list of variables and a body list",
        )
    }

    pub fn malformed_color(index: f64) -> Self {
        Self::new(
            ErrorCode::MALFORMED_COLOR,
            format!("No palette color at index {index}"),
        )
    }

    pub fn malformed_turtle_list() -> Self {
        Self::new(
            ErrorCode::MALFORMED_TURTLE_LIST,
            "Turtle ids must be given as a list of positive numbers",
        )
    }

    pub fn division_by_zero() -> Self {
        Self::new(ErrorCode::DIVISION_BY_ZERO, "Division by zero")
    }

    pub fn step_limit_exceeded(limit: u64) -> Self {
        Self::new(
            ErrorCode::STEP_LIMIT_EXCEEDED,
            format!("Evaluation stopped after {limit} steps"),
        )
    }
}

impl fmt::Display for SlogoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.code, self.category, self.message)
    }
}

impl std::error::Error for SlogoError {}
