//! SLogo session: runs the full pipeline for each input line.
//!
//! ```text
//! input line → Classifier → TreeBuilder → Evaluator → ExecutionResult
//! ```
//!
//! A [`Session`] owns one world, one classifier and the command history.
//! Sessions share nothing, so independent sessions never observe each
//! other's state.

mod config;
mod directive;
mod error;
mod result;
mod session;

pub use config::{SessionConfig, DEFAULT_HISTORY_EXTENSION};
pub use directive::{Directive, DirectiveKind, CHANGE_LANGUAGE, LOAD_HISTORY, SAVE_HISTORY};
pub use error::SessionError;
pub use result::{format_values, ExecutionResult};
pub use session::Session;
