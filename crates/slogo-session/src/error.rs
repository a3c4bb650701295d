use slogo_lexer::LanguageError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that stop a session operation outright.
///
/// Problems inside user input never show up here; they stay in the command
/// tree as error leaves and surface through the result record.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Language(#[from] LanguageError),

    #[error("cannot access '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in '{}'", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SessionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
