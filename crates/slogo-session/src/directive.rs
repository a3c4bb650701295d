//! Host directives handled by the session before normal parsing.

pub const CHANGE_LANGUAGE: &str = "changeLanguage";
pub const SAVE_HISTORY: &str = "saveCommandHistory";
pub const LOAD_HISTORY: &str = "loadCommandHistory";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    ChangeLanguage,
    SaveHistory,
    LoadHistory,
}

impl DirectiveKind {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::ChangeLanguage => CHANGE_LANGUAGE,
            Self::SaveHistory => SAVE_HISTORY,
            Self::LoadHistory => LOAD_HISTORY,
        }
    }
}

/// A recognized directive line: keyword plus its single argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive<'a> {
    pub kind: DirectiveKind,
    pub argument: Option<&'a str>,
}

impl<'a> Directive<'a> {
    /// Recognize a directive by its first word. Keywords are case-sensitive.
    pub fn parse(line: &'a str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let kind = match words.next()? {
            CHANGE_LANGUAGE => DirectiveKind::ChangeLanguage,
            SAVE_HISTORY => DirectiveKind::SaveHistory,
            LOAD_HISTORY => DirectiveKind::LoadHistory,
            _ => return None,
        };
        Some(Self {
            kind,
            argument: words.next(),
        })
    }
}
