use thiserror::Error;

use crate::utils::prelude::SrcSpan;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvironmentError {
    #[error("function `{name}` is defined more than once")]
    DuplicateFunction {
        name: String,
        first: SrcSpan,
        second: SrcSpan
    },
    #[error("`{name}` is a builtin function and cannot be redefined")]
    BuiltinRedefinition {
        name: String,
        location: SrcSpan
    },
    #[error("`{name}` is already declared in this scope")]
    Redeclaration {
        name: String,
        first: SrcSpan,
        second: SrcSpan
    },
    #[error("`{name}` is not declared")]
    UndeclaredName {
        name: String,
        location: SrcSpan
    },
    #[error("function `{name}` is not declared")]
    UndeclaredFunction {
        name: String,
        location: SrcSpan
    },
}

impl EnvironmentError {
    /// Where the error is reported. For duplicates this is the second
    /// definition.
    pub fn location(&self) -> SrcSpan {
        match self {
            EnvironmentError::DuplicateFunction { second, .. }
            | EnvironmentError::Redeclaration { second, .. } => *second,
            EnvironmentError::BuiltinRedefinition { location, .. }
            | EnvironmentError::UndeclaredName { location, .. }
            | EnvironmentError::UndeclaredFunction { location, .. } => *location
        }
    }
}
