use thiserror::Error;

use crate::{
    environment::prelude::{EnvironmentError, ValueType},
    utils::prelude::SrcSpan
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error(transparent)]
    Environment(#[from] EnvironmentError),
    #[error("`{name}` takes {expected} argument(s) but {got} were given")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
        location: SrcSpan
    },
    #[error("division by zero")]
    DivisionByZero {
        location: SrcSpan
    },
    #[error("call depth exceeded {limit} frames")]
    StackOverflow {
        limit: usize,
        location: SrcSpan
    },
    #[error("expected a value of type {expected}, got {got}")]
    TypeMismatch {
        expected: &'static str,
        got: ValueType,
        location: SrcSpan
    },
    #[error("failed to write program output")]
    Output {
        err: std::io::ErrorKind
    },
    #[error("failed to start the evaluation thread")]
    Thread {
        err: std::io::ErrorKind
    },
}

impl EvalError {
    pub fn location(&self) -> Option<SrcSpan> {
        match self {
            EvalError::Environment(error) => Some(error.location()),
            EvalError::ArityMismatch { location, .. }
            | EvalError::DivisionByZero { location }
            | EvalError::StackOverflow { location, .. }
            | EvalError::TypeMismatch { location, .. } => Some(*location),
            EvalError::Output { .. } | EvalError::Thread { .. } => None
        }
    }

    /// Diagnostic title and label text.
    pub fn details(&self) -> (&'static str, String) {
        match self {
            EvalError::Environment(error) => {
                let title = match error {
                    EnvironmentError::DuplicateFunction { .. } => "Duplicate function",
                    EnvironmentError::BuiltinRedefinition { .. } => "Builtin redefinition",
                    EnvironmentError::Redeclaration { .. } => "Multiple declarations",
                    EnvironmentError::UndeclaredName { .. } => "Undeclared name",
                    EnvironmentError::UndeclaredFunction { .. } => "Undeclared function",
                };

                (title, error.to_string())
            },
            EvalError::ArityMismatch { .. } => ("Wrong number of arguments", self.to_string()),
            EvalError::DivisionByZero { .. } => ("Division by zero", "The divisor evaluated to 0".into()),
            EvalError::StackOverflow { .. } => ("Stack overflow", self.to_string()),
            EvalError::TypeMismatch { .. } => ("Type mismatch", self.to_string()),
            EvalError::Output { err } => ("Output error", format!("Writing program output failed: {err}")),
            EvalError::Thread { err } => ("Thread error", format!("Starting the evaluation thread failed: {err}")),
        }
    }
}
