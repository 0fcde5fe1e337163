use std::{io::Write, path::PathBuf};

use termcolor::{Buffer, WriteColor};
use thiserror::Error;

use crate::{
    analyzer::prelude::AnalyzeError,
    environment::prelude::EnvironmentError,
    eval::prelude::{EvalError, ENTRY_POINT},
    parser::prelude::{ParseError, ParseErrorType},
    utils::prelude::SrcSpan,
};
use super::diagnostic::{Diagnostic, Label, Level, Location};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("failed to parse source code")]
    Parse {
        path: PathBuf,
        src: String,
        error: ParseError
    },
    #[error("semantic analysis failed")]
    Analyze {
        path: PathBuf,
        src: String,
        errors: Vec<AnalyzeError>
    },
    #[error("program failed: {error}")]
    Eval {
        path: PathBuf,
        src: String,
        error: EvalError
    },
    #[error("IO operation failed")]
    StdIo {
        err: std::io::ErrorKind
    }
}

impl Error {
    pub fn pretty_string(&self) -> String {
        let mut nocolor = Buffer::no_color();
        let _ = self.pretty(&mut nocolor);

        String::from_utf8_lossy(nocolor.as_slice()).into_owned()
    }

    pub fn pretty(&self, buf: &mut impl WriteColor) -> std::io::Result<()> {
        for diagnostic in self.to_diagnostics() {
            diagnostic.write(buf)?;
            writeln!(buf)?;
        }

        Ok(())
    }

    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            Error::Parse { path, src, error } => {
                let (label, extra) = error.details();
                let text = extra.join("\n");

                let adjusted_location = if matches!(error.error, ParseErrorType::UnexpectedEof) {
                    SrcSpan {
                        start: src.len() as u32,
                        end: src.len() as u32,
                    }
                } else {
                    error.span
                };

                let title = if error.is_lexical() { "Lexical error" } else { "Syntax error" };

                vec![Diagnostic {
                    title: title.into(),
                    text,
                    hint: None,
                    level: Level::Error,
                    location: Some(Location {
                        src,
                        path: path.clone(),
                        label: Label {
                            text: Some(label.to_string()),
                            span: adjusted_location,
                        },
                        extra_labels: vec![],
                    }),
                }]
            },
            Error::Analyze { path, src, errors } => {
                errors
                    .iter()
                    .map(|error| {
                        let (title, text, first) = match error {
                            AnalyzeError::VariableNotDeclared { variable, .. } => (
                                "Variable not declared",
                                format!("Variable `{variable}` is not declared."),
                                None
                            ),
                            AnalyzeError::VariableRedeclaration { location_a, variable, .. } => (
                                "Variable redeclaration",
                                format!("Variable `{variable}` is already declared in this scope."),
                                Some(*location_a)
                            ),
                            AnalyzeError::FunctionNotDeclared { function, .. } => (
                                "Function not declared",
                                format!("Function `{function}` is not declared."),
                                None
                            ),
                            AnalyzeError::FunctionRedeclaration { location_a, function, .. } => (
                                "Duplicate function",
                                format!("Function `{function}` is defined more than once."),
                                Some(*location_a)
                            ),
                            AnalyzeError::BuiltinRedefinition { function, .. } => (
                                "Builtin redefinition",
                                format!("`{function}` is a builtin function and cannot be redefined."),
                                None
                            ),
                            AnalyzeError::ArityMismatch { function, expected, got, .. } => (
                                "Wrong number of arguments",
                                format!("`{function}` takes {expected} argument(s) but {got} were given."),
                                None
                            ),
                        };

                        let extra_labels = first
                            .map(|span| vec![Label { text: Some("First defined here".into()), span }])
                            .unwrap_or_default();

                        Diagnostic {
                            title: title.into(),
                            text: "".into(),
                            hint: None,
                            level: Level::Error,
                            location: Some(Location {
                                src,
                                path: path.clone(),
                                label: Label {
                                    text: Some(text),
                                    span: error.location(),
                                },
                                extra_labels,
                            }),
                        }
                    })
                    .collect()
            },
            Error::Eval { path, src, error } => {
                let (title, text) = error.details();

                let extra_labels = match error {
                    EvalError::Environment(EnvironmentError::DuplicateFunction { first, .. })
                    | EvalError::Environment(EnvironmentError::Redeclaration { first, .. }) => {
                        vec![Label {
                            text: Some("First defined here".into()),
                            span: *first
                        }]
                    },
                    _ => vec![]
                };

                let hint = match error {
                    EvalError::Environment(EnvironmentError::BuiltinRedefinition { .. }) => {
                        Some("Pick another name for this function.".to_string())
                    },
                    EvalError::Environment(EnvironmentError::UndeclaredFunction { name, .. })
                        if name == ENTRY_POINT =>
                    {
                        Some("Every program needs an `int main()` function.".to_string())
                    },
                    _ => None
                };

                let location = error.location().map(|span| Location {
                    src,
                    path: path.clone(),
                    label: Label {
                        text: Some(text.clone()),
                        span,
                    },
                    extra_labels,
                });

                vec![Diagnostic {
                    title: title.into(),
                    text: if location.is_some() { "".into() } else { text },
                    hint,
                    level: Level::Error,
                    location,
                }]
            },
            Error::StdIo { err } => {
                vec![Diagnostic {
                    title: "Standard IO error".into(),
                    text: format!("{err}"),
                    hint: None,
                    level: Level::Error,
                    location: None,
                }]
            }
        }
    }
}
