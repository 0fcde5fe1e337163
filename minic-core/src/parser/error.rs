use crate::{lexer::prelude::{LexicalError, Token}, utils::prelude::SrcSpan};

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorType {
    ExpectedIdent,
    ExpectedType,
    ExpectedExpression,
    UnexpectedEof,
    UnexpectedToken {
        token: Token,
        expected: Vec<String>,
    },
    LexError { error: LexicalError },
    NestingTooDeep { limit: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub error: ParseErrorType,
    pub span: SrcSpan
}

impl ParseError {
    pub fn is_lexical(&self) -> bool {
        matches!(self.error, ParseErrorType::LexError { .. })
    }

    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            ParseErrorType::ExpectedIdent => ("Expected identifier", vec![]),
            ParseErrorType::ExpectedType => ("Expected type", vec![
                "`int` is the only type name.".to_string()
            ]),
            ParseErrorType::ExpectedExpression => ("Expected expression", vec![]),
            ParseErrorType::UnexpectedToken { token, expected } => {
                let found = match token {
                    Token::Int(_) => "an Int".to_string(),
                    Token::String(_) => "a String".to_string(),
                    Token::Ident(_) => "an Identifier".to_string(),
                    Token::Eof => "the end of the file".to_string(),
                    _ if token.is_reserved_word() => format!("the keyword `{}`", token.as_literal()),
                    _ => format!("`{}`", token.as_literal())
                };

                let messages = std::iter::once(format!("Found {found}, expected one of: "))
                    .chain(expected.iter().map(|s| format!("- {s}")))
                    .collect();

                ("Not expected this", messages)
            },
            ParseErrorType::UnexpectedEof => ("Unexpected end of file", vec![]),
            ParseErrorType::LexError { error } => error.details(),
            ParseErrorType::NestingTooDeep { limit } => ("Nested too deeply", vec![
                format!("Expressions and blocks may nest at most {limit} levels.")
            ])
        }
    }
}

impl From<LexicalError> for ParseError {
    fn from(error: LexicalError) -> Self {
        Self {
            span: error.location,
            error: ParseErrorType::LexError { error },
        }
    }
}
