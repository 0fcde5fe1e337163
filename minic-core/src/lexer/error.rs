use crate::utils::prelude::SrcSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalErrorType {
    UnrecognizedToken { tok: char },
    UnterminatedString,
    IntegerOutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexicalError {
    pub error: LexicalErrorType,
    pub location: SrcSpan
}

impl LexicalError {
    pub fn details(&self) -> (&'static str, Vec<String>) {
        match self.error {
            LexicalErrorType::UnrecognizedToken { tok } => {
                ("I don't know what to do with this character", vec![
                    format!("Unexpected character {tok:?}")
                ])
            },
            LexicalErrorType::UnterminatedString => {
                ("This string literal is never closed", vec![
                    "String literals must end with `\"` on the same line.".to_string()
                ])
            },
            LexicalErrorType::IntegerOutOfRange => {
                ("This integer literal does not fit in an `int`", vec![
                    "The largest literal accepted is 2147483648, so that `-2147483648` can be written.".to_string()
                ])
            },
        }
    }
}
