use crate::{lexer::prelude::{lex, LexResult, LexicalError, Lexer, Spanned, Token}, utils::prelude::SrcSpan};
use super::error::{ParseError, ParseErrorType};
use super::ast::{Expression, Module, Program};

pub trait Parse<T: Iterator<Item = LexResult>>
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError>;
}

pub trait InfixParse<T: Iterator<Item = LexResult>>
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError>;
}

/// How many expressions and blocks may be open at once.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Recursive descent parser with two tokens of lookahead.
pub struct Parser<T: Iterator<Item = LexResult>> {
    pub current_token: Option<Spanned>,
    pub next_token: Option<Spanned>,
    pub lex_errors: Vec<LexicalError>,

    previous_end: u32,
    depth: usize,
    tokens: T,
}

impl<T: Iterator<Item = LexResult>> Parser<T> {
    pub fn new(input: T) -> Self {
        let mut parser = Self {
            current_token: None,
            next_token: None,
            lex_errors: vec![],

            previous_end: 0,
            depth: 0,
            tokens: input,
        };

        parser.step();
        parser.step();

        parser
    }

    pub fn step(&mut self) {
        let _ = self.next_token();
    }

    pub fn next_token(&mut self) -> Option<Spanned> {
        let t = self.current_token.take();

        let next = match self.tokens.next() {
            Some(Ok(tok)) => Some(tok),
            Some(Err(err)) => {
                self.lex_errors.push(err);

                None
            },
            None => None
        };

        if let Some((_, _, end)) = &t {
            self.previous_end = *end;
        }

        self.current_token = self.next_token.take();
        self.next_token = next;

        t
    }

    pub fn current_precedence(&self) -> Precedence {
        match &self.current_token {
            Some((_, token, _)) => Precedence::from(token),
            None => Precedence::Lowest
        }
    }

    pub fn is_current(&self, token: &Token) -> bool {
        matches!(&self.current_token, Some((_, current, _)) if current == token)
    }

    pub fn is_next(&self, token: &Token) -> bool {
        matches!(&self.next_token, Some((_, next, _)) if next == token)
    }

    /// Start of the current token, or the end of the last consumed one
    /// when the stream has run dry.
    pub fn current_start(&self) -> u32 {
        match &self.current_token {
            Some((start, _, _)) => *start,
            None => self.previous_end
        }
    }

    /// Parses a whole module. A lexical error always wins over the syntax
    /// error it caused further down the stream.
    pub fn parse(&mut self) -> Result<Module, ParseError> {
        let program = Program::parse(self, None);

        if let Some(error) = self.lex_errors.first() {
            return Err(ParseError::from(*error));
        }

        Ok(Module {
            name: "".into(),
            program: program?
        })
    }

    /// Runs `parse` one nesting level deeper. Every recursive production
    /// goes through here, so hostile input fails with a syntax error
    /// instead of exhausting the stack.
    pub fn nested<R>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<R, ParseError>
    ) -> Result<R, ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            let start = self.current_start();
            let end = match &self.current_token {
                Some((_, _, end)) => *end,
                None => start
            };

            return parse_error(
                ParseErrorType::NestingTooDeep { limit: MAX_NESTING_DEPTH },
                SrcSpan::from(start, end)
            );
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;

        result
    }

    pub fn expect_one(&mut self, token: Token) -> Result<(u32, u32), ParseError> {
        match &self.current_token {
            Some((start, tok, end)) if *tok == token => {
                let span = (*start, *end);
                self.step();

                Ok(span)
            },
            _ => Err(self.unexpected(vec![format!("`{}`", token.as_literal())]))
        }
    }

    pub fn expect_ident(&mut self) -> Result<(u32, String, u32), ParseError> {
        match self.current_token.take() {
            Some((start, Token::Ident(value), end)) => {
                self.step();
                Ok((start, value, end))
            },
            Some((start, Token::Eof, end)) => {
                self.current_token = Some((start, Token::Eof, end));

                parse_error(ParseErrorType::UnexpectedEof, SrcSpan { start, end })
            },
            Some(t) => {
                let (start, _, end) = t;
                self.current_token = Some(t);

                parse_error(
                    ParseErrorType::ExpectedIdent,
                    SrcSpan { start, end }
                )
            },
            None => parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan::from(self.previous_end, self.previous_end)
            )
        }
    }

    pub fn expect_type(&mut self) -> Result<(u32, u32), ParseError> {
        match &self.current_token {
            Some((start, Token::IntType, end)) => {
                let span = (*start, *end);
                self.step();

                Ok(span)
            },
            Some((start, token, end)) if *token != Token::Eof => parse_error(
                ParseErrorType::ExpectedType,
                SrcSpan::from(*start, *end)
            ),
            _ => Err(self.unexpected(vec!["`int`".into()]))
        }
    }

    pub fn expected_expression(&self) -> ParseError {
        match &self.current_token {
            Some((start, token, end)) if *token != Token::Eof => ParseError {
                error: ParseErrorType::ExpectedExpression,
                span: SrcSpan::from(*start, *end)
            },
            _ => self.unexpected(vec!["an expression".into()])
        }
    }

    pub fn unexpected(&self, expected: Vec<String>) -> ParseError {
        match &self.current_token {
            Some((start, Token::Eof, end)) => ParseError {
                error: ParseErrorType::UnexpectedEof,
                span: SrcSpan::from(*start, *end)
            },
            Some((start, token, end)) => ParseError {
                error: ParseErrorType::UnexpectedToken {
                    token: token.clone(),
                    expected
                },
                span: SrcSpan::from(*start, *end)
            },
            None => ParseError {
                error: ParseErrorType::UnexpectedEof,
                span: SrcSpan::from(self.previous_end, self.previous_end)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix
}

impl From<&Token> for Precedence {
    fn from(value: &Token) -> Self {
        match value {
            Token::Equal | Token::NotEqual => Self::Equals,
            Token::LessThan | Token::GreaterThan |
            Token::LessThanOrEqual | Token::GreaterThanOrEqual => Self::LessGreater,
            Token::Plus | Token::Minus => Self::Sum,
            Token::Div | Token::Mult => Self::Product,
            _ => Self::Lowest,
        }
    }
}

pub fn parse_module(src: &str) -> Result<Module, ParseError> {
    let mut parser = Parser::new(lex(src));

    parser.parse()
}

pub fn parse_module_from_stream(stream: impl Iterator<Item = char>) -> Result<Module, ParseError> {
    let lexer = Lexer::new(stream
        .scan(0, |pos, c| {
            *pos += c.len_utf8() as u32;
            Some((*pos - c.len_utf8() as u32, c))
        })
    );
    let mut parser = Parser::new(lexer);

    parser.parse()
}

pub fn parse_error<T>(error: ParseErrorType, span: SrcSpan) -> Result<T, ParseError> {
    Err(ParseError { error, span })
}
