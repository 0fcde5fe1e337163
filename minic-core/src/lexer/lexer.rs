use super::error::{LexicalError, LexicalErrorType};
use super::token::Token;
use std::fmt::Display;
use crate::utils::prelude::SrcSpan;

pub type Spanned = (u32, Token, u32);
pub type LexResult = std::result::Result<Spanned, LexicalError>;

/// Magnitude of `i32::MIN`. Literals up to this value are accepted so the
/// most negative `int` can be spelled as a negated literal.
pub const MAX_INT_LITERAL: i64 = 1 << 31;

pub fn str_to_keyword(word: &str) -> Option<Token> {
	Some(match word {
		"int" => Token::IntType,
		"return" => Token::Return,
		"if" => Token::If,
		"else" => Token::Else,
		"while" => Token::While,

		_ => return None
	})
}

/// Turns a stream of `(byte offset, char)` pairs into tokens.
///
/// The lexer is an [`Iterator`] that ends right after yielding
/// [`Token::Eof`] or the first [`LexicalError`].
#[derive(Debug)]
pub struct Lexer<T: Iterator<Item = (u32, char)>> {
	position: u32,
	next_position: u32,
	end_position: u32,
	ch: Option<char>,
	next_ch: Option<char>,
	input: T,
	finished: bool,
}

impl<T: Iterator<Item = (u32, char)>> Display for Lexer<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f,
			"Lexer {{\n\tposition: {},\n\tnext_position: {},\n\tch: {:?}, next_ch: {:?}\n}}",
			self.position, self.next_position, self.ch, self.next_ch
		)
	}
}

impl<T: Iterator<Item = (u32, char)>> Lexer<T> {
	pub fn new(input: T) -> Self {
        let mut lexer = Self {
            position: 0,
            next_position: 0,
			end_position: 0,
            ch: None,
			next_ch: None,
            input,
			finished: false,
        };

        lexer.next_char();
        lexer.next_char();

        lexer
    }

    pub fn next_token(&mut self) -> LexResult {
		self.skip_trivia();

		let span = match self.ch {
			Some(ch) => match ch {
				'(' => self.eat_one_char(Token::LParen),
				')' => self.eat_one_char(Token::RParen),
				'{' => self.eat_one_char(Token::LBrace),
				'}' => self.eat_one_char(Token::RBrace),
				',' => self.eat_one_char(Token::Comma),
				';' => self.eat_one_char(Token::Semicolon),
				'+' => self.eat_one_char(Token::Plus),
				'-' => self.eat_one_char(Token::Minus),
				'*' => self.eat_one_char(Token::Mult),
				'/' => self.eat_one_char(Token::Div),
				'<' => self.eat_with_equals(Token::LessThan, Token::LessThanOrEqual),
				'>' => self.eat_with_equals(Token::GreaterThan, Token::GreaterThanOrEqual),
				'=' => self.eat_with_equals(Token::Assign, Token::Equal),
				'!' if self.next_ch == Some('=') => self.eat_with_equals(Token::NotEqual, Token::NotEqual),
				'"' => return self.lex_string(),
				'a'..='z' | 'A'..='Z' | '_' => self.lex_ident(),
				'0'..='9' => return self.lex_number(),
				c => {
					let start = self.position;
					let _ = self.next_char();

					return Err(LexicalError {
						error: LexicalErrorType::UnrecognizedToken { tok: c },
						location: SrcSpan::from(start, self.position),
					});
				}
			},
			None => (self.position, Token::Eof, self.position)
		};

		Ok(span)
    }

	fn next_char(&mut self) -> Option<char> {
		let ch = self.ch;

		let next = match self.input.next() {
			Some((pos, ch)) => {
				self.position = self.next_position;
				self.next_position = pos;
				self.end_position = pos + ch.len_utf8() as u32;

				Some(ch)
			},
			None => {
				self.position = self.next_position;
				self.next_position = self.end_position;

				None
			}
		};

		self.ch = self.next_ch;
		self.next_ch = next;

		ch
	}

	// Whitespace and `//` comments never reach the parser.
	fn skip_trivia(&mut self) {
		loop {
			match self.ch {
				Some(' ' | '\t' | '\n' | '\r' | '\x0C') => {
					let _ = self.next_char();
				},
				Some('/') if self.next_ch == Some('/') => {
					while !matches!(self.ch, Some('\n') | None) {
						let _ = self.next_char();
					}
				},
				_ => break
			}
		}
	}

	fn eat_one_char(&mut self, token: Token) -> Spanned {
		let start_pos = self.position;
		self.next_char();
		let end_pos = self.position;

		(start_pos, token, end_pos)
	}

	fn eat_with_equals(&mut self, single: Token, with_equals: Token) -> Spanned {
		let start_pos = self.position;
		self.next_char();

		let token = if self.ch == Some('=') {
			self.next_char();
			with_equals
		} else {
			single
		};

		(start_pos, token, self.position)
	}

	fn lex_ident(&mut self) -> Spanned {
        let start_pos = self.position;
		let mut ident = String::new();

		while let Some(ch) = self.ch {
			if !(ch.is_ascii_alphanumeric() || ch == '_') {
				break;
			}

			ident.push(ch);
			let _ = self.next_char();
		}

        let end_pos = self.position;

		match str_to_keyword(&ident) {
			Some(keyword) => (start_pos, keyword, end_pos),
			None => (start_pos, Token::Ident(ident), end_pos)
		}
	}

	fn lex_number(&mut self) -> LexResult {
		let start_pos = self.position;
		let mut value: i64 = 0;
		let mut overflowed = false;

		while let Some(digit) = self.ch.and_then(|ch| ch.to_digit(10)) {
			value = value * 10 + digit as i64;

			if value > MAX_INT_LITERAL {
				overflowed = true;
				value = MAX_INT_LITERAL;
			}

			let _ = self.next_char();
		}

		let end_pos = self.position;

		if overflowed {
			return Err(LexicalError {
				error: LexicalErrorType::IntegerOutOfRange,
				location: SrcSpan::from(start_pos, end_pos)
			});
		}

		Ok((start_pos, Token::Int(value), end_pos))
	}

	fn lex_string(&mut self) -> LexResult {
		let start_pos = self.position;
		let mut value = String::new();

		self.next_char(); // opening quote

		loop {
			match self.ch {
				Some('"') => {
					self.next_char();
					break;
				},
				Some('\n') | None => {
					return Err(LexicalError {
						error: LexicalErrorType::UnterminatedString,
						location: SrcSpan::from(start_pos, self.position)
					});
				},
				Some(ch) => {
					value.push(ch);
					let _ = self.next_char();
				}
			}
		}

		Ok((start_pos, Token::String(value), self.position))
	}
}

impl<T: Iterator<Item = (u32, char)>> Iterator for Lexer<T> {
	type Item = LexResult;

	fn next(&mut self) -> Option<Self::Item> {
		if self.finished {
			return None;
		}

		let token = self.next_token();

		if matches!(token, Ok((_, Token::Eof, _)) | Err(_)) {
			self.finished = true;
		}

		Some(token)
	}
}

pub fn lex(src: &str) -> Lexer<impl Iterator<Item = (u32, char)> + '_> {
	Lexer::new(src.char_indices().map(|(i, c)| (i as u32, c)))
}
