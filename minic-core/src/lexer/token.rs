#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    // <letter|_>{<letter>|<digit>|_}
    Ident(String),
    // {<digit>}
    Int(i64),
    // "<any character but `"` and newline>"
    String(String),

    // Keywords
    IntType, // int
    Return, // return
    If, // if
    Else, // else
    While, // while

    // Arithmetic
    Plus, // +
    Minus, // -
    Mult, // *
    Div, // /

    // Comparison
    Equal, // ==
    NotEqual, // !=
    LessThan, // <
    LessThanOrEqual, // <=
    GreaterThan, // >
    GreaterThanOrEqual, // >=

    Assign, // =

    // Punctuation
    LParen, // (
    RParen, // )
    LBrace, // {
    RBrace, // }
    Comma, // ,
    Semicolon, // ;

    Eof,
}

impl Token {
    pub fn is_reserved_word(&self) -> bool {
        matches!(
            self,
            Token::IntType
            | Token::Return
            | Token::If
            | Token::Else
            | Token::While
        )
    }

    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            Token::Plus
            | Token::Minus
            | Token::Mult
            | Token::Div
            | Token::Equal
            | Token::NotEqual
            | Token::LessThan
            | Token::LessThanOrEqual
            | Token::GreaterThan
            | Token::GreaterThanOrEqual
            | Token::Assign
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Token::Ident(_) => "identifier",
            Token::Int(_) => "integer literal",
            Token::String(_) => "string literal",
            Token::Eof => "end of input",
            _ if self.is_reserved_word() => "keyword",
            _ if self.is_operator() => "operator",
            _ => "punctuation",
        }
    }

    pub fn as_literal(&self) -> String {
        match self {
            Token::Ident(value) => value.clone(),
            Token::Int(value) => value.to_string(),
            Token::String(value) => format!("\"{value}\""),

            Token::IntType => "int".to_string(),
            Token::Return => "return".to_string(),
            Token::If => "if".to_string(),
            Token::Else => "else".to_string(),
            Token::While => "while".to_string(),

            Token::Plus => "+".to_string(),
            Token::Minus => "-".to_string(),
            Token::Mult => "*".to_string(),
            Token::Div => "/".to_string(),
            Token::Equal => "==".to_string(),
            Token::NotEqual => "!=".to_string(),
            Token::LessThan => "<".to_string(),
            Token::LessThanOrEqual => "<=".to_string(),
            Token::GreaterThan => ">".to_string(),
            Token::GreaterThanOrEqual => ">=".to_string(),
            Token::Assign => "=".to_string(),

            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::LBrace => "{".to_string(),
            Token::RBrace => "}".to_string(),
            Token::Comma => ",".to_string(),
            Token::Semicolon => ";".to_string(),

            Token::Eof => "".to_string(),
        }
    }
}
