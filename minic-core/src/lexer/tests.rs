use super::prelude::{lex, LexicalError, LexicalErrorType, Token};
use crate::utils::prelude::SrcSpan;

fn tokens(input: &str) -> Result<Vec<Token>, LexicalError> {
    lex(input)
        .map(|result| result.map(|(_, token, _)| token))
        .collect()
}

#[test]
fn test_function() -> std::result::Result<(), LexicalError> {
    let input = r#"
        int add(int x, int y) {
            return x + y;
        }
    "#;

    let expected = vec![
        Token::IntType,
        Token::Ident("add".into()),
        Token::LParen,
        Token::IntType,
        Token::Ident("x".into()),
        Token::Comma,
        Token::IntType,
        Token::Ident("y".into()),
        Token::RParen,
        Token::LBrace,
        Token::Return,
        Token::Ident("x".into()),
        Token::Plus,
        Token::Ident("y".into()),
        Token::Semicolon,
        Token::RBrace,
        Token::Eof,
    ];

    assert_eq!(tokens(input)?, expected);

    Ok(())
}

#[test]
fn test_operators() -> std::result::Result<(), LexicalError> {
    let input = "+ - * / < > <= >= == != = ( ) { } ; ,";

    let expected = vec![
        Token::Plus,
        Token::Minus,
        Token::Mult,
        Token::Div,
        Token::LessThan,
        Token::GreaterThan,
        Token::LessThanOrEqual,
        Token::GreaterThanOrEqual,
        Token::Equal,
        Token::NotEqual,
        Token::Assign,
        Token::LParen,
        Token::RParen,
        Token::LBrace,
        Token::RBrace,
        Token::Semicolon,
        Token::Comma,
        Token::Eof,
    ];

    assert_eq!(tokens(input)?, expected);

    Ok(())
}

#[test]
fn test_operators_without_spaces() -> std::result::Result<(), LexicalError> {
    assert_eq!(tokens("a<=b==c!=d>e")?, vec![
        Token::Ident("a".into()),
        Token::LessThanOrEqual,
        Token::Ident("b".into()),
        Token::Equal,
        Token::Ident("c".into()),
        Token::NotEqual,
        Token::Ident("d".into()),
        Token::GreaterThan,
        Token::Ident("e".into()),
        Token::Eof,
    ]);

    Ok(())
}

#[test]
fn test_keywords_and_identifiers() -> std::result::Result<(), LexicalError> {
    assert_eq!(tokens("int integer _tmp1 while whilst if else return print")?, vec![
        Token::IntType,
        Token::Ident("integer".into()),
        Token::Ident("_tmp1".into()),
        Token::While,
        Token::Ident("whilst".into()),
        Token::If,
        Token::Else,
        Token::Return,
        Token::Ident("print".into()),
        Token::Eof,
    ]);

    Ok(())
}

#[test]
fn test_comments_are_skipped() -> std::result::Result<(), LexicalError> {
    let input = r#"
        // leading comment
        int a = 5; // expect 5
        // 5 / 0 @ never lexed
        a = a / 2;
    "#;

    assert_eq!(tokens(input)?, vec![
        Token::IntType,
        Token::Ident("a".into()),
        Token::Assign,
        Token::Int(5),
        Token::Semicolon,
        Token::Ident("a".into()),
        Token::Assign,
        Token::Ident("a".into()),
        Token::Div,
        Token::Int(2),
        Token::Semicolon,
        Token::Eof,
    ]);

    Ok(())
}

#[test]
fn test_strings_keep_their_contents() -> std::result::Result<(), LexicalError> {
    assert_eq!(tokens(r#"print("hello, world\n // not a comment");"#)?, vec![
        Token::Ident("print".into()),
        Token::LParen,
        Token::String("hello, world\\n // not a comment".into()),
        Token::RParen,
        Token::Semicolon,
        Token::Eof,
    ]);

    Ok(())
}

#[test]
fn test_spans() -> std::result::Result<(), LexicalError> {
    let spans = lex("int x = 42;\n\"é\"")
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|(start, _, end)| (start, end))
        .collect::<Vec<_>>();

    assert_eq!(spans, vec![(0, 3), (4, 5), (6, 7), (8, 10), (10, 11), (12, 16), (16, 16)]);

    Ok(())
}

#[test]
fn test_integer_limits() {
    assert_eq!(tokens("2147483648"), Ok(vec![Token::Int(2147483648), Token::Eof]));

    let err = tokens("2147483649").unwrap_err();
    assert_eq!(err.error, LexicalErrorType::IntegerOutOfRange);
    assert_eq!(err.location, SrcSpan::from(0, 10));

    let err = tokens("99999999999999999999999").unwrap_err();
    assert_eq!(err.error, LexicalErrorType::IntegerOutOfRange);
}

#[test]
fn test_invalid_characters() {
    let fails = vec![
        ("int a = 1 @ 2;", LexicalErrorType::UnrecognizedToken { tok: '@' }, SrcSpan::from(10, 11)),
        ("a = !b;", LexicalErrorType::UnrecognizedToken { tok: '!' }, SrcSpan::from(4, 5)),
        ("x.y", LexicalErrorType::UnrecognizedToken { tok: '.' }, SrcSpan::from(1, 2)),
        ("print(\"open);", LexicalErrorType::UnterminatedString, SrcSpan::from(6, 13)),
        ("\"broken\nstring\"", LexicalErrorType::UnterminatedString, SrcSpan::from(0, 7)),
    ];

    for (input, error, location) in fails {
        let err = match tokens(input) {
            Err(err) => err,
            Ok(value) => panic!("Expected Err for {input:?} but got Ok({value:?})"),
        };

        assert_eq!(err.error, error, "wrong error for {input:?}");
        assert_eq!(err.location, location, "wrong location for {input:?}");
    }
}

#[test]
fn test_sequence_ends() {
    let mut lexer = lex("x");

    assert!(matches!(lexer.next(), Some(Ok((0, Token::Ident(_), 1)))));
    assert!(matches!(lexer.next(), Some(Ok((1, Token::Eof, 1)))));
    assert!(lexer.next().is_none());

    let mut lexer = lex("# x");

    assert!(matches!(lexer.next(), Some(Err(_))));
    assert!(lexer.next().is_none());
}
