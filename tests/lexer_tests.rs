use zy::error::ErrorKind;
use zy::lexer::{Keyword, Operator};
use zy::{Lexer, Position, TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    Lexer::new(source)
        .tokenize()
        .expect("source should lex")
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn tokens_carry_line_column_and_offset() {
    let tokens = Lexer::new("1+2").tokenize().unwrap();

    let expected = vec![
        (TokenKind::Number(1.0), Position::new(1, 1, 0)),
        (TokenKind::Operator(Operator::Plus), Position::new(1, 2, 1)),
        (TokenKind::Number(2.0), Position::new(1, 3, 2)),
        (TokenKind::Eof, Position::new(1, 4, 3)),
    ];
    let actual: Vec<_> = tokens.into_iter().map(|t| (t.kind, t.position)).collect();
    assert_eq!(actual, expected);
}

#[test]
fn multi_character_operators_win_over_prefixes() {
    assert_eq!(
        kinds("<= != >= && || .. :: < = > ! ."),
        vec![
            TokenKind::Operator(Operator::LessEqual),
            TokenKind::Operator(Operator::NotEqual),
            TokenKind::Operator(Operator::GreaterEqual),
            TokenKind::Operator(Operator::AndAnd),
            TokenKind::Operator(Operator::OrOr),
            TokenKind::Operator(Operator::DotDot),
            TokenKind::DoubleColon,
            TokenKind::Operator(Operator::Less),
            TokenKind::Operator(Operator::Equal),
            TokenKind::Operator(Operator::Greater),
            TokenKind::Operator(Operator::Bang),
            TokenKind::Operator(Operator::Dot),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn keywords_booleans_and_identifiers() {
    assert_eq!(
        kinds("fn let in if then else and end true false trueish _tmp1"),
        vec![
            TokenKind::Keyword(Keyword::Fn),
            TokenKind::Keyword(Keyword::Let),
            TokenKind::Keyword(Keyword::In),
            TokenKind::Keyword(Keyword::If),
            TokenKind::Keyword(Keyword::Then),
            TokenKind::Keyword(Keyword::Else),
            TokenKind::Keyword(Keyword::And),
            TokenKind::Keyword(Keyword::End),
            TokenKind::Bool(true),
            TokenKind::Bool(false),
            TokenKind::Identifier("trueish".to_string()),
            TokenKind::Identifier("_tmp1".to_string()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn numbers_take_a_dot_only_before_a_digit() {
    assert_eq!(
        kinds("1.5 1..2 3.x"),
        vec![
            TokenKind::Number(1.5),
            TokenKind::Number(1.0),
            TokenKind::Operator(Operator::DotDot),
            TokenKind::Number(2.0),
            TokenKind::Number(3.0),
            TokenKind::Operator(Operator::Dot),
            TokenKind::Identifier("x".to_string()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn strings_have_no_escape_sequences() {
    assert_eq!(
        kinds(r#""a\nb" "it's""#),
        vec![
            TokenKind::String("a\\nb".to_string()),
            TokenKind::String("it's".to_string()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn comments_and_newlines_are_skipped() {
    let tokens = Lexer::new("' a comment\n  x ' trailing\ny").tokenize().unwrap();

    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0].kind, TokenKind::Identifier("x".to_string()));
    assert_eq!(tokens[0].position, Position::new(2, 3, 14));
    assert_eq!(tokens[1].kind, TokenKind::Identifier("y".to_string()));
    assert_eq!(tokens[1].position.line, 3);
}

#[test]
fn end_of_input_repeats() {
    let mut lexer = Lexer::new("x");
    assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Identifier(_)));
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
}

#[test]
fn unknown_character_is_a_positioned_error() {
    let error = Lexer::new("1 # 2").tokenize().unwrap_err();
    assert_eq!(error.kind, ErrorKind::UnexpectedCharacter('#'));
    assert_eq!(error.position, Some(Position::new(1, 3, 2)));
    assert!(error.is_fatal());
}

#[test]
fn single_colon_is_rejected() {
    let error = Lexer::new("x : 1").tokenize().unwrap_err();
    assert_eq!(error.kind, ErrorKind::UnexpectedCharacter(':'));
}

#[test]
fn unterminated_string_points_at_the_opening_quote() {
    let error = Lexer::new("let s :: \"open").tokenize().unwrap_err();
    assert_eq!(error.kind, ErrorKind::UnterminatedString);
    assert_eq!(error.position, Some(Position::new(1, 10, 9)));
}
