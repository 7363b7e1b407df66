use crate::error::{ErrorKind, Position, Result, ZyError};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Fn,
    Let,
    In,
    If,
    Then,
    Else,
    And,
    End,
}

impl Keyword {
    fn from_word(word: &str) -> Option<Self> {
        let keyword = match word {
            "fn" => Keyword::Fn,
            "let" => Keyword::Let,
            "in" => Keyword::In,
            "if" => Keyword::If,
            "then" => Keyword::Then,
            "else" => Keyword::Else,
            "and" => Keyword::And,
            "end" => Keyword::End,
            _ => return None,
        };
        Some(keyword)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Fn => "fn",
            Keyword::Let => "let",
            Keyword::In => "in",
            Keyword::If => "if",
            Keyword::Then => "then",
            Keyword::Else => "else",
            Keyword::And => "and",
            Keyword::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Plus,
    Minus,
    Star,
    Slash,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    AndAnd,
    OrOr,
    Bang,
    Dot,
    DotDot,
    Semicolon,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Star => "*",
            Operator::Slash => "/",
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::Less => "<",
            Operator::Greater => ">",
            Operator::LessEqual => "<=",
            Operator::GreaterEqual => ">=",
            Operator::AndAnd => "&&",
            Operator::OrOr => "||",
            Operator::Bang => "!",
            Operator::Dot => ".",
            Operator::DotDot => "..",
            Operator::Semicolon => ";",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Keyword(Keyword),
    Identifier(String),
    Number(f64),
    String(String),
    Bool(bool),
    Operator(Operator),
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    DoubleColon,
    Comma,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::Keyword(keyword) => write!(f, "'{}'", keyword.as_str()),
            TokenKind::Identifier(name) => write!(f, "identifier '{}'", name),
            TokenKind::Number(n) => write!(f, "number {}", n),
            TokenKind::String(s) => write!(f, "string \"{}\"", s),
            TokenKind::Bool(b) => write!(f, "boolean {}", b),
            TokenKind::Operator(op) => write!(f, "'{}'", op.as_str()),
            TokenKind::LeftParen => write!(f, "'('"),
            TokenKind::RightParen => write!(f, "')'"),
            TokenKind::LeftBracket => write!(f, "'['"),
            TokenKind::RightBracket => write!(f, "']'"),
            TokenKind::DoubleColon => write!(f, "'::'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, position: Position) -> Self {
        Self { kind, position }
    }
}

/// Multi-character operators come before their single-character prefixes.
const PUNCTUATION: &[(&str, TokenKind)] = &[
    ("::", TokenKind::DoubleColon),
    ("!=", TokenKind::Operator(Operator::NotEqual)),
    ("<=", TokenKind::Operator(Operator::LessEqual)),
    (">=", TokenKind::Operator(Operator::GreaterEqual)),
    ("&&", TokenKind::Operator(Operator::AndAnd)),
    ("||", TokenKind::Operator(Operator::OrOr)),
    ("..", TokenKind::Operator(Operator::DotDot)),
    ("+", TokenKind::Operator(Operator::Plus)),
    ("-", TokenKind::Operator(Operator::Minus)),
    ("*", TokenKind::Operator(Operator::Star)),
    ("/", TokenKind::Operator(Operator::Slash)),
    ("=", TokenKind::Operator(Operator::Equal)),
    ("<", TokenKind::Operator(Operator::Less)),
    (">", TokenKind::Operator(Operator::Greater)),
    ("!", TokenKind::Operator(Operator::Bang)),
    (".", TokenKind::Operator(Operator::Dot)),
    (";", TokenKind::Operator(Operator::Semicolon)),
    ("(", TokenKind::LeftParen),
    (")", TokenKind::RightParen),
    ("[", TokenKind::LeftBracket),
    ("]", TokenKind::RightBracket),
    (",", TokenKind::Comma),
];

/// On-demand scanner: every call to [`Lexer::next_token`] yields one token,
/// and keeps yielding `Eof` once the input is exhausted.
pub struct Lexer<'src> {
    source: &'src str,
    current: usize,
    line: usize,
    column: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            current: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia();

        let position = self.position();
        let rest = self.rest();
        let c = match rest.chars().next() {
            Some(c) => c,
            None => return Ok(Token::new(TokenKind::Eof, position)),
        };

        if c.is_ascii_alphabetic() || c == '_' {
            return Ok(self.identifier(position));
        }
        if c.is_ascii_digit() {
            return Ok(self.number(position));
        }
        if c == '"' {
            return self.string(position);
        }

        for (text, kind) in PUNCTUATION {
            if rest.starts_with(text) {
                self.advance_by(text.len());
                return Ok(Token::new(kind.clone(), position));
            }
        }

        Err(ZyError::lex_error(position, ErrorKind::UnexpectedCharacter(c)))
    }

    /// Scans the whole input eagerly, up to and including `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn rest(&self) -> &'src str {
        &self.source[self.current..]
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column, self.current)
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.current += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn advance_by(&mut self, bytes: usize) {
        let target = self.current + bytes;
        while self.current < target && self.advance().is_some() {}
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.advance();
        }
    }

    /// Whitespace and `'` line comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('\'') => self.advance_while(|c| c != '\n'),
                _ => return,
            }
        }
    }

    fn identifier(&mut self, position: Position) -> Token {
        let start = self.current;
        self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let text = &self.source[start..self.current];

        let kind = match text {
            "true" => TokenKind::Bool(true),
            "false" => TokenKind::Bool(false),
            _ => match Keyword::from_word(text) {
                Some(keyword) => TokenKind::Keyword(keyword),
                None => TokenKind::Identifier(text.to_string()),
            },
        };
        Token::new(kind, position)
    }

    fn number(&mut self, position: Position) -> Token {
        let start = self.current;
        self.advance_while(|c| c.is_ascii_digit());

        // A dot only belongs to the number when a digit follows, so `1..2`
        // still lexes as a concatenation.
        if self.peek() == Some('.') && self.peek_next().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
            self.advance_while(|c| c.is_ascii_digit());
        }

        let text = &self.source[start..self.current];
        // Digits with at most one interior dot always parse.
        let value = text.parse::<f64>().unwrap_or_default();
        Token::new(TokenKind::Number(value), position)
    }

    fn string(&mut self, position: Position) -> Result<Token> {
        self.advance();
        let start = self.current;
        self.advance_while(|c| c != '"');

        if self.peek().is_none() {
            return Err(ZyError::lex_error(position, ErrorKind::UnterminatedString));
        }

        let content = self.source[start..self.current].to_string();
        self.advance();
        Ok(Token::new(TokenKind::String(content), position))
    }
}
