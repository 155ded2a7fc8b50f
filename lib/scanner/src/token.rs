use std::fmt::{self, Display, Formatter};

use cursor::{Col, Line, SourceRange};
use strum::EnumDiscriminants;

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub data: TokenData<'a>,
    pub range: SourceRange<'a>,
}

impl<'a> Token<'a> {
    pub fn new(data: TokenData<'a>, range: impl Into<SourceRange<'a>>) -> Token<'a> {
        Self { data, range: range.into() }
    }

    pub fn lexeme(&self) -> &'a str {
        self.range.lexeme()
    }

    pub fn line(&self) -> Line {
        self.range.line()
    }

    pub fn col(&self) -> Col {
        self.range.col()
    }

    pub fn token_type(&self) -> TokenType {
        TokenType::from(&self.data)
    }

    /// Decoded payload of string and number literals.
    pub fn literal(&self) -> Option<Literal<'a>> {
        match self.data {
            TokenData::Str(s) => Some(Literal::Str(s)),
            TokenData::Number(n) => Some(Literal::Number(n)),
            _ => None,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.data == TokenData::Eof
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lexeme())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal<'a> {
    Str(&'a str),
    Number(f64),
}

impl Display for Literal<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Str(s) => write!(f, "{s}"),
            Literal::Number(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(TokenType), derive(Hash))]
pub enum TokenData<'a> {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens.
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals.
    Identifier,
    Str(&'a str),
    Number(f64),

    // Keywords.
    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    Eof,
}

static KEYWORDS: [(&str, TokenData<'static>); 16] = [
    ("and", TokenData::And),
    ("class", TokenData::Class),
    ("else", TokenData::Else),
    ("false", TokenData::False),
    ("for", TokenData::For),
    ("fun", TokenData::Fun),
    ("if", TokenData::If),
    ("nil", TokenData::Nil),
    ("or", TokenData::Or),
    ("print", TokenData::Print),
    ("return", TokenData::Return),
    ("super", TokenData::Super),
    ("this", TokenData::This),
    ("true", TokenData::True),
    ("var", TokenData::Var),
    ("while", TokenData::While),
];

/// Looks up a reserved word, `None` means `ident` is a plain identifier.
pub fn keyword(ident: &str) -> Option<TokenData<'static>> {
    KEYWORDS.iter().find(|(name, _)| *name == ident).map(|(_, data)| data.clone())
}
