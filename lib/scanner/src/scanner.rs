use cursor::{Cursor, Line};
use itertools::Itertools;

pub mod token;
pub use token::{keyword, Literal, Token, TokenData, TokenType};
use TokenData::*;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScanErrorType {
    #[error("Unexpected character '{0}'.")]
    UnexpectedCharacter(char),
    #[error("Unterminated string.")]
    UnterminatedString,
    #[error("Number literal is too large.")]
    NumberTooLarge,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("[line {line}] Error: {error}")]
pub struct ScanError {
    pub error: ScanErrorType,
    pub line: Line,
}

#[derive(thiserror::Error, Debug, Default, Clone, PartialEq)]
#[error("{}", .0.iter().join("\n"))]
pub struct ScanErrors(pub Vec<ScanError>);

impl ScanErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScanError> {
        self.0.iter()
    }
}

/// Result of a full scan. Errors never stop the scan, so `tokens` is always
/// usable and always ends with a single `Eof`.
#[derive(Debug, Clone, PartialEq)]
pub struct Scanned<'a> {
    pub tokens: Vec<Token<'a>>,
    pub errors: ScanErrors,
}

/// Scans `source`, logging every diagnostic as a warning.
pub fn scan(source: &str) -> Vec<Token> {
    let Scanned { tokens, errors } = Scanner::new(source).scan_tokens();
    for error in errors.iter() {
        log::warn!("{error}");
    }
    tokens
}

#[derive(Debug)]
pub struct Scanner<'a> {
    start: Cursor<'a>,
    current: Cursor<'a>,
    tokens: Vec<Token<'a>>,
    errors: ScanErrors,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            start: Cursor::new(source),
            current: Cursor::new(source),
            tokens: Vec::new(),
            errors: ScanErrors::default(),
        }
    }

    pub fn scan_tokens(mut self) -> Scanned<'a> {
        loop {
            self.start = self.current.clone();
            let Some(c) = self.current.next() else {
                break;
            };

            match c {
                '(' => self.add_token(LeftParen),
                ')' => self.add_token(RightParen),
                '{' => self.add_token(LeftBrace),
                '}' => self.add_token(RightBrace),
                ',' => self.add_token(Comma),
                '.' => self.add_token(Dot),
                '-' => self.add_token(Minus),
                '+' => self.add_token(Plus),
                ';' => self.add_token(Semicolon),
                '*' => self.add_token(Star),

                '!' => self.add_token_if_eq('=', BangEqual, Bang),
                '=' => self.add_token_if_eq('=', EqualEqual, Equal),
                '<' => self.add_token_if_eq('=', LessEqual, Less),
                '>' => self.add_token_if_eq('=', GreaterEqual, Greater),

                '/' => {
                    if self.current.next_if_eq('/') {
                        // Comment
                        self.current.advance_while(|c| c != '\n');
                    } else {
                        self.add_token(Slash)
                    }
                }

                '"' => self.string(),

                d if d.is_ascii_digit() => self.number(),

                a if is_identifier_start(a) => self.identifier(),

                // The cursor already counted the newline.
                ' ' | '\r' | '\t' | '\n' => (),

                c => self.error(ScanErrorType::UnexpectedCharacter(c)),
            }
        }

        self.tokens.push(Token::new(Eof, (self.current.clone(), self.current.clone())));

        Scanned { tokens: self.tokens, errors: self.errors }
    }

    fn add_token(&mut self, data: TokenData<'a>) {
        let token = Token::new(data, (self.start.clone(), self.current.clone()));
        log::trace!("Scanned {:?} '{}' on line {}", token.token_type(), token, token.line());
        self.tokens.push(token);
    }

    fn add_token_if_eq(&mut self, expected: char, matched: TokenData<'a>, single: TokenData<'a>) {
        if self.current.next_if_eq(expected) {
            self.add_token(matched)
        } else {
            self.add_token(single)
        }
    }

    fn error(&mut self, error: ScanErrorType) {
        log::debug!("Scan error on line {}: {}", self.start.line(), error);
        self.errors.0.push(ScanError { error, line: self.start.line() });
    }

    fn string(&mut self) {
        self.current.advance_while(|c| c != '"');

        if !self.current.next_if_eq('"') {
            self.error(ScanErrorType::UnterminatedString);
            return;
        }

        let lexeme = self.start.slice_until(&self.current);
        self.add_token(Str(&lexeme[1..lexeme.len() - 1]));
    }

    fn number(&mut self) {
        self.current.advance_while(|c| c.is_ascii_digit());

        if self.current.peek() == Some('.') && self.current.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.current.next();
            self.current.advance_while(|c| c.is_ascii_digit());
        }

        let lexeme = self.start.slice_until(&self.current);
        let value: f64 = lexeme
            .parse()
            .unwrap_or_else(|_| unreachable!("Digits with an optional fraction are a valid f64: {lexeme}"));
        // Overflows to infinity, which has no source spelling.
        if !value.is_finite() {
            return self.error(ScanErrorType::NumberTooLarge);
        }
        self.add_token(Number(value));
    }

    fn identifier(&mut self) {
        self.current.advance_while(is_identifier_continue);

        let lexeme = self.start.slice_until(&self.current);
        self.add_token(keyword(lexeme).unwrap_or(Identifier));
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
