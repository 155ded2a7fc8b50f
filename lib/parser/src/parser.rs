mod expr;
pub mod printer;

use itertools::Itertools;
use log::{debug, trace};
use scanner::{Token, TokenData, TokenType};

pub use expr::{Expr, LiteralValue, Visitor};
pub use printer::{AstPrinter, SourcePrinter};

use TokenType::*;

pub type Result<'a, T> = std::result::Result<T, ParseError<'a>>;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum ParseErrorType {
    #[error("Expect expression.")]
    ExpectedExpression,
    #[error("Expect ')' after expression.")]
    ExpectedRightParen,
    #[error("Expect ';' after expression.")]
    ExpectedSemicolon,
    #[error("Expect end of expression.")]
    ExpectedEnd,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("[line {}] Error{}: {error}", .token.line(), location(.token))]
pub struct ParseError<'a> {
    pub error: ParseErrorType,
    pub token: Token<'a>,
}

fn location(token: &Token) -> String {
    if token.is_eof() {
        " at end".to_string()
    } else {
        format!(" at '{}'", token.lexeme())
    }
}

impl<'a> ParseError<'a> {
    pub fn new(error: ParseErrorType, token: Token<'a>) -> Self {
        Self { error, token }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{}", .0.iter().join("\n"))]
pub struct ParseErrors<'a>(pub Vec<ParseError<'a>>);

impl<'a> From<ParseError<'a>> for ParseErrors<'a> {
    fn from(error: ParseError<'a>) -> Self {
        Self(vec![error])
    }
}

/// Recursive descent parser over a scanned token slice.
///
/// The slice must end with the scanner's `Eof` token; the cursor never moves
/// past it.
#[derive(Debug)]
pub struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    current: usize,
}

impl<'t, 'a> Parser<'t, 'a> {
    pub fn new(tokens: &'t [Token<'a>]) -> Self {
        assert!(
            tokens.last().is_some_and(Token::is_eof),
            "token stream must be terminated by Eof"
        );
        Self { tokens, current: 0 }
    }

    /// Parses a single expression spanning all remaining tokens.
    pub fn parse(&mut self) -> Result<'a, Expr<'a>> {
        let expr = self.expression()?;
        self.consume_or_error(Eof, ParseErrorType::ExpectedEnd)?;
        Ok(expr)
    }

    /// Parses `;`-separated expressions until `Eof`, recovering from errors
    /// so that every malformed expression gets reported.
    pub fn parse_all(&mut self) -> std::result::Result<Vec<Expr<'a>>, ParseErrors<'a>> {
        let mut errors = ParseErrors(Vec::new());
        let mut exprs = Vec::new();

        while !self.is_at_end() {
            match self.terminated_expression() {
                Ok(expr) => exprs.push(expr),
                Err(e) => {
                    debug!("Hit error: {}, syncing...", e);
                    errors.0.push(e);
                    self.synchronize();
                }
            }
        }

        if errors.0.is_empty() {
            Ok(exprs)
        } else {
            Err(errors)
        }
    }

    fn terminated_expression(&mut self) -> Result<'a, Expr<'a>> {
        let expr = self.expression()?;
        if self.consume(Semicolon).is_err() && !self.is_at_end() {
            return Err(ParseError::new(ParseErrorType::ExpectedSemicolon, self.peek_token().clone()));
        }
        Ok(expr)
    }

    pub fn expression(&mut self) -> Result<'a, Expr<'a>> {
        self.equality()
    }

    fn equality(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.comparison()?;

        while let BangEqual | EqualEqual = self.peek() {
            let operator = self.advance();
            let right = Box::new(self.comparison()?);
            expr = Expr::Binary { left: Box::new(expr), operator, right }
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.term()?;

        while let Greater | GreaterEqual | Less | LessEqual = self.peek() {
            let operator = self.advance();
            let right = Box::new(self.term()?);
            expr = Expr::Binary { left: Box::new(expr), operator, right }
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.factor()?;

        while let Plus | Minus = self.peek() {
            let operator = self.advance();
            let right = Box::new(self.factor()?);
            expr = Expr::Binary { left: Box::new(expr), operator, right }
        }
        Ok(expr)
    }

    fn factor(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.unary()?;

        while let Star | Slash = self.peek() {
            let operator = self.advance();
            let right = Box::new(self.unary()?);
            expr = Expr::Binary { left: Box::new(expr), operator, right }
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<'a, Expr<'a>> {
        if let Minus | Bang = self.peek() {
            let operator = self.advance();
            let right = Box::new(self.unary()?);
            return Ok(Expr::Unary { operator, right });
        }

        self.primary()
    }

    fn primary(&mut self) -> Result<'a, Expr<'a>> {
        let token = self.peek_token();
        trace!("Parsing primary: {:?}", token.data);

        let value = match token.data {
            TokenData::False => LiteralValue::Boolean(false),
            TokenData::True => LiteralValue::Boolean(true),
            TokenData::Nil => LiteralValue::Nil,
            TokenData::Number(n) => LiteralValue::Number(n),
            TokenData::Str(s) => LiteralValue::Str(s),
            TokenData::LeftParen => {
                self.advance();
                let expression = self.expression()?;
                self.consume_or_error(RightParen, ParseErrorType::ExpectedRightParen)?;
                return Ok(Expr::Grouping(Box::new(expression)));
            }
            _ => return Err(ParseError::new(ParseErrorType::ExpectedExpression, token.clone())),
        };

        self.advance();
        Ok(Expr::Literal(value))
    }

    /// Skips tokens until a likely expression boundary: just past a `;`, or in
    /// front of a keyword that starts a statement.
    pub fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().token_type() == Semicolon {
                return;
            }

            match self.peek() {
                Class | Fun | Var | For | If | While | Print | Return => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.peek() == Eof
    }
}

// Helpers
impl<'t, 'a> Parser<'t, 'a> {
    fn peek_token(&self) -> &'t Token<'a> {
        &self.tokens[self.current]
    }

    fn peek(&self) -> TokenType {
        self.peek_token().token_type()
    }

    fn previous(&self) -> &'t Token<'a> {
        &self.tokens[self.current.saturating_sub(1)]
    }

    /// Returns the current token and moves past it, unless it is `Eof`.
    fn advance(&mut self) -> Token<'a> {
        let token = self.peek_token().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn consume(&mut self, token_type: TokenType) -> std::result::Result<Token<'a>, &'t Token<'a>> {
        if self.peek() == token_type {
            Ok(self.advance())
        } else {
            Err(self.peek_token())
        }
    }

    fn consume_or_error(&mut self, token_type: TokenType, error: ParseErrorType) -> Result<'a, Token<'a>> {
        self.consume(token_type).map_err(|token| ParseError::new(error, token.clone()))
    }
}

#[cfg(test)]
mod tests {
    use cursor::Line;
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(source: &str) -> String {
        let tokens = scanner::scan(source);
        let mut parser = Parser::new(&tokens);
        match parser.parse() {
            Ok(expr) => expr.to_string(),
            Err(e) => e.to_string(),
        }
    }

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(parse("1 - 2 - 3"), "(- (- 1 2) 3)");
        assert_eq!(parse("1 + 2 * 3"), "(+ 1 (* 2 3))");
        assert_eq!(parse("8 / 4 / 2"), "(/ (/ 8 4) 2)");
        assert_eq!(parse("1 < 2 == 3 >= 4"), "(== (< 1 2) (>= 3 4))");
        assert_eq!(parse("1 != 2 == true"), "(== (!= 1 2) true)");
        assert_eq!(parse("-1 * 2 + 3 > 4 <= 5"), "(<= (> (+ (* (- 1) 2) 3) 4) 5)");
    }

    #[test]
    fn grouping() {
        assert_eq!(parse("(1 + 2) * 3"), "(* (group (+ 1 2)) 3)");
        assert_eq!(parse("((nil))"), "(group (group nil))");
    }

    #[test]
    fn unary_is_right_recursive() {
        assert_eq!(parse("--5"), "(- (- 5))");
        assert_eq!(parse("!!true"), "(! (! true))");
        assert_eq!(parse("-!-\"x\""), "(- (! (- x)))");
    }

    #[test]
    fn missing_right_paren() {
        let tokens = scanner::scan("(1 + 2");
        let error = Parser::new(&tokens).parse().unwrap_err();

        assert_eq!(error.error, ParseErrorType::ExpectedRightParen);
        assert!(error.token.is_eof());
        assert_eq!(error.to_string(), "[line 1] Error at end: Expect ')' after expression.");
    }

    #[test]
    fn expected_expression() {
        assert_eq!(parse(""), "[line 1] Error at end: Expect expression.");
        assert_eq!(parse("1 +"), "[line 1] Error at end: Expect expression.");
        assert_eq!(parse("1 +\n*"), "[line 2] Error at '*': Expect expression.");
        assert_eq!(parse("foo"), "[line 1] Error at 'foo': Expect expression.");
        assert_eq!(parse(")"), "[line 1] Error at ')': Expect expression.");
    }

    #[test]
    fn trailing_tokens() {
        assert_eq!(parse("1 2"), "[line 1] Error at '2': Expect end of expression.");
        assert_eq!(parse("(1))"), "[line 1] Error at ')': Expect end of expression.");
    }

    #[test]
    fn expression_leaves_cursor_after_expression() {
        let tokens = scanner::scan("1 + 2 )");
        let mut parser = Parser::new(&tokens);
        assert_eq!(parser.expression().unwrap().to_string(), "(+ 1 2)");
        assert_eq!(parser.peek(), RightParen);
        assert!(!parser.is_at_end());
    }

    #[test]
    fn parse_all_recovers_after_errors() {
        let tokens = scanner::scan("1 + ;\n2 * 3;\n(4;\n5 6; 7");
        let errors = Parser::new(&tokens).parse_all().unwrap_err();
        assert_eq!(
            errors.to_string(),
            [
                "[line 1] Error at ';': Expect expression.",
                "[line 3] Error at ';': Expect ')' after expression.",
                "[line 4] Error at '6': Expect ';' after expression.",
            ]
            .join("\n")
        );
        assert_eq!(errors.0[0].token.line(), Line(1));

        let tokens = scanner::scan("1 + 2; -3;\n\"a\"");
        let exprs = Parser::new(&tokens).parse_all().unwrap();
        assert_eq!(
            exprs.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
            vec!["(+ 1 2)", "(- 3)", "a"]
        );

        let tokens = scanner::scan("// nothing here");
        assert!(Parser::new(&tokens).parse_all().unwrap().is_empty());
    }

    #[test]
    fn synchronize_stops_at_statement_boundaries() {
        let tokens = scanner::scan("1 2 3; 4");
        let mut parser = Parser::new(&tokens);
        parser.synchronize();
        assert_eq!(parser.expression().unwrap().to_string(), "4");

        let tokens = scanner::scan("1 2 print 3");
        let mut parser = Parser::new(&tokens);
        parser.synchronize();
        assert_eq!(parser.peek(), Print);

        for keyword in ["class", "fun", "var", "for", "if", "while", "print", "return"] {
            let source = format!("+ + {keyword} 1");
            let tokens = scanner::scan(&source);
            let mut parser = Parser::new(&tokens);
            parser.synchronize();
            assert_eq!(parser.peek_token().lexeme(), keyword);
        }

        let tokens = scanner::scan("1 + 2");
        let mut parser = Parser::new(&tokens);
        parser.synchronize();
        assert!(parser.is_at_end());
        parser.synchronize();
        assert!(parser.is_at_end());
    }

    #[test]
    fn operators_keep_their_tokens() {
        let tokens = scanner::scan("1 +\n 2");
        let expr = Parser::new(&tokens).parse().unwrap();
        let Expr::Binary { operator, .. } = expr else {
            panic!("expected binary expression");
        };
        assert_eq!((operator.token_type(), operator.lexeme(), operator.line()), (Plus, "+", Line(1)));
    }

    #[test]
    #[should_panic(expected = "terminated by Eof")]
    fn tokens_without_eof_are_rejected() {
        let tokens = scanner::scan("1");
        let _ = Parser::new(&tokens[..1]);
    }
}
