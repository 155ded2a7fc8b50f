use std::io::{BufRead, Write};

use parser::{AstPrinter, Expr, LiteralValue, Parser, SourcePrinter};
use scanner::{Scanned, Scanner, Token};

/// What the driver prints for each input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Emit {
    /// Parenthesized prefix form of every expression.
    #[default]
    Ast,
    /// One row per scanned token.
    Tokens,
    /// Infix source regenerated from the syntax tree.
    Source,
}

#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error("{0}")]
    Parse(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<parser::ParseErrors<'_>> for RunError {
    fn from(errors: parser::ParseErrors<'_>) -> Self {
        RunError::Parse(errors.to_string())
    }
}

/// Runs sources through the scanner and parser. Results go to `out`, scan
/// diagnostics to `err`.
pub struct Driver<O, E> {
    emit: Emit,
    out: O,
    err: E,
}

impl<O: Write, E: Write> Driver<O, E> {
    pub fn new(emit: Emit, out: O, err: E) -> Self {
        Self { emit, out, err }
    }

    pub fn run(&mut self, source: &str) -> Result<(), RunError> {
        let Scanned { tokens, errors } = Scanner::new(source).scan_tokens();
        log::debug!("Scanned {} tokens with {} errors", tokens.len(), errors.0.len());

        for error in errors.iter() {
            writeln!(self.err, "{error}")?;
        }

        if self.emit == Emit::Tokens {
            for token in &tokens {
                writeln!(self.out, "{}", describe(token))?;
            }
            return Ok(());
        }

        let exprs = Parser::new(&tokens).parse_all()?;
        for expr in &exprs {
            self.print(expr)?;
        }
        self.out.flush()?;

        Ok(())
    }

    /// Prints a single tree. `Emit::Tokens` has no tokens to show here and
    /// falls back to the prefix form.
    pub fn print(&mut self, expr: &Expr) -> std::io::Result<()> {
        let printed = match self.emit {
            Emit::Source => SourcePrinter.print(expr),
            Emit::Ast | Emit::Tokens => AstPrinter.print(expr),
        };
        writeln!(self.out, "{printed}")
    }

    /// Reads `input` line by line, running each line as its own source.
    /// Parse errors are printed and the prompt continues; end of input
    /// returns.
    pub fn run_prompt(&mut self, input: impl BufRead) -> Result<(), RunError> {
        let mut lines = input.lines();
        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;
            let Some(line) = lines.next() else {
                return Ok(());
            };
            match self.run(&line?) {
                Err(RunError::Parse(errors)) => writeln!(self.out, "{errors}")?,
                result => result?,
            }
        }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

/// The tree for `-123 * (45.67)`, built by hand rather than parsed.
pub fn sample_expr() -> Expr<'static> {
    let Scanned { tokens, .. } = Scanner::new("- *").scan_tokens();
    let [minus, star, _eof] = <[Token; 3]>::try_from(tokens)
        .unwrap_or_else(|tokens| unreachable!("\"- *\" scans to two operators and Eof: {tokens:?}"));

    Expr::Binary {
        left: Box::new(Expr::Unary { operator: minus, right: Box::new(Expr::Literal(LiteralValue::Number(123.0))) }),
        operator: star,
        right: Box::new(Expr::Grouping(Box::new(Expr::Literal(LiteralValue::Number(45.67))))),
    }
}

fn describe(token: &Token) -> String {
    let mut row = format!("{:>4} {:?} '{}'", token.line().0, token.token_type(), token.lexeme());
    if let Some(literal) = token.literal() {
        row.push_str(&format!(" {literal}"));
    }
    row
}
