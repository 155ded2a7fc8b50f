use scanner::Token;

use crate::{Expr, LiteralValue, Visitor};

/// Renders an expression as a fully parenthesized prefix S-expression,
/// e.g. `(* (- 123) (group 45.67))`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AstPrinter;

impl AstPrinter {
    pub fn print(&mut self, expr: &Expr) -> String {
        expr.accept(self)
    }

    fn parenthesize(&mut self, name: &str, exprs: &[&Expr]) -> String {
        let mut ast = format!("({name}");
        for expr in exprs {
            ast.push(' ');
            ast.push_str(&expr.accept(self));
        }
        ast.push(')');
        ast
    }
}

impl<'a> Visitor<'a> for AstPrinter {
    type Output = String;

    fn visit_binary(&mut self, left: &Expr<'a>, operator: &Token<'a>, right: &Expr<'a>) -> String {
        self.parenthesize(operator.lexeme(), &[left, right])
    }

    fn visit_grouping(&mut self, expression: &Expr<'a>) -> String {
        self.parenthesize("group", &[expression])
    }

    fn visit_literal(&mut self, value: &LiteralValue<'a>) -> String {
        value.to_string()
    }

    fn visit_unary(&mut self, operator: &Token<'a>, right: &Expr<'a>) -> String {
        self.parenthesize(operator.lexeme(), &[right])
    }
}

/// Renders an expression back to infix source. Parentheses only come from
/// `Grouping` nodes, so the output of a parsed tree parses to the same tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct SourcePrinter;

impl SourcePrinter {
    pub fn print(&mut self, expr: &Expr) -> String {
        expr.accept(self)
    }
}

impl<'a> Visitor<'a> for SourcePrinter {
    type Output = String;

    fn visit_binary(&mut self, left: &Expr<'a>, operator: &Token<'a>, right: &Expr<'a>) -> String {
        format!("{} {} {}", left.accept(self), operator.lexeme(), right.accept(self))
    }

    fn visit_grouping(&mut self, expression: &Expr<'a>) -> String {
        format!("({})", expression.accept(self))
    }

    fn visit_literal(&mut self, value: &LiteralValue<'a>) -> String {
        match value {
            LiteralValue::Str(s) => format!("\"{s}\""),
            value => value.to_string(),
        }
    }

    fn visit_unary(&mut self, operator: &Token<'a>, right: &Expr<'a>) -> String {
        format!("{}{}", operator.lexeme(), right.accept(self))
    }
}
