//! Canonical textual form of expressions
//!
//! The output is accepted by the parser and evaluates to the same value as
//! the tree it came from. Parentheses are only emitted where precedence
//! requires them.

use std::fmt::{self, Display, Formatter, Write};

use crate::expr::{CONDITIONAL_PRECEDENCE, Expr, Literal, POSTFIX_PRECEDENCE, Scope, UNARY_PRECEDENCE};
use crate::is_keyword;

/// Format a real so that it always reads back as a real
#[must_use]
pub fn format_real(value: f64) -> String {
    if value.is_nan() {
        "real(\"NaN\")".to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            "real(\"INF\")".to_string()
        } else {
            "-real(\"INF\")".to_string()
        }
    } else {
        // Debug output always carries a `.` or an exponent
        format!("{value:?}")
    }
}

/// Quote a string literal, escaping everything the lexer would interpret
#[must_use]
pub fn quote_string(value: &str) -> String {
    quote_with(value, '"')
}

/// Render an attribute name, quoting it when it is not a plain identifier
#[must_use]
pub fn quote_name(name: &str) -> String {
    let mut chars = name.chars();
    let plain = chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !is_keyword(name);
    if plain {
        name.to_string()
    } else {
        quote_with(name, '\'')
    }
}

fn quote_with(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\{:03o}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Error => f.write_str("error"),
            Self::Boolean(true) => f.write_str("true"),
            Self::Boolean(false) => f.write_str("false"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Real(value) => f.write_str(&format_real(*value)),
            Self::String(value) => f.write_str(&quote_string(value)),
        }
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("."),
            scope => f.write_str(scope.keyword()),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_expr(f, self, 0)
    }
}

fn write_expr(f: &mut Formatter<'_>, expr: &Expr, min_precedence: u8) -> fmt::Result {
    let parenthesize = expr.precedence() < min_precedence;
    if parenthesize {
        f.write_char('(')?;
    }
    match expr {
        Expr::Literal(literal) => write!(f, "{literal}")?,
        Expr::Attribute(name) => f.write_str(&quote_name(name))?,
        Expr::Scope(scope) => write!(f, "{scope}")?,
        Expr::Select { base, name } => {
            if !matches!(**base, Expr::Scope(Scope::Root)) {
                write_expr(f, base, POSTFIX_PRECEDENCE)?;
            }
            write!(f, ".{}", quote_name(name))?;
        }
        Expr::Subscript { base, index } => {
            write_expr(f, base, POSTFIX_PRECEDENCE)?;
            f.write_char('[')?;
            write_expr(f, index, 0)?;
            f.write_char(']')?;
        }
        Expr::List(items) => {
            if items.is_empty() {
                f.write_str("{}")?;
            } else {
                f.write_str("{ ")?;
                write_separated(f, items, ", ")?;
                f.write_str(" }")?;
            }
        }
        Expr::Record(attributes) => {
            if attributes.is_empty() {
                f.write_str("[]")?;
            } else {
                f.write_str("[ ")?;
                for (i, (name, value)) in attributes.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{} = ", quote_name(name))?;
                    write_expr(f, value, 0)?;
                }
                f.write_str(" ]")?;
            }
        }
        Expr::Unary { op, operand } => {
            f.write_str(op.symbol())?;
            write_expr(f, operand, UNARY_PRECEDENCE)?;
        }
        Expr::Binary { op, left, right } => {
            let precedence = op.precedence();
            write_expr(f, left, precedence)?;
            write!(f, " {} ", op.symbol())?;
            write_expr(f, right, precedence + 1)?;
        }
        Expr::Conditional {
            condition,
            then,
            otherwise,
        } => {
            write_expr(f, condition, CONDITIONAL_PRECEDENCE + 1)?;
            match then {
                Some(then) => {
                    f.write_str(" ? ")?;
                    write_expr(f, then, CONDITIONAL_PRECEDENCE)?;
                    f.write_str(" : ")?;
                }
                None => f.write_str(" ?: ")?,
            }
            write_expr(f, otherwise, CONDITIONAL_PRECEDENCE)?;
        }
        Expr::Call { name, args } => {
            write!(f, "{name}(")?;
            write_separated(f, args, ", ")?;
            f.write_char(')')?;
        }
    }
    if parenthesize {
        f.write_char(')')?;
    }
    Ok(())
}

fn write_separated(f: &mut Formatter<'_>, items: &[Expr], separator: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write_expr(f, item, 0)?;
    }
    Ok(())
}
