//! Abstract Syntax Tree definitions for ClassAd expressions
//!
//! Holds the expression tree produced by the parser, its canonical textual
//! form, and the error type shared by every crate in the workspace.

pub mod expr;
pub mod unparse;

pub use expr::{BinaryOp, Expr, Literal, Scope, UnaryOp};
pub use unparse::{format_real, quote_name, quote_string};

/// Words that are keywords of the language and must be quoted when used as names.
pub const KEYWORDS: &[&str] = &[
    "true",
    "false",
    "undefined",
    "error",
    "is",
    "isnt",
    "my",
    "target",
    "parent",
    "super",
];

/// Attribute names a ClassAd refuses to store.
pub const RESERVED_NAMES: &[&str] = &["error", "false", "is", "isnt", "parent", "true", "undefined"];

/// Check whether `name` is reserved (case-insensitive)
#[must_use]
pub fn is_reserved_name(name: &str) -> bool {
    RESERVED_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
}

/// Check whether `name` is a keyword (case-insensitive)
#[must_use]
pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.iter().any(|keyword| keyword.eq_ignore_ascii_case(name))
}

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }
}

/// Line and column position in source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Convert byte span to line/column positions
pub struct SourceMap {
    line_starts: Vec<usize>,
}

impl SourceMap {
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (pos, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(pos + 1);
            }
        }
        Self { line_starts }
    }

    #[must_use]
    pub fn position(&self, byte_offset: usize) -> Position {
        match self.line_starts.binary_search(&byte_offset) {
            Ok(line) => Position::new(line + 1, 1),
            Err(line) => {
                let line_start = self.line_starts[line - 1];
                Position::new(line, byte_offset - line_start + 1)
            }
        }
    }

    #[must_use]
    pub fn span_to_positions(&self, span: Span) -> (Position, Position) {
        (self.position(span.start), self.position(span.end))
    }
}

/// Error types with location information
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassAdError {
    #[error("ClassAd:{filename}:{line}:{column}: ERR_SYNTAX: {message}")]
    Syntax {
        message: String,
        span: Span,
        filename: String,
        line: usize,
        column: usize,
    },

    #[error("ClassAd: ERR_RESERVED_NAME: {name} is a reserved name")]
    ReservedName { name: String },
}

impl ClassAdError {
    #[must_use]
    pub fn syntax(message: String, span: Span, source_map: &SourceMap, filename: &str) -> Self {
        let pos = source_map.position(span.start);
        Self::Syntax {
            message,
            span,
            filename: filename.to_string(),
            line: pos.line,
            column: pos.column,
        }
    }

    #[must_use]
    pub fn reserved_name(name: &str) -> Self {
        Self::ReservedName {
            name: name.to_string(),
        }
    }

    /// Location of the error, if it came from source text
    #[must_use]
    pub const fn span(&self) -> Option<Span> {
        match self {
            Self::Syntax { span, .. } => Some(*span),
            Self::ReservedName { .. } => None,
        }
    }
}
