//! LALRPOP-based parser for ClassAd expressions
//!
//! Uses a LALRPOP grammar fed by the logos lexer. Accepts a single
//! expression, a bracketed record, or an old-style ad of bare definitions.

use classad_ast::{ClassAdError, Expr, SourceMap, Span};
use classad_lexer::{Lexer, SpannedToken, Token};
use lalrpop_util::ParseError;

// Generated code is not held to the workspace lints
lalrpop_util::lalrpop_mod!(
    #[allow(clippy::all, clippy::pedantic, clippy::nursery, unused_imports)]
    grammar
);

// Literal decoding
pub mod string_utils;

use string_utils::LiteralError;

/// A literal decoding error together with the token it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedError {
    pub span: Span,
    pub error: LiteralError,
}

pub(crate) fn located(
    span: Span,
    error: LiteralError,
) -> ParseError<usize, SpannedToken, LocatedError> {
    ParseError::User {
        error: LocatedError { span, error },
    }
}

/// Parse a single expression or ad
///
/// # Errors
///
/// Returns `ClassAdError::Syntax` for lexical or grammatical errors
pub fn parse(input: &str) -> Result<Expr, ClassAdError> {
    Parser::new(input)?.parse()
}

/// Parse a ClassAd, bracketed or old-style, into its attribute definitions
///
/// # Errors
///
/// Returns `ClassAdError::Syntax` if the input is not a well-formed ad
pub fn parse_classad(input: &str) -> Result<Vec<(String, Expr)>, ClassAdError> {
    Parser::new(input)?.parse_classad()
}

pub struct Parser {
    input: String,
    source_map: SourceMap,
    filename: String,
    tokens: Vec<SpannedToken>,
}

impl Parser {
    /// Create a new parser for the given input
    ///
    /// # Errors
    ///
    /// Returns `ClassAdError` if there are lexical errors in the input
    pub fn new(input: &str) -> Result<Self, ClassAdError> {
        Self::new_with_filename(input, "<input>")
    }

    /// Create a new parser for the given input with a filename
    ///
    /// # Errors
    ///
    /// Returns `ClassAdError` if there are lexical errors in the input
    pub fn new_with_filename(input: &str, filename: &str) -> Result<Self, ClassAdError> {
        let source_map = SourceMap::new(input);

        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize();

        if let Some(token) = tokens.iter().find(|token| token.token == Token::Invalid) {
            return Err(ClassAdError::syntax(
                format!("Unexpected character: {}", token.text),
                token.span,
                &source_map,
                filename,
            ));
        }

        Ok(Self {
            input: input.to_string(),
            source_map,
            filename: filename.to_string(),
            tokens,
        })
    }

    /// Parse the input into an expression
    ///
    /// Old-style ads come back as `Expr::Record`.
    ///
    /// # Errors
    ///
    /// Returns `ClassAdError` if there are syntax errors during parsing
    pub fn parse(&self) -> Result<Expr, ClassAdError> {
        // Convert tokens to the format LALRPOP expects
        let lalrpop_tokens: Vec<Result<(usize, SpannedToken, usize), LocatedError>> = self
            .tokens
            .iter()
            .filter(|token| token.token != Token::Eof)
            .map(|token| Ok((token.span.start, token.clone(), token.span.end)))
            .collect();

        grammar::TopParser::new()
            .parse(lalrpop_tokens)
            .map_err(|err| self.syntax_error(err))
    }

    /// Parse the input as a ClassAd and return its definitions in source order
    ///
    /// # Errors
    ///
    /// Returns `ClassAdError` on syntax errors or when the input is an expression but not an ad
    pub fn parse_classad(&self) -> Result<Vec<(String, Expr)>, ClassAdError> {
        match self.parse()? {
            Expr::Record(definitions) => Ok(definitions),
            other => Err(ClassAdError::syntax(
                format!("expected a ClassAd, found expression `{other}`"),
                Span::new(0, self.input.len()),
                &self.source_map,
                &self.filename,
            )),
        }
    }

    fn syntax_error(&self, err: ParseError<usize, SpannedToken, LocatedError>) -> ClassAdError {
        let (message, span) = match err {
            ParseError::InvalidToken { location } => {
                ("invalid token".to_string(), Span::new(location, location))
            }
            ParseError::UnrecognizedEof { location, expected } => (
                format!("unexpected end of input{}", expected_suffix(&expected)),
                Span::new(location, location),
            ),
            ParseError::UnrecognizedToken {
                token: (start, token, end),
                expected,
            } => (
                format!("unexpected `{}`{}", token.text, expected_suffix(&expected)),
                Span::new(start, end),
            ),
            ParseError::ExtraToken {
                token: (start, token, end),
            } => (
                format!("unexpected trailing `{}`", token.text),
                Span::new(start, end),
            ),
            ParseError::User { error } => (error.error.to_string(), error.span),
        };
        ClassAdError::syntax(message, span, &self.source_map, &self.filename)
    }

    /// Get access to the source map for error reporting
    #[must_use]
    pub const fn source_map(&self) -> &SourceMap {
        &self.source_map
    }

    /// Get access to the filename
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Get access to the original input
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Get access to the tokens (useful for debugging)
    #[must_use]
    pub fn tokens(&self) -> &[SpannedToken] {
        &self.tokens
    }
}

fn expected_suffix(expected: &[String]) -> String {
    if expected.is_empty() {
        String::new()
    } else {
        format!(", expected one of {}", expected.join(", "))
    }
}
