//! Lexical analysis for ClassAd expressions
//!
//! Tokenizes the ClassAd language using logos. Keywords are case-insensitive,
//! whitespace and comments are skipped, literal decoding is left to the parser.

use classad_ast::Span;
use logos::Logos;

/// ClassAd tokens
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Token {
    // Keywords
    #[token("true", ignore(ascii_case))]
    True,

    #[token("false", ignore(ascii_case))]
    False,

    #[token("undefined", ignore(ascii_case))]
    Undefined,

    #[token("error", ignore(ascii_case))]
    Error,

    #[token("is", ignore(ascii_case))]
    Is,

    #[token("isnt", ignore(ascii_case))]
    Isnt,

    #[token("my", ignore(ascii_case))]
    My,

    #[token("target", ignore(ascii_case))]
    Target,

    /// `parent`, or its older spelling `super`
    #[token("parent", ignore(ascii_case))]
    #[token("super", ignore(ascii_case))]
    Parent,

    /// Attribute or function name
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,

    /// Attribute name in single quotes: 'Has Space'
    #[regex(r"'([^'\\]|\\.)*'")]
    QuotedName,

    /// String literal in double quotes
    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    /// Decimal, octal (leading 0) or hexadecimal (0x) integer
    #[regex(r"[0-9]+")]
    #[regex(r"0[xX][0-9a-fA-F]+")]
    Integer,

    /// Floating point literal
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    Real,

    // Punctuation
    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[token("[")]
    LeftBracket,

    #[token("]")]
    RightBracket,

    #[token("{")]
    LeftBrace,

    #[token("}")]
    RightBrace,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token(".")]
    Dot,

    #[token("?")]
    Question,

    #[token(":")]
    Colon,

    /// Attribute definition (=)
    #[token("=")]
    Assign,

    // Operators
    #[token("||")]
    OrOr,

    #[token("&&")]
    AndAnd,

    #[token("|")]
    Pipe,

    #[token("^")]
    Caret,

    #[token("&")]
    Ampersand,

    #[token("==")]
    EqualEqual,

    #[token("!=")]
    NotEqual,

    /// Meta-equal (=?=), same as `is`
    #[token("=?=")]
    MetaEqual,

    /// Meta-not-equal (=!=), same as `isnt`
    #[token("=!=")]
    MetaNotEqual,

    #[token("<")]
    Less,

    #[token("<=")]
    LessEqual,

    #[token(">")]
    Greater,

    #[token(">=")]
    GreaterEqual,

    #[token("<<")]
    ShiftLeft,

    #[token(">>")]
    ShiftRight,

    #[token(">>>")]
    UnsignedShiftRight,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("!")]
    Bang,

    #[token("~")]
    Tilde,

    /// Whitespace (ignored)
    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    Whitespace,

    /// Line comment (ignored)
    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    /// Block comment (ignored); an unterminated one is an error
    #[token("/*", block_comment)]
    BlockComment,

    /// End of input
    Eof,

    /// Lexer error
    Invalid,
}

/// Consume a block comment up to and including the closing `*/`
fn block_comment(lex: &mut logos::Lexer<'_, Token>) -> logos::FilterResult<(), ()> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            logos::FilterResult::Skip
        }
        None => {
            lex.bump(lex.remainder().len());
            logos::FilterResult::Error(())
        }
    }
}

/// Token with location information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
    pub text: String,
}

/// Lexer that produces tokens with spans
pub struct Lexer<'input> {
    lexer: logos::Lexer<'input, Token>,
    input: &'input str,
}

impl<'input> Lexer<'input> {
    #[must_use]
    pub fn new(input: &'input str) -> Self {
        Self {
            lexer: Token::lexer(input),
            input,
        }
    }

    /// Get the next token with span information
    pub fn next_token(&mut self) -> SpannedToken {
        match self.lexer.next() {
            Some(result) => {
                let span = self.lexer.span();
                let text = self.input[span.clone()].to_string();
                SpannedToken {
                    token: result.unwrap_or(Token::Invalid),
                    span: Span::new(span.start, span.end),
                    text,
                }
            }
            None => SpannedToken {
                token: Token::Eof,
                span: Span::new(self.input.len(), self.input.len()),
                text: String::new(),
            },
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Vec<SpannedToken> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.token == Token::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}
