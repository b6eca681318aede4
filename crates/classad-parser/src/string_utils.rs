//! Literal decoding for the ClassAd parser
//!
//! Turns the raw text of string, quoted-name and number tokens into values.

/// Problems found while decoding a literal token
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LiteralError {
    #[error("invalid escape sequence `{0}`")]
    InvalidEscape(String),

    #[error("integer literal `{0}` does not fit in 64 bits")]
    IntegerOutOfRange(String),

    #[error("invalid octal literal `{0}`")]
    InvalidOctal(String),

    #[error("invalid real literal `{0}`")]
    InvalidReal(String),

    #[error("attribute name must not be empty")]
    EmptyName,
}

/// Decode a double-quoted string literal
///
/// # Errors
///
/// Returns `LiteralError::InvalidEscape` for unknown escape sequences
pub fn unquote_string(text: &str) -> Result<String, LiteralError> {
    unescape(strip_quotes(text, '"'))
}

/// Decode a single-quoted attribute name
///
/// # Errors
///
/// Returns `LiteralError` for unknown escapes or an empty name
pub fn unquote_name(text: &str) -> Result<String, LiteralError> {
    let name = unescape(strip_quotes(text, '\''))?;
    if name.is_empty() {
        return Err(LiteralError::EmptyName);
    }
    Ok(name)
}

fn strip_quotes(text: &str, quote: char) -> &str {
    text.strip_prefix(quote)
        .and_then(|inner| inner.strip_suffix(quote))
        .unwrap_or(text)
}

/// Expand backslash escapes: `\n \t \b \r \f \\ \" \'` and octal `\o`, `\oo`, `\[0-3]oo`
///
/// # Errors
///
/// Returns `LiteralError::InvalidEscape` for anything else after a backslash
pub fn unescape(body: &str) -> Result<String, LiteralError> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let Some(escaped) = chars.next() else {
            return Err(LiteralError::InvalidEscape("\\".to_string()));
        };
        match escaped {
            'n' | 'N' => out.push('\n'),
            't' | 'T' => out.push('\t'),
            'b' | 'B' => out.push('\u{8}'),
            'r' | 'R' => out.push('\r'),
            'f' | 'F' => out.push('\u{c}'),
            '\\' | '"' | '\'' => out.push(escaped),
            '0'..='7' => {
                // A leading 0-3 allows three digits, 4-7 only two
                let max_digits = if escaped <= '3' { 3 } else { 2 };
                let mut value = escaped.to_digit(8).unwrap_or_default();
                let mut digits = 1;
                while digits < max_digits {
                    match chars.peek().and_then(|next| next.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                            digits += 1;
                        }
                        None => break,
                    }
                }
                let decoded = char::from_u32(value)
                    .ok_or_else(|| LiteralError::InvalidEscape(format!("\\{value:o}")))?;
                out.push(decoded);
            }
            other => return Err(LiteralError::InvalidEscape(format!("\\{other}"))),
        }
    }

    Ok(out)
}

/// Parse an integer literal: decimal, `0`-prefixed octal or `0x` hexadecimal
///
/// # Errors
///
/// Returns `LiteralError` when the literal overflows or has non-octal digits after a leading 0
pub fn parse_integer(text: &str) -> Result<i64, LiteralError> {
    let (digits, radix) = if let Some(hex) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        (hex, 16)
    } else if text.len() > 1 && text.starts_with('0') {
        if text.chars().any(|c| c == '8' || c == '9') {
            return Err(LiteralError::InvalidOctal(text.to_string()));
        }
        (&text[1..], 8)
    } else {
        (text, 10)
    };

    i64::from_str_radix(digits, radix).map_err(|_| LiteralError::IntegerOutOfRange(text.to_string()))
}

/// Parse a real literal
///
/// # Errors
///
/// Returns `LiteralError::InvalidReal` if the text is not a number
pub fn parse_real(text: &str) -> Result<f64, LiteralError> {
    text.parse::<f64>()
        .map_err(|_| LiteralError::InvalidReal(text.to_string()))
}
