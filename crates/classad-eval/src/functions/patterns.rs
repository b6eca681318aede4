//! Regular expression matching and substitution

use regex::{Captures, Regex, RegexBuilder};
use tracing::debug;

use super::Registry;
use crate::evaluator::Evaluator;
use crate::value::Value;

pub(super) fn register(registry: &mut Registry) {
    registry.strict("regexp", regexp);
    registry.strict("regexps", regexps);
}

/// Compile `pattern` with option letters: `i` ignores case, `m` makes `^`
/// and `$` match at line breaks, `s` lets `.` match a newline
///
/// Other letters are ignored. Returns `None` for an invalid pattern.
pub(crate) fn build_regex(pattern: &str, options: &str) -> Option<Regex> {
    let mut builder = RegexBuilder::new(pattern);
    for option in options.chars() {
        match option.to_ascii_lowercase() {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            _ => continue,
        };
    }
    builder
        .build()
        .map_err(|error| debug!(%pattern, %error, "invalid regular expression"))
        .ok()
}

/// Split `(pattern, target, rest.., [options])` into string slices
fn string_args<'a>(args: &'a [Value], fixed: usize) -> Result<(Vec<&'a str>, &'a str), Value> {
    if args.len() != fixed && args.len() != fixed + 1 {
        return Err(Value::Error);
    }
    let mut strings = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            Value::String(text) => strings.push(text.as_str()),
            Value::Undefined => return Err(Value::Undefined),
            _ => return Err(Value::Error),
        }
    }
    let options = if strings.len() > fixed {
        strings.pop().unwrap_or_default()
    } else {
        ""
    };
    Ok((strings, options))
}

fn regexp(_: &Evaluator<'_>, args: &[Value]) -> Value {
    let (strings, options) = match string_args(args, 2) {
        Ok(parsed) => parsed,
        Err(value) => return value,
    };
    let [pattern, target] = strings.as_slice() else {
        return Value::Error;
    };
    build_regex(pattern, options).map_or(Value::Error, |regex| {
        Value::Boolean(regex.is_match(target))
    })
}

/// Replace the first match with `substitute`, then return just that replacement
///
/// `\0` in the substitute is the whole match and `\1`..`\9` are groups.
fn regexps(_: &Evaluator<'_>, args: &[Value]) -> Value {
    let (strings, options) = match string_args(args, 3) {
        Ok(parsed) => parsed,
        Err(value) => return value,
    };
    let [pattern, target, substitute] = strings.as_slice() else {
        return Value::Error;
    };
    let Some(regex) = build_regex(pattern, options) else {
        return Value::Error;
    };
    match regex.captures(target) {
        Some(captures) => Value::String(expand(&captures, substitute)),
        None => Value::String(String::new()),
    }
}

fn expand(captures: &Captures<'_>, substitute: &str) -> String {
    let mut result = String::with_capacity(substitute.len());
    let mut chars = substitute.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.peek().and_then(|next| next.to_digit(10)) {
            Some(group) => {
                chars.next();
                if let Some(matched) = captures.get(group as usize) {
                    result.push_str(matched.as_str());
                }
            }
            None => result.push(chars.next().unwrap_or('\\')),
        }
    }
    result
}
