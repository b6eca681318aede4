//! String functions

use std::cmp::Ordering;

use super::{Registry, list_of_strings, string_arg, stringify};
use crate::evaluator::Evaluator;
use crate::operators::compare_ignore_case;
use crate::value::Value;

pub(super) fn register(registry: &mut Registry) {
    registry.strict("strcat", strcat);
    registry.strict("join", join);
    registry.strict("substr", substr);
    registry.strict("strcmp", |_, args| compare(args, |left, right| left.cmp(right)));
    registry.strict("stricmp", |_, args| compare(args, compare_ignore_case));
    registry.strict("toUpper", |_, args| map_string(args, str::to_uppercase));
    registry.strict("toLower", |_, args| map_string(args, str::to_lowercase));
    registry.strict("size", size);
    registry.strict("split", split);
    registry.strict("splitUserName", |_, args| split_at_sign(args, false));
    registry.strict("splitSlotName", |_, args| split_at_sign(args, true));
}

fn strcat(_: &Evaluator<'_>, args: &[Value]) -> Value {
    args.iter()
        .map(stringify)
        .collect::<Option<String>>()
        .map_or(Value::Error, Value::String)
}

fn join(_: &Evaluator<'_>, args: &[Value]) -> Value {
    let (separator, items): (Option<String>, &[Value]) = match args {
        [] => return Value::Error,
        [Value::List(items)] => (None, items.as_slice()),
        [separator, Value::List(items)] => (stringify(separator), items.as_slice()),
        [separator, rest @ ..] => (stringify(separator), rest),
    };
    if args.len() > 1 && separator.is_none() {
        return Value::Error;
    }
    let Some(parts) = items.iter().map(stringify).collect::<Option<Vec<_>>>() else {
        return Value::Error;
    };
    Value::String(parts.join(separator.as_deref().unwrap_or_default()))
}

/// Substring by character offset and length; negative values count from the end
fn substr(_: &Evaluator<'_>, args: &[Value]) -> Value {
    let (text, offset, length) = match args {
        [Value::String(text), Value::Integer(offset)] => (text, *offset, None),
        [Value::String(text), Value::Integer(offset), Value::Integer(length)] => {
            (text, *offset, Some(*length))
        }
        [Value::Undefined, ..] => return Value::Undefined,
        _ => return Value::Error,
    };

    let chars: Vec<char> = text.chars().collect();
    let total = i64::try_from(chars.len()).unwrap_or(i64::MAX);
    let start = if offset < 0 { total + offset } else { offset };
    let start = start.clamp(0, total);
    let end = match length {
        None => total,
        Some(length) if length < 0 => total + length,
        Some(length) => start.saturating_add(length).min(total),
    };
    if end <= start {
        return Value::String(String::new());
    }
    // Both bounds are within 0..=total here
    let (start, end) = (start as usize, end as usize);
    Value::String(chars[start..end].iter().collect())
}

fn compare(args: &[Value], order: fn(&str, &str) -> Ordering) -> Value {
    let [left, right] = args else {
        return Value::Error;
    };
    let (Some(left), Some(right)) = (stringify(left), stringify(right)) else {
        return Value::Error;
    };
    Value::Integer(match order(&left, &right) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    })
}

fn map_string(args: &[Value], convert: fn(&str) -> String) -> Value {
    let [value] = args else {
        return Value::Error;
    };
    stringify(value).map_or(Value::Error, |text| Value::String(convert(&text)))
}

/// Character count of the string form; element count for lists and ads
fn size(_: &Evaluator<'_>, args: &[Value]) -> Value {
    let [value] = args else {
        return Value::Error;
    };
    let count = match value {
        Value::List(items) => items.len(),
        Value::ClassAd(ad) => ad.len(),
        other => match stringify(other) {
            Some(text) => text.chars().count(),
            None => return Value::Error,
        },
    };
    i64::try_from(count).map_or(Value::Error, Value::Integer)
}

fn split(_: &Evaluator<'_>, args: &[Value]) -> Value {
    let (text, delimiters) = match args {
        [text] => (text, None),
        [text, delimiters] => (text, Some(delimiters)),
        _ => return Value::Error,
    };
    let text = match string_arg(text) {
        Ok(text) => text,
        Err(value) => return value,
    };
    match delimiters {
        None => list_of_strings(text.split_whitespace()),
        Some(Value::String(delimiters)) => list_of_strings(
            text.split(|c: char| delimiters.contains(c))
                .filter(|piece| !piece.is_empty()),
        ),
        Some(_) => Value::Error,
    }
}

/// Split `name@host`; without an `@` the name lands on the host side for slots
fn split_at_sign(args: &[Value], slot: bool) -> Value {
    let [name] = args else {
        return Value::Error;
    };
    let name = match string_arg(name) {
        Ok(name) => name,
        Err(value) => return value,
    };
    let (before, after) = match name.split_once('@') {
        Some(parts) => parts,
        None if slot => ("", name),
        None => (name, ""),
    };
    list_of_strings([before, after])
}
