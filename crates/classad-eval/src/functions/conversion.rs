//! Type predicates and conversions

use super::{Registry, stringify};
use crate::evaluator::Evaluator;
use crate::value::Value;

pub(super) fn register(registry: &mut Registry) {
    registry.strict("isUndefined", |_, args| type_check(args, Value::is_undefined));
    registry.strict("isError", |_, args| type_check(args, Value::is_error));
    registry.strict("isString", |_, args| {
        type_check(args, |value| matches!(value, Value::String(_)))
    });
    registry.strict("isInteger", |_, args| {
        type_check(args, |value| matches!(value, Value::Integer(_)))
    });
    registry.strict("isReal", |_, args| {
        type_check(args, |value| matches!(value, Value::Real(_)))
    });
    registry.strict("isBoolean", |_, args| {
        type_check(args, |value| matches!(value, Value::Boolean(_)))
    });
    registry.strict("isList", |_, args| {
        type_check(args, |value| matches!(value, Value::List(_)))
    });
    registry.strict("isClassAd", |_, args| {
        type_check(args, |value| matches!(value, Value::ClassAd(_)))
    });
    registry.strict("int", int);
    registry.strict("real", real);
    registry.strict("string", string);
    registry.strict("bool", boolean);
}

fn type_check(args: &[Value], predicate: fn(&Value) -> bool) -> Value {
    match args {
        [value] => Value::Boolean(predicate(value)),
        _ => Value::Error,
    }
}

fn int(_: &Evaluator<'_>, args: &[Value]) -> Value {
    let [value] = args else {
        return Value::Error;
    };
    to_integer(value)
}

/// `int()` semantics: reals truncate toward zero, strings must hold an integer
pub(crate) fn to_integer(value: &Value) -> Value {
    match value {
        Value::Integer(number) => Value::Integer(*number),
        Value::Boolean(flag) => Value::Integer(i64::from(*flag)),
        Value::Real(number) => real_to_integer(number.trunc()),
        Value::String(text) => text
            .trim()
            .parse::<i64>()
            .map_or(Value::Error, Value::Integer),
        _ => Value::Error,
    }
}

/// An integral real as an integer, `ERROR` when it does not fit
pub(crate) fn real_to_integer(number: f64) -> Value {
    // i64::MAX rounds up to 2^63 as a float, which is already out of range
    if number.is_finite() && number >= i64::MIN as f64 && number < i64::MAX as f64 {
        Value::Integer(number as i64)
    } else {
        Value::Error
    }
}

fn real(_: &Evaluator<'_>, args: &[Value]) -> Value {
    let [value] = args else {
        return Value::Error;
    };
    to_real(value)
}

/// `real()` semantics: integers widen, strings must hold a number
pub(crate) fn to_real(value: &Value) -> Value {
    match value {
        Value::Real(number) => Value::Real(*number),
        Value::Integer(number) => Value::Real(*number as f64),
        Value::Boolean(flag) => Value::Real(if *flag { 1.0 } else { 0.0 }),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map_or(Value::Error, Value::Real),
        _ => Value::Error,
    }
}

fn string(_: &Evaluator<'_>, args: &[Value]) -> Value {
    let [value] = args else {
        return Value::Error;
    };
    stringify(value).map_or(Value::Error, Value::String)
}

fn boolean(_: &Evaluator<'_>, args: &[Value]) -> Value {
    let [value] = args else {
        return Value::Error;
    };
    match value {
        Value::Boolean(flag) => Value::Boolean(*flag),
        Value::Integer(number) => Value::Boolean(*number != 0),
        Value::Real(number) => Value::Boolean(*number != 0.0),
        Value::String(text) if text.eq_ignore_ascii_case("true") => Value::Boolean(true),
        Value::String(text) if text.eq_ignore_ascii_case("false") => Value::Boolean(false),
        Value::Undefined => Value::Undefined,
        _ => Value::Error,
    }
}
