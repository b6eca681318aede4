//! Numeric functions

use rand::Rng;

use super::Registry;
use super::conversion::{real_to_integer, to_real};
use crate::evaluator::Evaluator;
use crate::value::{Number, Value};

pub(super) fn register(registry: &mut Registry) {
    registry.strict("floor", |_, args| rounded(args, f64::floor));
    registry.strict("ceiling", |_, args| rounded(args, f64::ceil));
    registry.strict("round", |_, args| rounded(args, f64::round_ties_even));
    registry.strict("pow", pow);
    registry.strict("quantize", quantize);
    registry.strict("random", random);
}

/// Integers pass through, anything else goes through `real()` and `round`
fn rounded(args: &[Value], round: fn(f64) -> f64) -> Value {
    let [value] = args else {
        return Value::Error;
    };
    if let Value::Integer(number) = value {
        return Value::Integer(*number);
    }
    match to_real(value) {
        Value::Real(number) => real_to_integer(round(number)),
        _ => Value::Error,
    }
}

fn number_arg(value: &Value) -> Option<Number> {
    match value {
        Value::Integer(number) => Some(Number::Integer(*number)),
        Value::Real(number) => Some(Number::Real(*number)),
        _ => None,
    }
}

fn pow(_: &Evaluator<'_>, args: &[Value]) -> Value {
    let [base, exponent] = args else {
        return Value::Error;
    };
    let (Some(base), Some(exponent)) = (number_arg(base), number_arg(exponent)) else {
        return Value::Error;
    };
    match (base, exponent) {
        (Number::Integer(base), Number::Integer(exponent)) if exponent >= 0 => {
            u32::try_from(exponent)
                .ok()
                .and_then(|exponent| base.checked_pow(exponent))
                .map_or(Value::Error, Value::Integer)
        }
        (base, exponent) => Value::Real(base.as_f64().powf(exponent.as_f64())),
    }
}

/// Smallest multiple of `b` that is at least `a`, typed like `b`
///
/// With a list for `b`, the first member at least `a`, or failing that a
/// multiple of the last member.
fn quantize(_: &Evaluator<'_>, args: &[Value]) -> Value {
    let [a, b] = args else {
        return Value::Error;
    };
    let Some(a) = number_arg(a) else {
        return Value::Error;
    };
    match b {
        Value::List(items) => {
            for item in items {
                let Some(candidate) = number_arg(item) else {
                    return Value::Error;
                };
                if candidate.compare(a).is_some_and(|ordering| ordering.is_ge()) {
                    return candidate.into();
                }
            }
            items
                .last()
                .and_then(number_arg)
                .map_or(Value::Error, |last| quantize_by(a, last))
        }
        other => number_arg(other).map_or(Value::Error, |b| quantize_by(a, b)),
    }
}

fn quantize_by(a: Number, b: Number) -> Value {
    let divisor = b.as_f64();
    if divisor == 0.0 {
        return Value::Error;
    }
    let multiples = (a.as_f64() / divisor).ceil();
    match b {
        Number::Integer(b) => match real_to_integer(multiples) {
            Value::Integer(multiples) => multiples
                .checked_mul(b)
                .map_or(Value::Error, Value::Integer),
            other => other,
        },
        Number::Real(b) => Value::Real(multiples * b),
    }
}

/// Uniform draw from `[0, x)`; `random()` is `random(1.0)`
fn random(_: &Evaluator<'_>, args: &[Value]) -> Value {
    let bound = match args {
        [] => Value::Real(1.0),
        [bound] => bound.clone(),
        _ => return Value::Error,
    };
    let mut rng = rand::thread_rng();
    match bound {
        Value::Integer(bound) if bound > 0 => Value::Integer(rng.gen_range(0..bound)),
        Value::Real(bound) if bound > 0.0 && bound.is_finite() => {
            Value::Real(rng.gen_range(0.0..bound))
        }
        _ => Value::Error,
    }
}
