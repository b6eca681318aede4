//! Operator semantics over evaluated values
//!
//! `ERROR` wins over `UNDEFINED`, and both propagate through everything
//! except the logical operators, `=?=` and `=!=`.

use std::cmp::Ordering;

use classad_ast::{BinaryOp, UnaryOp};

use crate::value::{Number, Value};

/// Three-valued truth plus `ERROR`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Truth {
    True,
    False,
    Undefined,
    Error,
}

/// Interpret a value as a condition; numbers are true when non-zero
pub(crate) fn truth(value: &Value) -> Truth {
    match value {
        Value::Boolean(true) => Truth::True,
        Value::Boolean(false) => Truth::False,
        Value::Integer(number) => bool_truth(*number != 0),
        Value::Real(number) => bool_truth(*number != 0.0),
        Value::Undefined => Truth::Undefined,
        _ => Truth::Error,
    }
}

const fn bool_truth(value: bool) -> Truth {
    if value { Truth::True } else { Truth::False }
}

/// `&&` with the right side only computed when needed
pub(crate) fn and(left: Truth, right: impl FnOnce() -> Truth) -> Value {
    match left {
        Truth::False => return Value::Boolean(false),
        Truth::Error => return Value::Error,
        Truth::True | Truth::Undefined => {}
    }
    match (left, right()) {
        (_, Truth::Error) => Value::Error,
        (_, Truth::False) => Value::Boolean(false),
        (Truth::Undefined, _) | (_, Truth::Undefined) => Value::Undefined,
        _ => Value::Boolean(true),
    }
}

/// `||` with the right side only computed when needed
pub(crate) fn or(left: Truth, right: impl FnOnce() -> Truth) -> Value {
    match left {
        Truth::True => return Value::Boolean(true),
        Truth::Error => return Value::Error,
        Truth::False | Truth::Undefined => {}
    }
    match (left, right()) {
        (_, Truth::Error) => Value::Error,
        (_, Truth::True) => Value::Boolean(true),
        (Truth::Undefined, _) | (_, Truth::Undefined) => Value::Undefined,
        _ => Value::Boolean(false),
    }
}

/// Apply a unary operator
pub fn unary(op: UnaryOp, operand: &Value) -> Value {
    match (op, operand) {
        (_, Value::Error) => Value::Error,
        (_, Value::Undefined) => Value::Undefined,
        (UnaryOp::Plus, value) => value.to_number().map_or(Value::Error, Value::from),
        (UnaryOp::Minus, value) => match value.to_number() {
            Some(Number::Integer(number)) => Value::Integer(number.wrapping_neg()),
            Some(Number::Real(number)) => Value::Real(-number),
            None => Value::Error,
        },
        (UnaryOp::Not, Value::Boolean(value)) => Value::Boolean(!value),
        (UnaryOp::Not, Value::Integer(number)) => Value::Boolean(*number == 0),
        (UnaryOp::Not, Value::Real(number)) => Value::Boolean(*number == 0.0),
        (UnaryOp::BitNot, Value::Integer(number)) => Value::Integer(!number),
        (UnaryOp::BitNot, Value::Boolean(value)) => Value::Boolean(!value),
        _ => Value::Error,
    }
}

/// Apply a binary operator to two evaluated operands
pub fn binary(op: BinaryOp, left: &Value, right: &Value) -> Value {
    match op {
        BinaryOp::And => and(truth(left), || truth(right)),
        BinaryOp::Or => or(truth(left), || truth(right)),
        BinaryOp::Is => Value::Boolean(left.is_identical(right)),
        BinaryOp::IsNot => Value::Boolean(!left.is_identical(right)),
        _ if left.is_error() || right.is_error() => Value::Error,
        _ if left.is_undefined() || right.is_undefined() => Value::Undefined,
        BinaryOp::Add
        | BinaryOp::Subtract
        | BinaryOp::Multiply
        | BinaryOp::Divide
        | BinaryOp::Modulo => arithmetic(op, left, right),
        BinaryOp::Equal
        | BinaryOp::NotEqual
        | BinaryOp::Less
        | BinaryOp::LessEqual
        | BinaryOp::Greater
        | BinaryOp::GreaterEqual => comparison(op, left, right),
        BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor => bitwise(op, left, right),
        BinaryOp::ShiftLeft | BinaryOp::ShiftRight | BinaryOp::UnsignedShiftRight => {
            shift(op, left, right)
        }
    }
}

fn arithmetic(op: BinaryOp, left: &Value, right: &Value) -> Value {
    let (Some(left), Some(right)) = (left.to_number(), right.to_number()) else {
        return Value::Error;
    };
    match (left, right) {
        (Number::Integer(left), Number::Integer(right)) => integer_arithmetic(op, left, right),
        (left, right) => real_arithmetic(op, left.as_f64(), right.as_f64()),
    }
}

fn integer_arithmetic(op: BinaryOp, left: i64, right: i64) -> Value {
    match op {
        BinaryOp::Add => Value::Integer(left.wrapping_add(right)),
        BinaryOp::Subtract => Value::Integer(left.wrapping_sub(right)),
        BinaryOp::Multiply => Value::Integer(left.wrapping_mul(right)),
        BinaryOp::Divide if right != 0 => Value::Integer(left.wrapping_div(right)),
        BinaryOp::Modulo if right != 0 => Value::Integer(left.wrapping_rem(right)),
        _ => Value::Error,
    }
}

fn real_arithmetic(op: BinaryOp, left: f64, right: f64) -> Value {
    match op {
        BinaryOp::Add => Value::Real(left + right),
        BinaryOp::Subtract => Value::Real(left - right),
        BinaryOp::Multiply => Value::Real(left * right),
        BinaryOp::Divide if right != 0.0 => Value::Real(left / right),
        BinaryOp::Modulo if right != 0.0 => Value::Real(left % right),
        _ => Value::Error,
    }
}

/// Order two strings ignoring case
pub(crate) fn compare_ignore_case(left: &str, right: &str) -> Ordering {
    left.chars()
        .flat_map(char::to_lowercase)
        .cmp(right.chars().flat_map(char::to_lowercase))
}

fn comparison(op: BinaryOp, left: &Value, right: &Value) -> Value {
    let ordering = match (left, right) {
        (Value::String(left), Value::String(right)) => Some(compare_ignore_case(left, right)),
        _ => match (left.to_number(), right.to_number()) {
            (Some(left), Some(right)) => left.compare(right),
            _ => return Value::Error,
        },
    };
    // NaN is unordered: only `!=` holds
    let Some(ordering) = ordering else {
        return Value::Boolean(op == BinaryOp::NotEqual);
    };
    Value::Boolean(match op {
        BinaryOp::Equal => ordering == Ordering::Equal,
        BinaryOp::NotEqual => ordering != Ordering::Equal,
        BinaryOp::Less => ordering == Ordering::Less,
        BinaryOp::LessEqual => ordering != Ordering::Greater,
        BinaryOp::Greater => ordering == Ordering::Greater,
        BinaryOp::GreaterEqual => ordering != Ordering::Less,
        _ => return Value::Error,
    })
}

fn bitwise(op: BinaryOp, left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Integer(left), Value::Integer(right)) => Value::Integer(match op {
            BinaryOp::BitAnd => left & right,
            BinaryOp::BitOr => left | right,
            _ => left ^ right,
        }),
        (Value::Boolean(left), Value::Boolean(right)) => Value::Boolean(match op {
            BinaryOp::BitAnd => left & right,
            BinaryOp::BitOr => left | right,
            _ => left ^ right,
        }),
        _ => Value::Error,
    }
}

fn shift(op: BinaryOp, left: &Value, right: &Value) -> Value {
    let (Value::Integer(left), Value::Integer(right)) = (left, right) else {
        return Value::Error;
    };
    // Shift counts wrap at the word size
    let amount = (right & 63) as u32;
    Value::Integer(match op {
        BinaryOp::ShiftLeft => left.wrapping_shl(amount),
        BinaryOp::ShiftRight => left.wrapping_shr(amount),
        _ => ((*left as u64) >> amount) as i64,
    })
}
