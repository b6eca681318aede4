//! List aggregates and membership

use classad_ast::BinaryOp;

use super::Registry;
use crate::evaluator::Evaluator;
use crate::operators;
use crate::value::{Number, Value};

pub(super) fn register(registry: &mut Registry) {
    registry.strict("sum", |_, args| aggregate(args, Aggregate::Sum));
    registry.strict("avg", |_, args| aggregate(args, Aggregate::Avg));
    registry.strict("min", |_, args| aggregate(args, Aggregate::Min));
    registry.strict("max", |_, args| aggregate(args, Aggregate::Max));
    registry.strict("member", member);
    registry.strict("identicalMember", identical_member);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Aggregate {
    Sum,
    Avg,
    Min,
    Max,
}

impl Aggregate {
    /// Fold numbers: integer results while every item is an integer
    ///
    /// An empty input sums to 0, averages to 0.0 and has no minimum or maximum.
    pub(crate) fn apply(self, numbers: &[Number]) -> Value {
        let Some((first, rest)) = numbers.split_first() else {
            return match self {
                Self::Sum => Value::Integer(0),
                Self::Avg => Value::Real(0.0),
                Self::Min | Self::Max => Value::Undefined,
            };
        };
        match self {
            Self::Sum => rest.iter().fold(*first, |total, n| add(total, *n)).into(),
            Self::Avg => {
                let total = numbers.iter().map(|n| n.as_f64()).sum::<f64>();
                Value::Real(total / numbers.len() as f64)
            }
            Self::Min | Self::Max => {
                let all_integers = numbers.iter().all(|n| matches!(n, Number::Integer(_)));
                let best = rest.iter().fold(*first, |best, n| {
                    let ordering = n.compare(best);
                    let better = if self == Self::Min {
                        ordering.is_some_and(|o| o.is_lt())
                    } else {
                        ordering.is_some_and(|o| o.is_gt())
                    };
                    if better { *n } else { best }
                });
                if all_integers {
                    best.into()
                } else {
                    Value::Real(best.as_f64())
                }
            }
        }
    }
}

fn add(left: Number, right: Number) -> Number {
    match (left, right) {
        (Number::Integer(left), Number::Integer(right)) => Number::Integer(left.wrapping_add(right)),
        (left, right) => Number::Real(left.as_f64() + right.as_f64()),
    }
}

fn aggregate(args: &[Value], aggregate: Aggregate) -> Value {
    let [list] = args else {
        return Value::Error;
    };
    let items = match list {
        Value::List(items) => items,
        Value::Undefined => return Value::Undefined,
        _ => return Value::Error,
    };
    let numbers: Option<Vec<Number>> = items
        .iter()
        .map(|item| match item {
            Value::Integer(number) => Some(Number::Integer(*number)),
            Value::Real(number) => Some(Number::Real(*number)),
            _ => None,
        })
        .collect();
    numbers.map_or(Value::Error, |numbers| aggregate.apply(&numbers))
}

/// `x` equals some item under `==`
fn member(_: &Evaluator<'_>, args: &[Value]) -> Value {
    let [needle, list] = args else {
        return Value::Error;
    };
    match (needle, list) {
        (Value::Error, _) | (_, Value::Error) => Value::Error,
        (Value::Undefined, _) | (_, Value::Undefined) => Value::Undefined,
        (Value::List(_) | Value::ClassAd(_), _) => Value::Error,
        (needle, Value::List(items)) => Value::Boolean(items.iter().any(|item| {
            operators::binary(BinaryOp::Equal, needle, item) == Value::Boolean(true)
        })),
        _ => Value::Error,
    }
}

/// `x` is identical (`=?=`) to some item
fn identical_member(_: &Evaluator<'_>, args: &[Value]) -> Value {
    let [needle, list] = args else {
        return Value::Error;
    };
    match list {
        Value::List(items) => Value::Boolean(items.iter().any(|item| needle.is_identical(item))),
        Value::Undefined => Value::Undefined,
        _ => Value::Error,
    }
}
