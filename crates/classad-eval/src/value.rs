//! Results of evaluating ClassAd expressions

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

use classad_ast::{Expr, Literal};

use crate::classad::ClassAd;

/// A fully evaluated ClassAd value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Error,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(String),
    List(Vec<Value>),
    ClassAd(Rc<ClassAd>),
}

/// Integer or real operand after numeric promotion
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    Integer(i64),
    Real(f64),
}

impl Number {
    pub(crate) const fn as_f64(self) -> f64 {
        match self {
            Self::Integer(value) => value as f64,
            Self::Real(value) => value,
        }
    }

    pub(crate) fn compare(self, other: Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(left), Self::Integer(right)) => Some(left.cmp(&right)),
            (left, right) => left.as_f64().partial_cmp(&right.as_f64()),
        }
    }
}

impl From<Number> for Value {
    fn from(number: Number) -> Self {
        match number {
            Number::Integer(value) => Self::Integer(value),
            Number::Real(value) => Self::Real(value),
        }
    }
}

impl Value {
    /// Name of the value's type, as used in diagnostics
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Error => "error",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::ClassAd(_) => "classad",
        }
    }

    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    /// The boolean, if this is one
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Integers and reals as `f64`
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Real(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_classad(&self) -> Option<&ClassAd> {
        match self {
            Self::ClassAd(ad) => Some(ad),
            _ => None,
        }
    }

    /// Operand for arithmetic; booleans count as 0 and 1
    pub(crate) const fn to_number(&self) -> Option<Number> {
        match self {
            Self::Integer(value) => Some(Number::Integer(*value)),
            Self::Real(value) => Some(Number::Real(*value)),
            Self::Boolean(value) => Some(Number::Integer(*value as i64)),
            _ => None,
        }
    }

    /// Meta-equality (`=?=`): same type and same value, strings compared with case
    #[must_use]
    pub fn is_identical(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Error, Self::Error) => true,
            (Self::Boolean(left), Self::Boolean(right)) => left == right,
            (Self::Integer(left), Self::Integer(right)) => left == right,
            (Self::Real(left), Self::Real(right)) => left == right,
            (Self::String(left), Self::String(right)) => left == right,
            (Self::List(left), Self::List(right)) => {
                left.len() == right.len()
                    && left.iter().zip(right).all(|(l, r)| l.is_identical(r))
            }
            (Self::ClassAd(left), Self::ClassAd(right)) => left.same_attributes(right),
            _ => false,
        }
    }

    /// Turn the value back into an expression that evaluates to it
    #[must_use]
    pub fn to_expr(&self) -> Expr {
        match self {
            Self::Undefined => Expr::Literal(Literal::Undefined),
            Self::Error => Expr::Literal(Literal::Error),
            Self::Boolean(value) => Expr::boolean(*value),
            Self::Integer(value) => Expr::integer(*value),
            Self::Real(value) => Expr::real(*value),
            Self::String(value) => Expr::string(value.as_str()),
            Self::List(items) => Expr::List(items.iter().map(Self::to_expr).collect()),
            Self::ClassAd(ad) => Expr::Record(
                ad.iter()
                    .map(|(name, expr)| (name.to_string(), expr.clone()))
                    .collect(),
            ),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClassAd(ad) => write!(f, "{ad}"),
            other => write!(f, "{}", other.to_expr()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::List(items)
    }
}

impl From<ClassAd> for Value {
    fn from(ad: ClassAd) -> Self {
        Self::ClassAd(Rc::new(ad))
    }
}
