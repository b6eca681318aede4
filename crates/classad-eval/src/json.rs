//! JSON rendering of ClassAds
//!
//! Literal attributes map onto JSON directly. Anything that still needs
//! evaluation is kept as a string of the form `/Expr(<expression>)/`.

use classad_ast::{Expr, Literal, UnaryOp};
use serde_json::{Map, Number, Value as Json};

use crate::classad::ClassAd;

impl ClassAd {
    /// Attributes as a JSON object in definition order
    #[must_use]
    pub fn to_json(&self) -> Json {
        Json::Object(record_to_json(self.iter()))
    }
}

fn record_to_json<'a>(attributes: impl Iterator<Item = (&'a str, &'a Expr)>) -> Map<String, Json> {
    attributes
        .map(|(name, expr)| (name.to_string(), expr_to_json(expr)))
        .collect()
}

/// JSON for one expression
#[must_use]
pub fn expr_to_json(expr: &Expr) -> Json {
    match expr {
        Expr::Literal(literal) => literal_to_json(literal).unwrap_or_else(|| embedded(expr)),
        Expr::Unary {
            op: UnaryOp::Minus,
            operand,
        } => match operand.as_ref() {
            Expr::Literal(Literal::Integer(value)) => value
                .checked_neg()
                .map_or_else(|| embedded(expr), |value| Json::Number(value.into())),
            Expr::Literal(Literal::Real(value)) => real(-value).unwrap_or_else(|| embedded(expr)),
            _ => embedded(expr),
        },
        Expr::List(items) => Json::Array(items.iter().map(expr_to_json).collect()),
        Expr::Record(definitions) => Json::Object(record_to_json(
            definitions.iter().map(|(name, expr)| (name.as_str(), expr)),
        )),
        _ => embedded(expr),
    }
}

fn literal_to_json(literal: &Literal) -> Option<Json> {
    match literal {
        Literal::Undefined => Some(Json::Null),
        Literal::Error => None,
        Literal::Boolean(value) => Some(Json::Bool(*value)),
        Literal::Integer(value) => Some(Json::Number((*value).into())),
        Literal::Real(value) => real(*value),
        Literal::String(value) => Some(Json::String(value.clone())),
    }
}

/// Non-finite reals have no JSON number
fn real(value: f64) -> Option<Json> {
    Number::from_f64(value).map(Json::Number)
}

fn embedded(expr: &Expr) -> Json {
    Json::String(format!("/Expr({expr})/"))
}
