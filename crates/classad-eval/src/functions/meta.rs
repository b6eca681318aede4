//! Functions that work on expressions rather than values

use classad_ast::Expr;
use tracing::debug;

use super::Registry;
use crate::evaluator::{Evaluator, Frame};
use crate::operators::{Truth, truth};
use crate::value::Value;

pub(super) fn register(registry: &mut Registry) {
    registry.lazy("eval", eval);
    registry.lazy("unparse", unparse);
    registry.lazy("ifThenElse", if_then_else);
    registry.lazy("debug", debug);
}

/// Parse a string as an expression and evaluate it in the current scope
fn eval(evaluator: &mut Evaluator<'_>, args: &[Expr], frame: &Frame<'_>) -> Value {
    let [text] = args else {
        return Value::Error;
    };
    match evaluator.eval(text, frame) {
        Value::String(text) => match classad_parser::parse(&text) {
            Ok(expr) => evaluator.eval(&expr, frame),
            Err(error) => {
                debug!(%error, "eval() of unparsable text");
                Value::Error
            }
        },
        Value::Undefined => Value::Undefined,
        _ => Value::Error,
    }
}

/// Text of the expression an attribute reference points at, unevaluated
fn unparse(_: &mut Evaluator<'_>, args: &[Expr], frame: &Frame<'_>) -> Value {
    let [reference] = args else {
        return Value::Error;
    };
    if !reference.is_reference() {
        return Value::Error;
    }
    Value::String(
        frame
            .lookup(reference)
            .map(ToString::to_string)
            .unwrap_or_default(),
    )
}

fn if_then_else(evaluator: &mut Evaluator<'_>, args: &[Expr], frame: &Frame<'_>) -> Value {
    let [condition, then, otherwise] = args else {
        return Value::Error;
    };
    match truth(&evaluator.eval(condition, frame)) {
        Truth::True => evaluator.eval(then, frame),
        Truth::False => evaluator.eval(otherwise, frame),
        Truth::Undefined => Value::Undefined,
        Truth::Error => Value::Error,
    }
}

/// Evaluate and log the argument, returning its value
fn debug(evaluator: &mut Evaluator<'_>, args: &[Expr], frame: &Frame<'_>) -> Value {
    let [expr] = args else {
        return Value::Error;
    };
    let value = evaluator.eval(expr, frame);
    debug!(expression = %expr, %value, "debug()");
    value
}
