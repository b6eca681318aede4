//! Built-in functions
//!
//! Names are matched without regard to case. Most functions see their
//! arguments already evaluated; a few (`ifThenElse`, `unparse`, `eval`,
//! `debug`) receive the raw expressions and decide what to evaluate.

use std::collections::HashMap;

use classad_ast::Expr;
use once_cell::sync::Lazy;
use tracing::warn;

use crate::evaluator::{Evaluator, Frame};
use crate::value::Value;

mod conversion;
mod environment;
mod lists;
mod math;
mod meta;
mod patterns;
mod string_lists;
mod strings;
mod time;
mod users;

pub(crate) type LazyFn = fn(&mut Evaluator<'_>, &[Expr], &Frame<'_>) -> Value;
pub(crate) type StrictFn = fn(&Evaluator<'_>, &[Value]) -> Value;

#[derive(Clone, Copy)]
pub(crate) enum Builtin {
    Lazy(LazyFn),
    Strict(StrictFn),
}

/// Function table under construction, keyed by lowercase name
#[derive(Default)]
pub(crate) struct Registry {
    functions: HashMap<String, Builtin>,
}

impl Registry {
    pub(crate) fn lazy(&mut self, name: &str, function: LazyFn) {
        self.functions
            .insert(name.to_ascii_lowercase(), Builtin::Lazy(function));
    }

    pub(crate) fn strict(&mut self, name: &str, function: StrictFn) {
        self.functions
            .insert(name.to_ascii_lowercase(), Builtin::Strict(function));
    }
}

static BUILTINS: Lazy<HashMap<String, Builtin>> = Lazy::new(|| {
    let mut registry = Registry::default();
    meta::register(&mut registry);
    conversion::register(&mut registry);
    math::register(&mut registry);
    strings::register(&mut registry);
    lists::register(&mut registry);
    time::register(&mut registry);
    environment::register(&mut registry);
    string_lists::register(&mut registry);
    patterns::register(&mut registry);
    users::register(&mut registry);
    registry.functions
});

/// Whether `name` is a built-in function
#[must_use]
pub fn is_builtin(name: &str) -> bool {
    BUILTINS.contains_key(&name.to_ascii_lowercase())
}

/// Names of all built-in functions, lowercase and sorted
#[must_use]
pub fn builtin_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = BUILTINS.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
}

pub(crate) fn call(
    evaluator: &mut Evaluator<'_>,
    name: &str,
    args: &[Expr],
    frame: &Frame<'_>,
) -> Value {
    let Some(builtin) = BUILTINS.get(&name.to_ascii_lowercase()) else {
        warn!(function = %name, "call to unknown function");
        return Value::Error;
    };
    match *builtin {
        Builtin::Lazy(function) => function(evaluator, args, frame),
        Builtin::Strict(function) => {
            let values: Vec<Value> = args.iter().map(|arg| evaluator.eval(arg, frame)).collect();
            function(evaluator, &values)
        }
    }
}

/// Convert a value the way `string()` does; `None` for `UNDEFINED` and `ERROR`
pub(crate) fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Undefined | Value::Error => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// The string argument, `Err(value)` with the result to return otherwise
///
/// `UNDEFINED` stays `UNDEFINED`; every other non-string is an `ERROR`.
pub(crate) fn string_arg(value: &Value) -> Result<&str, Value> {
    match value {
        Value::String(text) => Ok(text),
        Value::Undefined => Err(Value::Undefined),
        _ => Err(Value::Error),
    }
}

pub(crate) fn list_of_strings<'a>(items: impl IntoIterator<Item = &'a str>) -> Value {
    Value::List(items.into_iter().map(Value::from).collect())
}
