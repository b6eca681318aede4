//! Job environment strings
//!
//! The old syntax separates `NAME=value` pairs with a separator character
//! (`;` unless configured otherwise). The new syntax separates them with
//! whitespace and single-quotes values that contain whitespace, doubling any
//! quote inside.

use super::{Registry, string_arg};
use crate::evaluator::Evaluator;
use crate::value::Value;

pub(super) fn register(registry: &mut Registry) {
    registry.strict("envV1ToV2", env_v1_to_v2);
    registry.strict("mergeEnvironment", merge_environment);
}

type Environment = Vec<(String, String)>;

/// Set `name`, replacing an earlier definition in place
fn set(environment: &mut Environment, name: &str, value: &str) {
    match environment.iter_mut().find(|(existing, _)| existing == name) {
        Some((_, existing)) => *existing = value.to_string(),
        None => environment.push((name.to_string(), value.to_string())),
    }
}

fn split_assignment(entry: &str) -> Option<(&str, &str)> {
    entry.split_once('=').filter(|(name, _)| !name.is_empty())
}

fn parse_v1(text: &str, separator: &str) -> Option<Environment> {
    let mut environment = Environment::new();
    for entry in text.split(separator).filter(|entry| !entry.trim().is_empty()) {
        let (name, value) = split_assignment(entry.trim_start())?;
        set(&mut environment, name, value);
    }
    Some(environment)
}

fn parse_v2(text: &str) -> Option<Environment> {
    let mut environment = Environment::new();
    let mut entries = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\'' if quoted && chars.peek() == Some(&'\'') => {
                chars.next();
                current.push('\'');
            }
            '\'' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    entries.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if quoted {
        return None;
    }
    if in_token {
        entries.push(current);
    }

    for entry in &entries {
        let (name, value) = split_assignment(entry)?;
        set(&mut environment, name, value);
    }
    Some(environment)
}

fn format_v2(environment: &Environment) -> String {
    environment
        .iter()
        .map(|(name, value)| {
            if value.is_empty() || value.chars().any(|c| c.is_whitespace() || c == '\'') {
                format!("{name}='{}'", value.replace('\'', "''"))
            } else {
                format!("{name}={value}")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn env_v1_to_v2(evaluator: &Evaluator<'_>, args: &[Value]) -> Value {
    let [old] = args else {
        return Value::Error;
    };
    let old = match string_arg(old) {
        Ok(old) => old,
        Err(value) => return value,
    };
    parse_v1(old, &evaluator.options().environment_separator)
        .map_or(Value::Error, |environment| Value::String(format_v2(&environment)))
}

/// Later arguments override earlier ones; `UNDEFINED` counts as empty
fn merge_environment(_: &Evaluator<'_>, args: &[Value]) -> Value {
    let mut merged = Environment::new();
    for arg in args {
        let text = match arg {
            Value::String(text) => text,
            Value::Undefined => continue,
            _ => return Value::Error,
        };
        let Some(environment) = parse_v2(text) else {
            return Value::Error;
        };
        for (name, value) in &environment {
            set(&mut merged, name, value);
        }
    }
    Value::String(format_v2(&merged))
}
