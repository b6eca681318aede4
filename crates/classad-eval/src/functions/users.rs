//! User lookups backed by [`EvalOptions`](crate::options::EvalOptions)

use std::env;

use super::{Registry, list_of_strings, string_arg};
use crate::evaluator::Evaluator;
use crate::value::Value;

pub(super) fn register(registry: &mut Registry) {
    registry.strict("userHome", user_home);
    registry.strict("userMap", user_map);
}

fn home_from_environment(user: &str) -> Option<String> {
    let current = env::var("USER").ok()?;
    if current != user {
        return None;
    }
    env::var("HOME").ok().filter(|home| !home.is_empty())
}

fn user_home(evaluator: &Evaluator<'_>, args: &[Value]) -> Value {
    let (name, default) = match args {
        [name] => (name, None),
        [name, default] => (name, Some(default)),
        _ => return Value::Error,
    };
    let fallback = || default.cloned().unwrap_or(Value::Undefined);
    let name = match name {
        Value::String(name) => name,
        Value::Undefined => return fallback(),
        _ => return Value::Error,
    };
    if let Some(home) = evaluator.options().user_homes.get(name) {
        return Value::String(home.clone());
    }
    home_from_environment(name).map_or_else(fallback, Value::String)
}

/// Groups of a user in a map set
///
/// With a preferred group, that group when the user has it, else the first.
/// With two arguments, every group joined by commas.
fn user_map(evaluator: &Evaluator<'_>, args: &[Value]) -> Value {
    let (map_set, user, preferred, default) = match args {
        [map_set, user] => (map_set, user, None, None),
        [map_set, user, preferred] => (map_set, user, Some(preferred), None),
        [map_set, user, preferred, default] => (map_set, user, Some(preferred), Some(default)),
        _ => return Value::Error,
    };
    let (map_set, user) = match (string_arg(map_set), string_arg(user)) {
        (Ok(map_set), Ok(user)) => (map_set, user),
        (Err(value), _) | (_, Err(value)) => return value,
    };
    let preferred = match preferred {
        None | Some(Value::Undefined) => None,
        Some(Value::String(preferred)) => Some(preferred.as_str()),
        Some(_) => return Value::Error,
    };

    let groups = evaluator
        .options()
        .user_groups(map_set, user)
        .filter(|groups| !groups.is_empty());
    let Some(groups) = groups else {
        return default.cloned().unwrap_or(Value::Undefined);
    };

    if args.len() == 2 {
        return list_of_strings(groups.iter().map(String::as_str));
    }
    let chosen = preferred
        .and_then(|preferred| {
            groups
                .iter()
                .find(|group| group.eq_ignore_ascii_case(preferred))
        })
        .unwrap_or(&groups[0]);
    Value::String(chosen.clone())
}
