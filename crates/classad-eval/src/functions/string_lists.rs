//! Functions over delimited string lists such as `"a, b, c"`

use super::Registry;
use super::lists::Aggregate;
use super::patterns::build_regex;
use crate::evaluator::Evaluator;
use crate::value::{Number, Value};

const DEFAULT_DELIMITERS: &str = " ,";

pub(super) fn register(registry: &mut Registry) {
    registry.strict("stringListSize", string_list_size);
    registry.strict("stringListSum", |_, args| string_list_aggregate(args, Aggregate::Sum));
    registry.strict("stringListAvg", |_, args| string_list_aggregate(args, Aggregate::Avg));
    registry.strict("stringListMin", |_, args| string_list_aggregate(args, Aggregate::Min));
    registry.strict("stringListMax", |_, args| string_list_aggregate(args, Aggregate::Max));
    registry.strict("stringListMember", |_, args| string_list_member(args, false));
    registry.strict("stringListIMember", |_, args| string_list_member(args, true));
    registry.strict("stringListsIntersect", strings_lists_intersect);
    registry.strict("stringList_regexpMember", string_list_regexp_member);
}

/// Items of `list`, split on any delimiter character, with empty items dropped
fn items<'a>(list: &'a str, delimiters: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    list.split(move |c: char| delimiters.contains(c))
        .map(str::trim)
        .filter(|item| !item.is_empty())
}

/// All arguments as strings, or `None` if any is not a string
fn strings(args: &[Value]) -> Option<Vec<&str>> {
    args.iter().map(Value::as_str).collect()
}

/// The list and delimiter from `(list[, delimiters])`
fn list_args(args: &[Value]) -> Option<(&str, &str)> {
    match strings(args)?.as_slice() {
        [list] => Some((*list, DEFAULT_DELIMITERS)),
        [list, delimiters] => Some((*list, *delimiters)),
        _ => None,
    }
}

fn string_list_size(_: &Evaluator<'_>, args: &[Value]) -> Value {
    let Some((list, delimiters)) = list_args(args) else {
        return Value::Error;
    };
    i64::try_from(items(list, delimiters).count()).map_or(Value::Error, Value::Integer)
}

fn parse_number(item: &str) -> Option<Number> {
    item.parse::<i64>()
        .map(Number::Integer)
        .or_else(|_| item.parse::<f64>().map(Number::Real))
        .ok()
}

fn string_list_aggregate(args: &[Value], aggregate: Aggregate) -> Value {
    let Some((list, delimiters)) = list_args(args) else {
        return Value::Error;
    };
    let numbers: Option<Vec<Number>> = items(list, delimiters).map(parse_number).collect();
    numbers.map_or(Value::Error, |numbers| aggregate.apply(&numbers))
}

fn string_list_member(args: &[Value], ignore_case: bool) -> Value {
    let Some(strings) = strings(args) else {
        return Value::Error;
    };
    let (needle, list, delimiters) = match strings.as_slice() {
        [needle, list] => (*needle, *list, DEFAULT_DELIMITERS),
        [needle, list, delimiters] => (*needle, *list, *delimiters),
        _ => return Value::Error,
    };
    Value::Boolean(items(list, delimiters).any(|item| {
        if ignore_case {
            item.eq_ignore_ascii_case(needle)
        } else {
            item == needle
        }
    }))
}

fn strings_lists_intersect(_: &Evaluator<'_>, args: &[Value]) -> Value {
    let Some(strings) = strings(args) else {
        return Value::Error;
    };
    let (left, right, delimiters) = match strings.as_slice() {
        [left, right] => (*left, *right, DEFAULT_DELIMITERS),
        [left, right, delimiters] => (*left, *right, *delimiters),
        _ => return Value::Error,
    };
    let right: Vec<&str> = items(right, delimiters).collect();
    Value::Boolean(items(left, delimiters).any(|item| right.contains(&item)))
}

fn string_list_regexp_member(_: &Evaluator<'_>, args: &[Value]) -> Value {
    let Some(strings) = strings(args) else {
        return Value::Error;
    };
    let (pattern, list, delimiters, options) = match strings.as_slice() {
        [pattern, list] => (*pattern, *list, DEFAULT_DELIMITERS, ""),
        [pattern, list, delimiters] => (*pattern, *list, *delimiters, ""),
        [pattern, list, delimiters, options] => (*pattern, *list, *delimiters, *options),
        _ => return Value::Error,
    };
    let Some(regex) = build_regex(pattern, options) else {
        return Value::Error;
    };
    Value::Boolean(items(list, delimiters).any(|item| regex.is_match(item)))
}
