//! Clock and time formatting functions

use chrono::format::{Item, StrftimeItems};
use chrono::{Local, TimeZone, Utc};

use super::Registry;
use crate::evaluator::Evaluator;
use crate::value::Value;

pub(super) fn register(registry: &mut Registry) {
    registry.strict("time", time);
    registry.strict("formatTime", format_time);
    registry.strict("interval", interval);
}

/// Seconds since the Unix epoch
fn time(_: &Evaluator<'_>, args: &[Value]) -> Value {
    if !args.is_empty() {
        return Value::Error;
    }
    Value::Integer(Utc::now().timestamp())
}

/// strftime-style rendering of a timestamp in local time
fn format_time(_: &Evaluator<'_>, args: &[Value]) -> Value {
    let (seconds, format) = match args {
        [] => (Utc::now().timestamp(), "%c"),
        [Value::Integer(seconds)] => (*seconds, "%c"),
        [Value::Integer(seconds), Value::String(format)] => (*seconds, format.as_str()),
        _ => return Value::Error,
    };

    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Value::Error;
    }
    match Local.timestamp_opt(seconds, 0).single() {
        Some(moment) => Value::String(moment.format_with_items(items.into_iter()).to_string()),
        None => Value::Error,
    }
}

/// `days+hh:mm:ss`, leaving out leading zero fields
fn interval(_: &Evaluator<'_>, args: &[Value]) -> Value {
    let seconds = match args {
        [Value::Integer(seconds)] => *seconds,
        [Value::Real(seconds)] if seconds.is_finite() => seconds.trunc() as i64,
        [Value::Undefined] => return Value::Undefined,
        _ => return Value::Error,
    };
    Value::String(format_interval(seconds))
}

pub(crate) fn format_interval(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let total = seconds.unsigned_abs();
    let (days, hours, minutes, secs) = (
        total / 86_400,
        total % 86_400 / 3_600,
        total % 3_600 / 60,
        total % 60,
    );
    if days > 0 {
        format!("{sign}{days}+{hours}:{minutes:02}:{secs:02}")
    } else if hours > 0 {
        format!("{sign}{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{sign}{minutes}:{secs:02}")
    }
}
