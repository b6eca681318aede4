//! Pairing ads through their `Requirements` and `Rank` attributes

use tracing::debug;

use crate::classad::ClassAd;
use crate::options::EvalOptions;
use crate::value::Value;

pub const REQUIREMENTS: &str = "Requirements";
pub const RANK: &str = "Rank";

/// Whether `my.Requirements`, evaluated with `target` as TARGET, is true
#[must_use]
pub fn requirements_met(my: &ClassAd, target: &ClassAd) -> bool {
    requirements_met_with(&EvalOptions::default(), my, target)
}

#[must_use]
pub fn requirements_met_with(options: &EvalOptions, my: &ClassAd, target: &ClassAd) -> bool {
    let outcome = my.evaluate_with(options, REQUIREMENTS, Some(target));
    debug!(%outcome, "requirements evaluated");
    outcome == Value::Boolean(true)
}

/// Symmetric match: each ad's requirements hold against the other
#[must_use]
pub fn matches(left: &ClassAd, right: &ClassAd) -> bool {
    matches_with(&EvalOptions::default(), left, right)
}

#[must_use]
pub fn matches_with(options: &EvalOptions, left: &ClassAd, right: &ClassAd) -> bool {
    requirements_met_with(options, left, right) && requirements_met_with(options, right, left)
}

/// How much `my` prefers `target`; `0.0` when `Rank` is missing or not a number
#[must_use]
pub fn rank(my: &ClassAd, target: &ClassAd) -> f64 {
    rank_with(&EvalOptions::default(), my, target)
}

#[must_use]
pub fn rank_with(options: &EvalOptions, my: &ClassAd, target: &ClassAd) -> f64 {
    match my.evaluate_with(options, RANK, Some(target)) {
        Value::Integer(value) => value as f64,
        Value::Real(value) => value,
        Value::Boolean(value) => f64::from(u8::from(value)),
        _ => 0.0,
    }
}
