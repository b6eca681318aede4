//! The ClassAd record: ordered attributes with case-insensitive names

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use classad_ast::{ClassAdError, Expr, is_reserved_name, quote_name};

use crate::evaluator::Evaluator;
use crate::options::EvalOptions;
use crate::value::Value;

/// A set of named expressions
///
/// Lookup ignores case, printing keeps the spelling the attribute was first
/// defined with, and iteration follows definition order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassAd {
    attributes: Vec<(String, Expr)>,
    index: HashMap<String, usize>,
}

impl ClassAd {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a bracketed or old-style ad
    ///
    /// # Errors
    ///
    /// Returns `ClassAdError::Syntax` for malformed input and
    /// `ClassAdError::ReservedName` when an attribute uses a reserved word
    pub fn parse(input: &str) -> Result<Self, ClassAdError> {
        let mut ad = Self::new();
        for (name, expr) in classad_parser::parse_classad(input)? {
            ad.insert(name, expr)?;
        }
        Ok(ad)
    }

    /// Build an ad from already parsed definitions without name checks
    pub(crate) fn from_definitions(definitions: &[(String, Expr)]) -> Self {
        let mut ad = Self::new();
        for (name, expr) in definitions {
            ad.put(name.clone(), expr.clone());
        }
        ad
    }

    /// Define or replace an attribute, returning the previous expression
    ///
    /// A replaced attribute keeps its position and original spelling.
    ///
    /// # Errors
    ///
    /// Returns `ClassAdError::ReservedName` for names such as `true` or `error`
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        expr: Expr,
    ) -> Result<Option<Expr>, ClassAdError> {
        let name = name.into();
        if is_reserved_name(&name) {
            return Err(ClassAdError::reserved_name(&name));
        }
        Ok(self.put(name, expr))
    }

    /// Define an attribute from a value
    ///
    /// # Errors
    ///
    /// Returns `ClassAdError::ReservedName` for reserved attribute names
    pub fn insert_value(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Expr>, ClassAdError> {
        self.insert(name, value.into().to_expr())
    }

    fn put(&mut self, name: String, expr: Expr) -> Option<Expr> {
        let key = name.to_ascii_lowercase();
        if let Some(&position) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.attributes[position].1, expr));
        }
        self.index.insert(key, self.attributes.len());
        self.attributes.push((name, expr));
        None
    }

    /// The expression bound to `name`, unevaluated
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Expr> {
        self.index
            .get(&name.to_ascii_lowercase())
            .map(|&position| &self.attributes[position].1)
    }

    /// Remove an attribute, returning its expression
    pub fn remove(&mut self, name: &str) -> Option<Expr> {
        let position = self.index.remove(&name.to_ascii_lowercase())?;
        let (_, expr) = self.attributes.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(expr)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&name.to_ascii_lowercase())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Attributes in definition order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Expr)> {
        self.attributes
            .iter()
            .map(|(name, expr)| (name.as_str(), expr))
    }

    /// Attribute names in definition order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|(name, _)| name.as_str())
    }

    /// Evaluate an attribute with this ad as MY and no TARGET
    #[must_use]
    pub fn evaluate_attr(&self, name: &str) -> Value {
        self.evaluate_with(&EvalOptions::default(), name, None)
    }

    /// Evaluate an attribute with this ad as MY and `target` as TARGET
    #[must_use]
    pub fn evaluate_attr_against(&self, name: &str, target: &Self) -> Value {
        self.evaluate_with(&EvalOptions::default(), name, Some(target))
    }

    /// Evaluate a free-standing expression in the context of this ad
    #[must_use]
    pub fn evaluate_expr(&self, expr: &Expr, target: Option<&Self>) -> Value {
        Evaluator::new(&EvalOptions::default()).evaluate(expr, Some(self), target)
    }

    /// Evaluate an attribute under explicit options
    #[must_use]
    pub fn evaluate_with(&self, options: &EvalOptions, name: &str, target: Option<&Self>) -> Value {
        Evaluator::new(options).evaluate_attribute(self, name, target)
    }

    /// Same attribute names with equal expressions, regardless of order or case
    pub(crate) fn same_attributes(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(name, expr)| other.get(name) == Some(expr))
    }

    /// One `name = expr` line per attribute
    #[must_use]
    pub fn to_old_style(&self) -> String {
        self.iter()
            .map(|(name, expr)| format!("{} = {expr}\n", quote_name(name)))
            .collect()
    }
}

impl Display for ClassAd {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("[]");
        }
        f.write_str("[ ")?;
        for (position, (name, expr)) in self.iter().enumerate() {
            if position > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{} = {expr}", quote_name(name))?;
        }
        f.write_str(" ]")
    }
}

impl FromStr for ClassAd {
    type Err = ClassAdError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parse(input)
    }
}

impl<'a> IntoIterator for &'a ClassAd {
    type Item = (&'a str, &'a Expr);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a Expr)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
