//! Evaluation settings

use std::collections::HashMap;

use serde::Deserialize;

/// Settings that shape evaluation
///
/// Deserializable so callers can load it from a configuration file; missing
/// fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EvalOptions {
    /// Nested attribute evaluations allowed before the result becomes `ERROR`
    pub max_depth: usize,

    /// Expression levels open at once, across attribute hops, before the result becomes `ERROR`
    pub max_nesting: usize,

    /// Map sets for `userMap`: map-set name to user name to groups
    pub user_maps: HashMap<String, HashMap<String, Vec<String>>>,

    /// Home directories for `userHome`
    pub user_homes: HashMap<String, String>,

    /// Separator between variables in the old environment syntax
    pub environment_separator: String,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            max_depth: 256,
            max_nesting: 512,
            user_maps: HashMap::new(),
            user_homes: HashMap::new(),
            environment_separator: ";".to_string(),
        }
    }
}

impl EvalOptions {
    /// Groups of `user` in the map set `map_set`; both names ignore case
    #[must_use]
    pub fn user_groups(&self, map_set: &str, user: &str) -> Option<&[String]> {
        let users = self
            .user_maps
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(map_set))
            .map(|(_, users)| users)?;
        users
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(user))
            .map(|(_, groups)| groups.as_slice())
    }
}
