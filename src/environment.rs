//! # Environment Module
//!
//! Immutable key/value configuration store threaded through service factories,
//! commands and route handlers.
//!
//! [`Environment`] is a persistent value: [`Environment::with`] returns a new
//! store, keys are unique and the last write wins. The store is ordered:
//! [`Environment::variables`] iterates in first-insertion order, and
//! overwriting a key keeps its original position. Values are plain strings;
//! no implicit coercion happens here. Reading an absent key through
//! [`Environment::get`] is a configuration error surfaced as
//! [`UnknownVariable`]; [`Environment::maybe`] never fails.

use std::fmt;
use std::rc::Rc;

use crate::http::ServerRequest;

/// Error returned by [`Environment::get`] for a key that was never defined.
///
/// An unknown variable is a configuration mistake, not a runtime condition the
/// dispatch pipeline recovers from; callers are expected to propagate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariable {
    key: String,
}

impl UnknownVariable {
    /// The key that was requested.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for UnknownVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown environment variable `{}`", self.key)
    }
}

impl std::error::Error for UnknownVariable {}

/// Immutable, insertion-ordered environment store.
///
/// Cloning is cheap (the backing storage is shared); mutation always goes
/// through [`Environment::with`], which produces a new store.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    variables: Rc<Vec<(String, String)>>,
}

impl Environment {
    /// Build a store from raw `(key, value)` pairs. Later pairs win.
    pub fn new<K, V>(variables: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut collected: Vec<(String, String)> = Vec::new();
        for (key, value) in variables {
            insert(&mut collected, key.into(), value.into());
        }
        Self {
            variables: Rc::new(collected),
        }
    }

    /// Literal store for tests.
    #[must_use]
    pub fn test(variables: &[(&str, &str)]) -> Self {
        Self::new(variables.iter().copied())
    }

    /// Build a store from the environment fields carried by an HTTP request.
    #[must_use]
    pub fn from_request(request: &ServerRequest) -> Self {
        Self::new(
            request
                .environment()
                .map(|(k, v)| (k.to_owned(), v.to_owned())),
        )
    }

    /// Return a new store with `key` set to `value`. Last write wins;
    /// an overwritten key keeps its original position.
    #[must_use]
    pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut variables = (*self.variables).clone();
        insert(&mut variables, key.into(), value.into());
        Self {
            variables: Rc::new(variables),
        }
    }

    /// Read a required variable.
    pub fn get(&self, key: &str) -> Result<&str, UnknownVariable> {
        self.maybe(key).ok_or_else(|| UnknownVariable {
            key: key.to_owned(),
        })
    }

    /// Read an optional variable.
    #[must_use]
    pub fn maybe(&self, key: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|entry| entry.0 == key)
            .map(|entry| entry.1.as_str())
    }

    /// Iterate over every defined variable, in first-insertion order.
    pub fn variables(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn insert(variables: &mut Vec<(String, String)>, key: String, value: String) {
    match variables.iter().position(|entry| entry.0 == key) {
        Some(index) => variables[index].1 = value,
        None => variables.push((key, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_then_get_round_trips() {
        let env = Environment::default().with("FOO", "bar");
        assert_eq!(env.get("FOO").unwrap(), "bar");
        assert_eq!(env.maybe("FOO"), Some("bar"));
    }

    #[test]
    fn with_does_not_mutate_the_receiver() {
        let base = Environment::test(&[("A", "1")]);
        let derived = base.clone().with("B", "2");
        assert_eq!(base.maybe("B"), None);
        assert_eq!(derived.get("A").unwrap(), "1");
        assert_eq!(derived.get("B").unwrap(), "2");
    }

    #[test]
    fn last_write_wins() {
        let env = Environment::default().with("K", "first").with("K", "second");
        assert_eq!(env.get("K").unwrap(), "second");
    }

    #[test]
    fn variables_iterate_in_insertion_order() {
        let env = Environment::default()
            .with("Z", "1")
            .with("A", "2")
            .with("M", "3");
        let keys: Vec<&str> = env.variables().map(|(k, _)| k).collect();
        assert_eq!(keys, ["Z", "A", "M"]);
    }

    #[test]
    fn overwriting_a_key_keeps_its_position() {
        let env = Environment::new([("Z", "1"), ("A", "2"), ("Z", "9")]);
        let pairs: Vec<(&str, &str)> = env.variables().collect();
        assert_eq!(pairs, [("Z", "9"), ("A", "2")]);
    }

    #[test]
    fn unknown_variable_names_the_key() {
        let err = Environment::default().get("MISSING").unwrap_err();
        assert_eq!(err.key(), "MISSING");
        assert_eq!(err.to_string(), "unknown environment variable `MISSING`");
    }
}
