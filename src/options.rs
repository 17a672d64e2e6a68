//! Resolved option storage.
//!
//! The [`OptionStore`] is the single map that every layer of the cascade
//! writes into: compiled-in defaults, command-line flags, config files and
//! executable configs. Keys are never removed, only overwritten.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Default maximum number of results for list queries.
pub const DEFAULT_MAX_RESULTS: i64 = 500;

/// Default issue type for create/list.
pub const DEFAULT_ISSUE_TYPE: &str = "Bug";

/// Default fields rendered by the `list` template.
pub const DEFAULT_QUERY_FIELDS: &str = "summary,created,priority,status,reporter,assignee";

/// Default sort order for list operations.
pub const DEFAULT_SORT: &str = "priority asc, created";

/// A single option value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Sequence of scalars from a config file.
    List(Vec<String>),
    /// Nested string mapping, used by `overrides`.
    Map(BTreeMap<String, String>),
}

impl OptionValue {
    /// Borrow the value as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as a bool, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrow the value as a mapping, if it is one.
    pub fn as_map(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            OptionValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

/// Natural string form: `%t` for bools, `%d` for integers, `%f` for floats.
impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::String(s) => f.write_str(s),
            OptionValue::Int(i) => write!(f, "{}", i),
            OptionValue::Float(x) => write!(f, "{:.6}", x),
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::List(items) => f.write_str(&items.join(",")),
            OptionValue::Map(map) => {
                let pairs: Vec<String> = map.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                f.write_str(&pairs.join(","))
            }
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::String(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::String(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Int(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Float(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<BTreeMap<String, String>> for OptionValue {
    fn from(value: BTreeMap<String, String>) -> Self {
        OptionValue::Map(value)
    }
}

/// Mapping from option name to value.
///
/// Names are case-sensitive here; they are only upper-cased when projected
/// into the environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OptionStore {
    values: BTreeMap<String, OptionValue>,
}

impl OptionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the compiled-in defaults.
    pub fn with_defaults(user: &str, home: Option<&Path>) -> Self {
        let directory = match home {
            Some(home) => home.join(".jira.d").join("templates"),
            None => Path::new(".jira.d").join("templates"),
        };

        let mut store = Self::new();
        store.set("user", user);
        store.set("issuetype", DEFAULT_ISSUE_TYPE);
        store.set("watcher", user);
        store.set("queryfields", DEFAULT_QUERY_FIELDS);
        store.set("directory", directory.to_string_lossy().into_owned());
        store.set("sort", DEFAULT_SORT);
        store.set("max_results", DEFAULT_MAX_RESULTS);
        store
    }

    /// Set an option, overwriting any prior value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Get the current value of an option.
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    /// Get an option as a string slice.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(OptionValue::as_str)
    }

    /// Get an option as a bool.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(OptionValue::as_bool)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over options in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Key-wise overwrite: every key in `layer` replaces ours, others are kept.
    pub fn merge(&mut self, layer: OptionStore) {
        for (name, value) in layer.values {
            self.values.insert(name, value);
        }
    }
}

impl FromIterator<(String, OptionValue)> for OptionStore {
    fn from_iter<I: IntoIterator<Item = (String, OptionValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
