//! Projection of resolved options into environment variables.
//!
//! Every option becomes `JIRA_<NAME>` with the name upper-cased, and the
//! current operation is published as `JIRA_OPERATION`. Executable configs
//! see these variables, as do any subprocesses the handlers start.

use crate::options::{OptionStore, OptionValue};
use crate::router::Operation;
use std::collections::BTreeMap;

/// Namespace prefix for projected variables.
pub const ENV_PREFIX: &str = "JIRA";

/// Name of the variable carrying the resolved operation.
pub const OPERATION_VAR: &str = "JIRA_OPERATION";

/// A full set of projected variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Publish the snapshot into this process's environment.
    ///
    /// Must only be called while the process is single-threaded.
    pub fn export(&self) {
        for (name, value) in &self.vars {
            // SAFETY: resolution runs on the main thread before any handler
            // or subprocess is started.
            unsafe {
                std::env::set_var(name, value);
            }
        }
    }
}

/// Serializes an [`OptionStore`] into environment variables and back.
#[derive(Debug, Clone)]
pub struct EnvProjector {
    prefix: String,
}

impl Default for EnvProjector {
    fn default() -> Self {
        Self::new(ENV_PREFIX)
    }
}

impl EnvProjector {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Variable name for an option.
    pub fn var_name(&self, option: &str) -> String {
        format!("{}_{}", self.prefix, option.to_uppercase())
    }

    /// Project the whole store, plus the operation when one is known.
    ///
    /// Always re-serializes every option; there is no delta mode.
    pub fn project(&self, store: &OptionStore, operation: Option<Operation>) -> EnvSnapshot {
        let mut vars: BTreeMap<String, String> = store
            .iter()
            .map(|(name, value)| (self.var_name(name), value.to_string()))
            .collect();
        if let Some(operation) = operation {
            vars.insert(self.var_name("operation"), operation.to_string());
        }
        EnvSnapshot { vars }
    }

    /// Read prefixed variables back into a store.
    ///
    /// Names are lower-cased and values are typed by inference: `true` and
    /// `false` become booleans, then integers, then floats, else strings.
    pub fn import<I, K, V>(&self, vars: I) -> OptionStore
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let marker = format!("{}_", self.prefix);
        vars.into_iter()
            .filter_map(|(name, value)| {
                let option = name.as_ref().strip_prefix(&marker)?;
                if option.is_empty() {
                    return None;
                }
                Some((option.to_lowercase(), parse_env_value(value.as_ref())))
            })
            .collect()
    }
}

fn parse_env_value(raw: &str) -> OptionValue {
    match raw {
        "true" => return OptionValue::Bool(true),
        "false" => return OptionValue::Bool(false),
        _ => {}
    }
    if let Ok(i) = raw.parse::<i64>() {
        return OptionValue::Int(i);
    }
    if raw.contains('.') {
        if let Ok(f) = raw.parse::<f64>() {
            return OptionValue::Float(f);
        }
    }
    OptionValue::String(raw.to_string())
}
