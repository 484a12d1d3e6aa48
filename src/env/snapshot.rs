//! Point-in-time copies of a process environment.

use indexmap::IndexMap;
use serde::Serialize;

use crate::core::platform::HostPlatform;

/// A full copy of one process's environment at one instant.
///
/// Entries keep the order in which they were observed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnvironmentSnapshot {
    vars: IndexMap<String, String>,
}

impl EnvironmentSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        EnvironmentSnapshot {
            vars: IndexMap::new(),
        }
    }

    /// Snapshot the current process environment.
    ///
    /// Names and values that are not valid Unicode are decoded lossily, the
    /// same way a child's environment dump is, so both sides of a diff agree.
    pub fn capture() -> Self {
        std::env::vars_os()
            .map(|(k, v)| {
                (
                    k.to_string_lossy().into_owned(),
                    v.to_string_lossy().into_owned(),
                )
            })
            .collect()
    }

    /// Insert or replace a variable.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Exact-name lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Lookup honoring the platform's name matching rules.
    pub fn lookup(&self, name: &str, platform: HostPlatform) -> Option<&str> {
        if let Some(value) = self.get(name) {
            return Some(value);
        }
        if !platform.case_insensitive() {
            return None;
        }
        self.vars
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether a variable is present under the platform's matching rules.
    pub fn contains(&self, name: &str, platform: HostPlatform) -> bool {
        self.lookup(name, platform).is_some()
    }

    /// Iterate over variables in observation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the snapshot has no variables.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvironmentSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        EnvironmentSnapshot {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
