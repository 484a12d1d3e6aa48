//! Minimal environment diffs.
//!
//! A diff records, for every variable the activation added or changed,
//! either the full new value or, for path lists, only the segments that
//! were not already present. Variables that disappear are not recorded.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::core::platform::HostPlatform;
use crate::env::snapshot::EnvironmentSnapshot;

/// A single variable change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EnvChange {
    /// Replace the whole value
    Value(String),
    /// Prepend these path segments to the existing value
    PathList(Vec<String>),
}

impl EnvChange {
    /// The replacement value, if this is a scalar change.
    pub fn value(&self) -> Option<&str> {
        match self {
            EnvChange::Value(v) => Some(v),
            EnvChange::PathList(_) => None,
        }
    }

    /// The new segments, if this is a path-list change.
    pub fn segments(&self) -> Option<&[String]> {
        match self {
            EnvChange::Value(_) => None,
            EnvChange::PathList(segments) => Some(segments),
        }
    }
}

/// Variable changes between two snapshots, in the order the variables
/// appear in the later snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnvironmentDiff {
    changes: IndexMap<String, EnvChange>,
}

impl EnvironmentDiff {
    /// An empty diff.
    pub fn new() -> Self {
        EnvironmentDiff {
            changes: IndexMap::new(),
        }
    }

    /// Compute the changes that turn `before` into `after`.
    ///
    /// Per variable in `after`:
    /// - absent before: full value;
    /// - equal (case-insensitively on Windows): omitted;
    /// - both values single-segment: full value;
    /// - otherwise a path list: the new value's segments, without empties,
    ///   duplicates, or segments already in the old value. Omitted if
    ///   nothing is left.
    pub fn compute(
        before: &EnvironmentSnapshot,
        after: &EnvironmentSnapshot,
        platform: HostPlatform,
    ) -> Self {
        let mut diff = EnvironmentDiff::new();
        let sep = platform.path_separator();

        for (name, new_value) in after.iter() {
            let Some(old_value) = before.lookup(name, platform) else {
                diff.insert(name, EnvChange::Value(new_value.to_string()));
                continue;
            };

            if platform.normalize(old_value) == platform.normalize(new_value) {
                continue;
            }

            let old_segments: HashSet<String> =
                old_value.split(sep).map(|s| platform.normalize(s)).collect();
            let old_count = old_value.split(sep).count();
            let new_count = new_value.split(sep).count();

            if old_count == 1 && new_count == 1 {
                diff.insert(name, EnvChange::Value(new_value.to_string()));
                continue;
            }

            let mut seen = HashSet::new();
            let added: Vec<String> = new_value
                .split(sep)
                .filter(|segment| !segment.is_empty())
                .filter(|segment| seen.insert(platform.normalize(segment)))
                .filter(|segment| !old_segments.contains(&platform.normalize(segment)))
                .map(str::to_string)
                .collect();

            if !added.is_empty() {
                diff.insert(name, EnvChange::PathList(added));
            }
        }

        diff
    }

    /// Record a change, replacing any earlier change for the same name.
    pub fn insert(&mut self, name: impl Into<String>, change: EnvChange) {
        self.changes.insert(name.into(), change);
    }

    pub fn get(&self, name: &str) -> Option<&EnvChange> {
        self.changes.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EnvChange)> {
        self.changes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Concrete values to set, combining path lists with `current`.
    ///
    /// Path-list segments are joined with the platform separator and placed
    /// in front of the variable's current value.
    pub fn resolve_against(
        &self,
        current: &EnvironmentSnapshot,
        platform: HostPlatform,
    ) -> Vec<(String, String)> {
        let sep = platform.path_separator().to_string();

        self.changes
            .iter()
            .map(|(name, change)| {
                let value = match change {
                    EnvChange::Value(v) => v.clone(),
                    EnvChange::PathList(segments) => {
                        let joined = segments.join(&sep);
                        match current.lookup(name, platform) {
                            Some(existing) if !existing.is_empty() => {
                                format!("{}{}{}", joined, sep, existing)
                            }
                            _ => joined,
                        }
                    }
                };
                (name.clone(), value)
            })
            .collect()
    }
}

impl FromIterator<(String, EnvChange)> for EnvironmentDiff {
    fn from_iter<I: IntoIterator<Item = (String, EnvChange)>>(iter: I) -> Self {
        EnvironmentDiff {
            changes: iter.into_iter().collect(),
        }
    }
}
