//! Scoped mutation of the current process environment.

use std::ffi::OsString;

/// Applies environment overrides for the lifetime of a scope value.
pub trait ScopedMutation {
    /// Handle that restores the previous values when dropped.
    type Scope;

    /// Apply `vars` and return the handle owning their restoration.
    fn apply_and_restore(&self, vars: Vec<(String, String)>) -> Self::Scope;
}

/// Mutates this process's own environment.
///
/// Environment mutation is process-global. Callers running several threads
/// must serialize scopes themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ScopedMutation for ProcessEnv {
    type Scope = EnvGuard;

    fn apply_and_restore(&self, vars: Vec<(String, String)>) -> EnvGuard {
        EnvGuard::set(vars)
    }
}

/// Restores overridden variables to their previous state on drop.
#[derive(Debug)]
#[must_use = "the environment is restored as soon as the guard is dropped"]
pub struct EnvGuard {
    saved: Vec<(String, Option<OsString>)>,
}

impl EnvGuard {
    /// Set every variable, remembering what was there before.
    pub fn set(vars: Vec<(String, String)>) -> Self {
        let mut saved = Vec::with_capacity(vars.len());
        for (key, value) in vars {
            saved.push((key.clone(), std::env::var_os(&key)));
            std::env::set_var(&key, value);
        }
        tracing::debug!("Applied {} environment variables", saved.len());
        EnvGuard { saved }
    }

    /// Names of the variables this guard will restore.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.saved.iter().map(|(k, _)| k.as_str())
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // Reverse order so a key set twice ends at its original value
        for (key, previous) in self.saved.drain(..).rev() {
            match previous {
                Some(value) => std::env::set_var(&key, value),
                None => std::env::remove_var(&key),
            }
        }
    }
}
