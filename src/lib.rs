//! compilervars - Intel compiler environment activation
//!
//! Locates an installed Intel compiler, builds the command that runs its
//! vendor activation script, captures the environment the script leaves
//! behind and turns the difference into changes that can be applied to a
//! process, scoped or permanently.

pub mod builder;
pub mod core;
pub mod env;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test utilities and mocks for unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides mock implementations for process execution
/// and the machine configuration store.
#[cfg(test)]
pub mod test_support;

pub use builder::{ActivationCommand, CommandBuilder};
pub use core::{HostPlatform, ToolchainIdentity};
pub use env::{EnvChange, EnvGuard, EnvironmentDiff, EnvironmentSnapshot};
pub use ops::{activation_scope, compute_diff_for, Activator};
pub use resolver::InstallationResolver;
pub use util::errors::{ActivationError, ActivationResult};
