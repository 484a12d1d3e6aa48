//! Activation pipeline: resolve, build, capture, diff, apply.
//!
//! Absence of the vendor toolchain is routine, so every "not applicable"
//! outcome (other compiler family, no installation, unsupported
//! architecture) produces an empty diff. Only inconsistent metadata and a
//! misbehaving activation script are errors.

use std::path::PathBuf;

use crate::builder::command::{ActivationCommand, CommandBuilder};
use crate::core::identity::ToolchainIdentity;
use crate::core::platform::HostPlatform;
use crate::env::capture::EnvCapture;
use crate::env::diff::EnvironmentDiff;
use crate::env::scope::{EnvGuard, ProcessEnv, ScopedMutation};
use crate::env::snapshot::EnvironmentSnapshot;
use crate::resolver::{ConfigStore, InstallationResolver, SystemStore, DEFAULT_INSTALL_ROOT};
use crate::util::config::Config;
use crate::util::errors::ActivationResult;
use crate::util::process::{ProcessRunner, SystemRunner};

/// Composes installation discovery, command building and capture.
#[derive(Debug, Clone)]
pub struct Activator<R = SystemRunner, S = SystemStore> {
    resolver: InstallationResolver<S>,
    capture: EnvCapture,
    runner: R,
    platform: HostPlatform,
}

impl Activator<SystemRunner, SystemStore> {
    /// Activator for the host with default locations.
    pub fn system() -> Self {
        Activator::new(
            InstallationResolver::system(),
            EnvCapture::default(),
            SystemRunner,
            HostPlatform::host(),
        )
    }

    /// Activator for the host, honoring `[activation]` settings.
    pub fn from_config(config: &Config) -> Self {
        let root = config
            .activation
            .install_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INSTALL_ROOT));
        let capture = match config.activation.shell {
            Some(ref shell) => EnvCapture::new(shell),
            None => EnvCapture::default(),
        };

        Activator::new(
            InstallationResolver::new(root, SystemStore),
            capture,
            SystemRunner,
            HostPlatform::host(),
        )
    }
}

impl Default for Activator<SystemRunner, SystemStore> {
    fn default() -> Self {
        Activator::system()
    }
}

impl<R: ProcessRunner, S: ConfigStore> Activator<R, S> {
    pub fn new(
        resolver: InstallationResolver<S>,
        capture: EnvCapture,
        runner: R,
        platform: HostPlatform,
    ) -> Self {
        Activator {
            resolver,
            capture,
            runner,
            platform,
        }
    }

    pub fn platform(&self) -> HostPlatform {
        self.platform
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Where the toolchain is installed, if it applies and is installed.
    pub fn resolve(&self, identity: &ToolchainIdentity) -> Option<PathBuf> {
        self.resolver.resolve(identity)
    }

    /// Build the activation command against the environment `env`.
    ///
    /// When the sentinel is set (and `force` is false) the no-op command is
    /// returned without looking for an installation.
    pub fn command_for(
        &self,
        identity: &ToolchainIdentity,
        env: &EnvironmentSnapshot,
        force: bool,
    ) -> ActivationResult<Option<ActivationCommand>> {
        let builder = CommandBuilder::new(env, self.platform);
        let arch = identity.architecture.as_deref();

        if builder.already_active(force) {
            return builder.build(identity, None, arch, force);
        }

        let install_dir = self.resolve(identity);
        builder.build(identity, install_dir.as_deref(), arch, force)
    }

    /// The activation command as a single printable line.
    pub fn command_line_for(
        &self,
        identity: &ToolchainIdentity,
        env: &EnvironmentSnapshot,
        force: bool,
    ) -> ActivationResult<Option<String>> {
        Ok(self
            .command_for(identity, env, force)?
            .map(|cmd| cmd.command_line()))
    }

    /// Diff the activated environment against `before`.
    ///
    /// No process is started when the toolchain does not apply or the
    /// environment is already active.
    pub fn compute_diff_with(
        &self,
        identity: &ToolchainIdentity,
        before: &EnvironmentSnapshot,
        force: bool,
    ) -> ActivationResult<EnvironmentDiff> {
        let Some(command) = self.command_for(identity, before, force)? else {
            tracing::debug!("Toolchain {} not applicable, nothing to activate", identity);
            return Ok(EnvironmentDiff::new());
        };

        if command.is_noop() {
            return Ok(EnvironmentDiff::new());
        }

        self.capture
            .compute_diff(&self.runner, &command, before, self.platform)
    }

    /// Diff the activated environment against the current process environment.
    pub fn compute_diff_for(
        &self,
        identity: &ToolchainIdentity,
        force: bool,
    ) -> ActivationResult<EnvironmentDiff> {
        self.compute_diff_with(identity, &EnvironmentSnapshot::capture(), force)
    }

    /// Compute the diff and hand it to `mutator`, returning its scope.
    pub fn activation_scope<M: ScopedMutation>(
        &self,
        mutator: &M,
        identity: &ToolchainIdentity,
        force: bool,
    ) -> ActivationResult<M::Scope> {
        let before = EnvironmentSnapshot::capture();
        let diff = self.compute_diff_with(identity, &before, force)?;
        Ok(mutator.apply_and_restore(diff.resolve_against(&before, self.platform)))
    }

    /// Activate in this process until the returned guard is dropped.
    pub fn activate(&self, identity: &ToolchainIdentity, force: bool) -> ActivationResult<EnvGuard> {
        self.activation_scope(&ProcessEnv, identity, force)
    }
}

/// Diff for `identity` on this host against the current environment.
pub fn compute_diff_for(identity: &ToolchainIdentity, force: bool) -> ActivationResult<EnvironmentDiff> {
    Activator::system().compute_diff_for(identity, force)
}

/// Activate `identity` in this process until the returned guard is dropped.
pub fn activation_scope(identity: &ToolchainIdentity, force: bool) -> ActivationResult<EnvGuard> {
    Activator::system().activate(identity, force)
}
