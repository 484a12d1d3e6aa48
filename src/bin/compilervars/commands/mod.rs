//! Command implementations

pub mod command;
pub mod diff;
pub mod run;
pub mod show;

use anyhow::{Context as _, Result};

use compilervars::core::identity::{IdentityOverrides, ToolchainIdentity};
use compilervars::ops::Activator;
use compilervars::util::config::{global_config_path, load_config, project_config_path};

use crate::cli::IdentityArgs;

/// The identity to activate and an activator built from merged config.
pub struct Context {
    pub identity: ToolchainIdentity,
    pub force: bool,
    pub activator: Activator,
    pub color: bool,
}

impl Context {
    /// Merge config files with command-line overrides.
    pub fn load(args: &IdentityArgs, color: bool) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let mut config = load_config(
            global_config_path().as_deref(),
            &project_config_path(&cwd),
        );

        if args.base.is_some() {
            config.toolchain.base = args.base.clone();
        }
        if args.base_version.is_some() {
            config.toolchain.base_version = args.base_version.clone();
        }

        let overrides = IdentityOverrides {
            compiler: args.compiler.clone(),
            arch: args.arch.clone(),
            version: args.version.clone(),
        };
        let identity = ToolchainIdentity::from_settings(&config.toolchain, &overrides);
        let force = args.force || config.activation.force.unwrap_or(false);
        let activator = Activator::from_config(&config);

        tracing::debug!("Toolchain: {}", identity);

        Ok(Context {
            identity,
            force,
            activator,
            color,
        })
    }
}
