//! Configuration file support.
//!
//! Two configuration file locations are read:
//! - Global: `~/.compilervars/config.toml` - User-wide defaults
//! - Project: `.compilervars/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, field by field.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::identity::{keys, Settings};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Toolchain identity settings
    pub toolchain: ToolchainSettings,

    /// Activation behavior
    pub activation: ActivationConfig,
}

/// Toolchain identity as written in config files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSettings {
    /// Compiler family (e.g. "intel")
    pub compiler: Option<String>,

    /// Base compiler ("gcc" or "Visual Studio")
    pub base: Option<String>,

    /// Base compiler version (e.g. "15" for Visual Studio 2017)
    pub base_version: Option<String>,

    /// Vendor compiler version (e.g. "19.1")
    pub version: Option<String>,

    /// Target architecture ("x86" or "x86_64")
    pub arch: Option<String>,
}

impl Settings for ToolchainSettings {
    fn get(&self, key: &str) -> Option<String> {
        match key {
            keys::COMPILER => self.compiler.clone(),
            keys::BASE => self.base.clone(),
            keys::BASE_VERSION => self.base_version.clone(),
            keys::VERSION => self.version.clone(),
            keys::ARCH => self.arch.clone(),
            _ => None,
        }
    }
}

/// Activation behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivationConfig {
    /// Re-run activation even if the sentinel variable is set
    pub force: Option<bool>,

    /// Root searched for conventional installations (default: /opt/intel)
    pub install_root: Option<PathBuf>,

    /// POSIX shell used to dot-source the activation script
    pub shell: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file doesn't exist
    /// or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create config directory: {}", parent.display())
            })?;
        }

        let contents =
            toml::to_string_pretty(self).with_context(|| "failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("failed to write config: {}", path.display()))?;

        Ok(())
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        let tc = other.toolchain;
        if tc.compiler.is_some() {
            self.toolchain.compiler = tc.compiler;
        }
        if tc.base.is_some() {
            self.toolchain.base = tc.base;
        }
        if tc.base_version.is_some() {
            self.toolchain.base_version = tc.base_version;
        }
        if tc.version.is_some() {
            self.toolchain.version = tc.version;
        }
        if tc.arch.is_some() {
            self.toolchain.arch = tc.arch;
        }

        let act = other.activation;
        if act.force.is_some() {
            self.activation.force = act.force;
        }
        if act.install_root.is_some() {
            self.activation.install_root = act.install_root;
        }
        if act.shell.is_some() {
            self.activation.shell = act.shell;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.compilervars/config.toml)
/// 2. Global config (~/.compilervars/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global) = global_path {
        if global.exists() {
            config.merge(Config::load_or_default(global));
        }
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global config directory (~/.compilervars).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".compilervars"))
}

/// Get the global config path (~/.compilervars/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.compilervars/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".compilervars").join("config.toml")
}
