//! Installation discovery for the vendor compiler.
//!
//! Two strategies, chosen by the base compiler:
//! - `gcc`: the conventional install directory
//!   `<root>/compiler_and_libraries_20<major>/linux`, if it exists on disk.
//! - `Visual Studio`: a two-step lookup in the machine configuration store,
//!   first the suite `SubKey` for the version and architecture, then the
//!   `LatestDir` recorded under that sub key.
//!
//! Every failure along the way means "not installed" and yields `None`.

use std::path::{Path, PathBuf};

use crate::core::identity::{major_version, ToolchainIdentity, BASE_GCC, BASE_VISUAL_STUDIO};

use super::store::{ConfigStore, SystemStore};

/// Default root of the filesystem-convention strategy.
pub const DEFAULT_INSTALL_ROOT: &str = "/opt/intel";

const SUITES_KEY: &str = r"SOFTWARE\WOW6432Node\Intel\Suites";

/// Map an architecture to the vendor's store token.
pub fn store_arch(arch: &str) -> Option<&'static str> {
    match arch {
        "x86" => Some("IA32"),
        "x86_64" => Some("EM64T"),
        _ => None,
    }
}

/// Store key holding the `SubKey` value for a suite version and architecture.
pub fn suite_defaults_key(version: &str, store_arch: &str) -> String {
    format!(r"{}\{}\Defaults\C++\{}", SUITES_KEY, version, store_arch)
}

/// Store key holding the `LatestDir` value for a suite sub key.
pub fn suite_compiler_key(version: &str, sub_key: &str) -> String {
    format!(r"{}\{}\{}\C++", SUITES_KEY, version, sub_key)
}

/// Conventional install directory for a compiler version under `root`.
pub fn conventional_install_dir(root: &Path, version: &str) -> Option<PathBuf> {
    let year = format!("20{}", major_version(version)?);
    Some(
        root.join(format!("compiler_and_libraries_{}", year))
            .join("linux"),
    )
}

/// Finds where the vendor compiler is installed.
#[derive(Debug, Clone)]
pub struct InstallationResolver<S = SystemStore> {
    install_root: PathBuf,
    store: S,
}

impl InstallationResolver<SystemStore> {
    /// Resolver using the default install root and the host's store.
    pub fn system() -> Self {
        InstallationResolver::new(DEFAULT_INSTALL_ROOT, SystemStore)
    }
}

impl Default for InstallationResolver<SystemStore> {
    fn default() -> Self {
        InstallationResolver::system()
    }
}

impl<S: ConfigStore> InstallationResolver<S> {
    /// Create a resolver with an explicit install root and store.
    pub fn new(install_root: impl Into<PathBuf>, store: S) -> Self {
        InstallationResolver {
            install_root: install_root.into(),
            store,
        }
    }

    /// Root searched by the filesystem-convention strategy.
    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    /// Resolve the installation directory, or `None` if the toolchain does
    /// not apply or is not installed.
    pub fn resolve(&self, identity: &ToolchainIdentity) -> Option<PathBuf> {
        if !identity.is_vendor() {
            return None;
        }

        match identity.base() {
            Some(BASE_GCC) => self.resolve_conventional(identity),
            Some(BASE_VISUAL_STUDIO) => self.resolve_from_store(identity),
            other => {
                tracing::debug!("No installation strategy for base compiler {:?}", other);
                None
            }
        }
    }

    fn resolve_conventional(&self, identity: &ToolchainIdentity) -> Option<PathBuf> {
        let version = identity.version.as_deref()?;
        let dir = conventional_install_dir(&self.install_root, version)?;

        if dir.is_dir() {
            tracing::debug!("Found installation at {}", dir.display());
            Some(dir)
        } else {
            tracing::debug!("Installation directory not found: {}", dir.display());
            None
        }
    }

    fn resolve_from_store(&self, identity: &ToolchainIdentity) -> Option<PathBuf> {
        let arch = store_arch(identity.architecture.as_deref()?)?;
        let version = identity.version.as_deref().filter(|v| !v.is_empty())?;

        let defaults_key = suite_defaults_key(version, arch);
        let Some(sub_key) = self
            .store
            .read(&defaults_key, "SubKey")
            .filter(|v| !v.is_empty())
        else {
            tracing::debug!("No SubKey under {}", defaults_key);
            return None;
        };

        let compiler_key = suite_compiler_key(version, &sub_key);
        let Some(latest) = self
            .store
            .read(&compiler_key, "LatestDir")
            .filter(|v| !v.is_empty())
        else {
            tracing::debug!("No LatestDir under {}", compiler_key);
            return None;
        };

        tracing::debug!("Found installation at {} (from store)", latest);
        Some(PathBuf::from(latest))
    }
}
