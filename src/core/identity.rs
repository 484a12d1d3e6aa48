//! Toolchain identity.
//!
//! A [`ToolchainIdentity`] is the small set of settings that decides whether
//! the vendor activation machinery applies at all, where the installation
//! lives, and which activation script arguments to use.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

/// Compiler family tag that the activation machinery applies to.
pub const VENDOR_FAMILY: &str = "intel";

/// Base compiler whose installation is found by filesystem convention.
pub const BASE_GCC: &str = "gcc";

/// Base compiler whose installation is found in the platform configuration store.
pub const BASE_VISUAL_STUDIO: &str = "Visual Studio";

/// Setting keys understood by [`ToolchainIdentity::from_settings`].
pub mod keys {
    pub const COMPILER: &str = "compiler";
    pub const BASE: &str = "compiler.base";
    pub const BASE_VERSION: &str = "compiler.base.version";
    pub const VERSION: &str = "compiler.version";
    pub const ARCH: &str = "arch";
}

/// Read-only source of toolchain settings.
pub trait Settings {
    /// Look up a setting by key, returning `None` when it is not set.
    fn get(&self, key: &str) -> Option<String>;
}

impl Settings for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl Settings for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }
}

impl<S: Settings + ?Sized> Settings for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// Explicit values that take precedence over [`Settings`].
#[derive(Debug, Clone, Default)]
pub struct IdentityOverrides {
    pub compiler: Option<String>,
    pub arch: Option<String>,
    pub version: Option<String>,
}

/// Identity of the toolchain to activate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ToolchainIdentity {
    /// Compiler family (e.g. `intel`)
    pub family: String,
    /// Base compiler the vendor compiler sits on (`gcc`, `Visual Studio`)
    pub base_compiler: Option<String>,
    /// Version of the base compiler (only used for Visual Studio)
    pub base_version: Option<String>,
    /// Target architecture (`x86`, `x86_64`)
    pub architecture: Option<String>,
    /// Vendor compiler version (e.g. `19.1`)
    pub version: Option<String>,
}

impl ToolchainIdentity {
    /// Create an identity for the given compiler family.
    pub fn new(family: impl Into<String>) -> Self {
        ToolchainIdentity {
            family: family.into(),
            ..Default::default()
        }
    }

    /// Set the base compiler.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base_compiler = Some(base.into());
        self
    }

    /// Set the base compiler version.
    pub fn with_base_version(mut self, version: impl Into<String>) -> Self {
        self.base_version = Some(version.into());
        self
    }

    /// Set the target architecture.
    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.architecture = Some(arch.into());
        self
    }

    /// Set the vendor compiler version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Build an identity from settings, letting explicit overrides win.
    ///
    /// The version setting is only consulted when the compiler family read
    /// from settings is the vendor family; an overridden family with no
    /// explicit version has no version.
    pub fn from_settings(settings: &dyn Settings, overrides: &IdentityOverrides) -> Self {
        let family = overrides
            .compiler
            .clone()
            .or_else(|| settings.get(keys::COMPILER))
            .unwrap_or_default();

        let version = overrides.version.clone().or_else(|| {
            if family == VENDOR_FAMILY {
                settings.get(keys::VERSION)
            } else {
                None
            }
        });

        ToolchainIdentity {
            family,
            base_compiler: settings.get(keys::BASE),
            base_version: settings.get(keys::BASE_VERSION),
            architecture: overrides.arch.clone().or_else(|| settings.get(keys::ARCH)),
            version,
        }
    }

    /// Whether this identity belongs to the supported vendor.
    pub fn is_vendor(&self) -> bool {
        self.family == VENDOR_FAMILY
    }

    /// The base compiler as a string slice.
    pub fn base(&self) -> Option<&str> {
        self.base_compiler.as_deref()
    }
}

impl std::fmt::Display for ToolchainIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.family)?;
        if let Some(ref version) = self.version {
            write!(f, " {}", version)?;
        }
        if let Some(ref base) = self.base_compiler {
            write!(f, " ({}", base)?;
            if let Some(ref base_version) = self.base_version {
                write!(f, " {}", base_version)?;
            }
            write!(f, ")")?;
        }
        if let Some(ref arch) = self.architecture {
            write!(f, " [{}]", arch)?;
        }
        Ok(())
    }
}

/// Major component of a dotted version, as a short numeric string.
///
/// `"19.1.0"` gives `"19"`. Returns `None` when the leading component is
/// empty or not numeric.
pub fn major_version(version: &str) -> Option<String> {
    let major = version.trim().split('.').next()?.trim();
    if major.is_empty() || !major.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(major.to_string())
}
