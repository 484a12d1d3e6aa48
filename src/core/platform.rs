//! Host platform conventions that affect environment handling.

use serde::Serialize;

/// The platform family whose environment conventions apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HostPlatform {
    /// `;`-separated path lists, case-insensitive variable names and values
    Windows,
    /// `:`-separated path lists, case-sensitive
    Posix,
}

impl HostPlatform {
    /// Detect the platform this process runs on.
    pub fn host() -> Self {
        if cfg!(windows) {
            HostPlatform::Windows
        } else {
            HostPlatform::Posix
        }
    }

    /// Separator between entries of a path-list variable.
    pub fn path_separator(self) -> char {
        match self {
            HostPlatform::Windows => ';',
            HostPlatform::Posix => ':',
        }
    }

    /// Whether variable names and values compare case-insensitively.
    pub fn case_insensitive(self) -> bool {
        matches!(self, HostPlatform::Windows)
    }

    /// Normalize a name or value for comparison on this platform.
    pub fn normalize(self, s: &str) -> String {
        if self.case_insensitive() {
            s.to_lowercase()
        } else {
            s.to_string()
        }
    }
}

impl Default for HostPlatform {
    fn default() -> Self {
        HostPlatform::host()
    }
}

impl std::fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostPlatform::Windows => write!(f, "windows"),
            HostPlatform::Posix => write!(f, "posix"),
        }
    }
}
