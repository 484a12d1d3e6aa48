//! Activation command construction.
//!
//! The vendor ships one activation script per shell family:
//! `bin/compilervars.bat` (run with `call` from `cmd.exe`) and
//! `bin/compilervars.sh` (dot-sourced so its exports stay in the invoking
//! shell). This module only builds the tokens; running them is the capture
//! step's job.

use std::path::Path;

use crate::core::identity::{ToolchainIdentity, BASE_VISUAL_STUDIO};
use crate::core::platform::HostPlatform;
use crate::env::snapshot::EnvironmentSnapshot;
use crate::util::errors::{ActivationError, ActivationResult};

/// Variable the vendor script sets once the environment is activated.
pub const SENTINEL_VAR: &str = "PSTLROOT";

/// Activation script for `cmd.exe`.
pub const WINDOWS_SCRIPT: &str = "compilervars.bat";

/// Activation script for POSIX shells.
pub const POSIX_SCRIPT: &str = "compilervars.sh";

const NOOP_MESSAGE: &str = "compilervars: environment already set";

/// Visual Studio major versions and the script's matching tags.
const VISUAL_STUDIO_TAGS: &[(&str, &str)] = &[
    ("8", "vs2005"),
    ("9", "vs2008"),
    ("10", "vs2010"),
    ("11", "vs2012"),
    ("12", "vs2013"),
    ("14", "vs2015"),
    ("15", "vs2017"),
    ("16", "vs2019"),
];

/// Map an architecture to the activation script's `-arch` token.
pub fn script_arch(arch: &str) -> Option<&'static str> {
    match arch {
        "x86" => Some("ia32"),
        "x86_64" => Some("intel64"),
        _ => None,
    }
}

/// Map a Visual Studio major version to the script's year tag.
pub fn visual_studio_tag(base_version: &str) -> Option<&'static str> {
    VISUAL_STUDIO_TAGS
        .iter()
        .find(|(version, _)| *version == base_version)
        .map(|(_, tag)| *tag)
}

/// Shell family an activation command is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellKind {
    /// `cmd.exe`
    Cmd,
    /// `sh`-compatible shells
    Posix,
}

/// A complete shell invocation that sources the vendor activation script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationCommand {
    tokens: Vec<String>,
    shell: ShellKind,
    noop: bool,
}

impl ActivationCommand {
    /// Inert command used when the environment is already activated.
    pub fn noop(shell: ShellKind) -> Self {
        ActivationCommand {
            tokens: vec!["echo".to_string(), NOOP_MESSAGE.to_string()],
            shell,
            noop: true,
        }
    }

    /// Command tokens, program first.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Shell family the tokens are meant for.
    pub fn shell(&self) -> ShellKind {
        self.shell
    }

    /// Whether this command changes nothing.
    pub fn is_noop(&self) -> bool {
        self.noop
    }

    /// Flatten the tokens into one command line quoted for its shell.
    ///
    /// Meant for display and for embedding in a shell script.
    pub fn command_line(&self) -> String {
        match self.shell {
            ShellKind::Cmd => windows_command_line(&self.tokens),
            ShellKind::Posix => posix_command_line(&self.tokens),
        }
    }
}

impl std::fmt::Display for ActivationCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.command_line())
    }
}

/// Quote arguments the way the Microsoft C runtime parses them back.
fn windows_command_line(tokens: &[String]) -> String {
    let mut line = String::new();

    for (i, arg) in tokens.iter().enumerate() {
        if i > 0 {
            line.push(' ');
        }

        let needs_quotes = arg.is_empty() || arg.contains([' ', '\t']);
        if needs_quotes {
            line.push('"');
        }

        let mut backslashes = 0usize;
        for c in arg.chars() {
            match c {
                '\\' => backslashes += 1,
                '"' => {
                    line.push_str(&"\\".repeat(backslashes * 2));
                    line.push_str("\\\"");
                    backslashes = 0;
                }
                _ => {
                    line.push_str(&"\\".repeat(backslashes));
                    backslashes = 0;
                    line.push(c);
                }
            }
        }

        if needs_quotes {
            // Backslashes before the closing quote must be doubled
            line.push_str(&"\\".repeat(backslashes * 2));
            line.push('"');
        } else {
            line.push_str(&"\\".repeat(backslashes));
        }
    }

    line
}

fn posix_command_line(tokens: &[String]) -> String {
    shlex::try_join(tokens.iter().map(String::as_str)).unwrap_or_else(|e| {
        tracing::warn!("Cannot quote activation command ({}), joining verbatim", e);
        tokens.join(" ")
    })
}

/// Builds activation commands against an observed environment.
///
/// The environment is only consulted for the sentinel variable.
#[derive(Debug, Clone, Copy)]
pub struct CommandBuilder<'a> {
    env: &'a EnvironmentSnapshot,
    platform: HostPlatform,
}

impl<'a> CommandBuilder<'a> {
    pub fn new(env: &'a EnvironmentSnapshot, platform: HostPlatform) -> Self {
        CommandBuilder { env, platform }
    }

    /// Whether activation should be skipped because it already happened.
    pub fn already_active(&self, force: bool) -> bool {
        !force && self.env.contains(SENTINEL_VAR, self.platform)
    }

    /// Build the activation command.
    ///
    /// Returns a no-op command when the sentinel is set and `force` is
    /// false, `None` when there is no installation or the architecture is
    /// not supported, and an error only when the base compiler version is
    /// missing from the Visual Studio table.
    pub fn build(
        &self,
        identity: &ToolchainIdentity,
        install_dir: Option<&Path>,
        arch: Option<&str>,
        force: bool,
    ) -> ActivationResult<Option<ActivationCommand>> {
        let is_visual_studio = identity.base() == Some(BASE_VISUAL_STUDIO);
        let shell = if is_visual_studio {
            ShellKind::Cmd
        } else {
            ShellKind::Posix
        };

        if self.already_active(force) {
            tracing::debug!("{} is set, activation already performed", SENTINEL_VAR);
            return Ok(Some(ActivationCommand::noop(shell)));
        }

        let Some(install_dir) = install_dir else {
            return Ok(None);
        };

        let Some(arch) = arch.and_then(script_arch) else {
            tracing::debug!("Unsupported architecture for activation: {:?}", arch);
            return Ok(None);
        };

        let bin = install_dir.join("bin");

        let tokens = if is_visual_studio {
            let mut tokens = vec![
                "call".to_string(),
                bin.join(WINDOWS_SCRIPT).display().to_string(),
                "-arch".to_string(),
                arch.to_string(),
            ];
            if let Some(ref base_version) = identity.base_version {
                let tag = visual_studio_tag(base_version)
                    .ok_or_else(|| ActivationError::unknown_base_version(base_version))?;
                tokens.push(tag.to_string());
            }
            tokens
        } else {
            vec![
                ".".to_string(),
                bin.join(POSIX_SCRIPT).display().to_string(),
                "-arch".to_string(),
                arch.to_string(),
            ]
        };

        Ok(Some(ActivationCommand {
            tokens,
            shell,
            noop: false,
        }))
    }
}
