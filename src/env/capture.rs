//! Running an activation command and capturing the environment it leaves.
//!
//! The command runs in a throwaway shell. In the same shell session, after
//! the activation script returns, a freshly generated marker line is printed
//! followed by a dump of the whole environment:
//!
//! - `cmd.exe`: `<activation> && echo <marker>&& set`, one `KEY=VALUE` per line.
//! - POSIX: `<activation> && printf '%s\n' <marker> && env -0`, NUL-separated
//!   `KEY=VALUE` entries.
//!
//! Everything before the marker line is the script's own output and is
//! ignored.

use std::path::{Path, PathBuf};

use crate::builder::command::{ActivationCommand, ShellKind};
use crate::core::platform::HostPlatform;
use crate::env::diff::EnvironmentDiff;
use crate::env::snapshot::EnvironmentSnapshot;
use crate::util::errors::{ActivationError, ActivationResult};
use crate::util::process::{find_executable, ProcessBuilder, ProcessRunner};

/// Unique token separating script output from the environment dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpMarker(String);

impl DumpMarker {
    /// Generate a fresh random marker.
    pub fn generate() -> Self {
        DumpMarker(format!("compilervars-{}", uuid::Uuid::new_v4().simple()))
    }

    /// Use a fixed marker.
    pub fn new(marker: impl Into<String>) -> Self {
        DumpMarker(marker.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DumpMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encoding of the environment dump that follows the marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpFormat {
    /// `KEY=VALUE` lines; lines without `=` continue the previous value
    Lines,
    /// NUL-terminated `KEY=VALUE` entries
    NulSeparated,
}

impl DumpFormat {
    /// The dump format produced for a shell family.
    pub fn for_shell(shell: ShellKind) -> Self {
        match shell {
            ShellKind::Cmd => DumpFormat::Lines,
            ShellKind::Posix => DumpFormat::NulSeparated,
        }
    }
}

/// Split captured stdout at the marker line and decode the dump after it.
///
/// The marker only counts when it stands on a line of its own (trailing
/// blanks allowed), so an echoed command line that merely contains it is
/// skipped. Returns a description of
/// the problem when the marker is missing or the dump cannot be decoded.
pub fn parse_dump(
    stdout: &str,
    marker: &DumpMarker,
    format: DumpFormat,
) -> Result<EnvironmentSnapshot, String> {
    let payload = split_at_marker(stdout, marker.as_str())
        .ok_or_else(|| format!("marker `{}` not found in output", marker))?;

    let snapshot = match format {
        DumpFormat::NulSeparated => decode_nul_separated(payload)?,
        DumpFormat::Lines => decode_lines(payload)?,
    };

    if snapshot.is_empty() {
        return Err("environment dump after the marker is empty".to_string());
    }

    Ok(snapshot)
}

fn split_at_marker<'a>(stdout: &'a str, marker: &str) -> Option<&'a str> {
    stdout.match_indices(marker).find_map(|(start, _)| {
        let at_line_start = start == 0 || stdout[..start].ends_with('\n');
        let rest = stdout[start + marker.len()..].trim_start_matches([' ', '\t']);
        let rest = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'));
        match rest {
            Some(payload) if at_line_start => Some(payload),
            _ => None,
        }
    })
}

fn decode_nul_separated(payload: &str) -> Result<EnvironmentSnapshot, String> {
    let mut snapshot = EnvironmentSnapshot::new();

    for entry in payload.split('\0') {
        // A trailing newline after the last NUL is not an entry
        if entry.trim().is_empty() {
            continue;
        }
        match entry.split_once('=') {
            Some((key, value)) if !key.is_empty() => snapshot.insert(key, value),
            _ => return Err(format!("malformed environment entry `{}`", entry)),
        }
    }

    Ok(snapshot)
}

fn decode_lines(payload: &str) -> Result<EnvironmentSnapshot, String> {
    let mut entries: Vec<(String, String)> = Vec::new();

    for line in payload.lines() {
        match line.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                entries.push((key.to_string(), value.to_string()));
            }
            _ => match entries.last_mut() {
                Some((_, value)) => {
                    value.push('\n');
                    value.push_str(line);
                }
                None if line.trim().is_empty() => {}
                None => return Err(format!("malformed environment line `{}`", line)),
            },
        }
    }

    Ok(entries.into_iter().collect())
}

/// Runs activation commands in a child shell and captures the result.
#[derive(Debug, Clone)]
pub struct EnvCapture {
    posix_shell: PathBuf,
}

impl Default for EnvCapture {
    fn default() -> Self {
        EnvCapture::new(default_posix_shell())
    }
}

/// `bash` if available, `sh` otherwise.
///
/// The POSIX activation script takes arguments while being dot-sourced,
/// which plain `sh` implementations may not pass through.
pub fn default_posix_shell() -> PathBuf {
    find_executable("bash").unwrap_or_else(|| PathBuf::from("sh"))
}

impl EnvCapture {
    /// Capture using the given POSIX shell for dot-sourced scripts.
    pub fn new(posix_shell: impl Into<PathBuf>) -> Self {
        EnvCapture {
            posix_shell: posix_shell.into(),
        }
    }

    pub fn posix_shell(&self) -> &Path {
        &self.posix_shell
    }

    /// Wrap an activation command so the same shell session dumps its
    /// environment after the marker.
    pub fn wrap(&self, command: &ActivationCommand, marker: &DumpMarker) -> ProcessBuilder {
        let line = command.command_line();

        match command.shell() {
            ShellKind::Cmd => {
                // `echo` would print a space before `&&` as part of the marker line
                let script = format!("{} && echo {}&& set", line, marker);
                // `/s` makes cmd strip exactly the outer quotes
                ProcessBuilder::new("cmd")
                    .args(["/d", "/s", "/c"])
                    .raw_arg(format!("\"{}\"", script))
            }
            ShellKind::Posix => {
                let script = format!("{} && printf '%s\\n' {} && env -0", line, marker);
                ProcessBuilder::new(&self.posix_shell).arg("-c").arg(script)
            }
        }
    }

    /// Run the command and return the environment it leaves behind.
    pub fn capture(
        &self,
        runner: &dyn ProcessRunner,
        command: &ActivationCommand,
    ) -> ActivationResult<EnvironmentSnapshot> {
        let marker = DumpMarker::generate();
        let process = self.wrap(command, &marker);
        let shown = command.command_line();

        tracing::info!("Running activation script: {}", shown);

        let output = runner
            .run(&process)
            .map_err(|source| ActivationError::Spawn {
                command: process.display_command(),
                source,
            })?;

        if !output.success() {
            return Err(ActivationError::activation_failed(
                shown,
                output.status,
                output.combined(),
                "activation command exited with a non-zero status",
            ));
        }

        let format = DumpFormat::for_shell(command.shell());
        let snapshot = parse_dump(&output.stdout, &marker, format).map_err(|reason| {
            ActivationError::activation_failed(
                shown.clone(),
                output.status,
                output.combined(),
                reason,
            )
        })?;

        tracing::debug!("Captured {} variables after activation", snapshot.len());
        Ok(snapshot)
    }

    /// Run the command and diff its environment against `before`.
    ///
    /// The dump comes from a child shell, so variables the shell maintains
    /// itself (`_`, `SHLVL`, `PWD` and the like) can differ from `before`
    /// and show up in the diff even though the script did not touch them.
    pub fn compute_diff(
        &self,
        runner: &dyn ProcessRunner,
        command: &ActivationCommand,
        before: &EnvironmentSnapshot,
        platform: HostPlatform,
    ) -> ActivationResult<EnvironmentDiff> {
        let after = self.capture(runner, command)?;
        Ok(EnvironmentDiff::compute(before, &after, platform))
    }
}
