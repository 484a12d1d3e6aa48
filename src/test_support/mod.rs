//! Test utilities and mocks for unit tests.
//!
//! Provides stand-ins for the two host interfaces activation depends on:
//! process execution and the machine configuration store.
//!
//! # Example
//!
//! ```rust,ignore
//! use compilervars::test_support::{nul_dump, MockExecutor};
//!
//! #[test]
//! fn test_example() {
//!     let exec = MockExecutor::new();
//!     exec.respond_with_dump(nul_dump(&[("PATH", "/opt/intel/bin:/usr/bin")]));
//!
//!     // Pass `&exec` wherever a ProcessRunner is expected...
//! }
//! ```

use std::cell::RefCell;
use std::collections::HashMap;

use anyhow::{bail, Result};

use crate::resolver::ConfigStore;
use crate::util::process::{ProcessBuilder, ProcessOutput, ProcessRunner};

/// Placeholder in canned stdout replaced by the marker of the actual command.
pub const MARKER_PLACEHOLDER: &str = "{marker}";

const MARKER_PREFIX: &str = "compilervars-";
const MARKER_HEX_LEN: usize = 32;

/// Mock process output for testing command execution.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl MockProcessOutput {
    /// Create a successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

impl From<MockProcessOutput> for ProcessOutput {
    fn from(mock: MockProcessOutput) -> Self {
        ProcessOutput {
            status: Some(mock.status),
            stdout: mock.stdout,
            stderr: mock.stderr,
        }
    }
}

/// Pattern for matching commands in MockExecutor.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command contains substring.
    Contains(String),
}

impl CommandPattern {
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::Contains(s) => cmd.contains(s),
        }
    }
}

/// Mock process runner.
///
/// Records every command it is asked to run and answers from a list of
/// expectations, falling back to a default output. Unmatched commands fail
/// as if the program could not be spawned.
///
/// `{marker}` in canned stdout is replaced with the dump marker found in
/// the command, so dumps line up with freshly generated markers.
#[derive(Debug, Default)]
pub struct MockExecutor {
    expectations: RefCell<Vec<(CommandPattern, MockProcessOutput)>>,
    calls: RefCell<Vec<String>>,
    default_output: RefCell<Option<MockProcessOutput>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        MockExecutor::default()
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&self, cmd: &str, output: MockProcessOutput) -> &Self {
        self.expectations
            .borrow_mut()
            .push((CommandPattern::Exact(cmd.to_string()), output));
        self
    }

    /// Add an expectation for a command containing a substring.
    pub fn expect_contains(&self, substring: &str, output: MockProcessOutput) -> &Self {
        self.expectations
            .borrow_mut()
            .push((CommandPattern::Contains(substring.to_string()), output));
        self
    }

    /// Set a default output for commands that don't match any expectation.
    pub fn set_default(&self, output: MockProcessOutput) -> &Self {
        *self.default_output.borrow_mut() = Some(output);
        self
    }

    /// Answer every command with a successful run printing `stdout`.
    pub fn respond_with_dump(&self, stdout: impl Into<String>) -> &Self {
        self.set_default(MockProcessOutput::success(stdout))
    }

    /// All commands that were run, as displayed command lines.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl ProcessRunner for MockExecutor {
    fn run(&self, cmd: &ProcessBuilder) -> Result<ProcessOutput> {
        let full_cmd = cmd.display_command();
        self.calls.borrow_mut().push(full_cmd.clone());

        let matched = self
            .expectations
            .borrow()
            .iter()
            .find(|(pattern, _)| pattern.matches(&full_cmd))
            .map(|(_, output)| output.clone())
            .or_else(|| self.default_output.borrow().clone());

        let Some(mut output) = matched else {
            bail!("unexpected command: {}", full_cmd)
        };

        if let Some(marker) = find_marker(&full_cmd) {
            output.stdout = output.stdout.replace(MARKER_PLACEHOLDER, marker);
        }

        Ok(output.into())
    }
}

/// Extract a generated dump marker from a command line.
fn find_marker(cmd: &str) -> Option<&str> {
    cmd.match_indices(MARKER_PREFIX).find_map(|(start, _)| {
        let end = start + MARKER_PREFIX.len() + MARKER_HEX_LEN;
        let candidate = cmd.get(start..end)?;
        candidate[MARKER_PREFIX.len()..]
            .chars()
            .all(|c| c.is_ascii_hexdigit())
            .then_some(candidate)
    })
}

/// In-memory configuration store keyed by `(path, value name)`.
#[derive(Debug, Clone, Default)]
pub struct MockConfigStore {
    values: HashMap<(String, String), String>,
}

impl MockConfigStore {
    pub fn new() -> Self {
        MockConfigStore::default()
    }

    pub fn insert(&mut self, path: &str, value_name: &str, value: &str) -> &mut Self {
        self.values
            .insert((path.to_string(), value_name.to_string()), value.to_string());
        self
    }
}

impl ConfigStore for MockConfigStore {
    fn read(&self, path: &str, value_name: &str) -> Option<String> {
        self.values
            .get(&(path.to_string(), value_name.to_string()))
            .cloned()
    }
}

/// Stdout of a POSIX capture: banner, marker line, NUL-terminated entries.
pub fn nul_dump(vars: &[(&str, &str)]) -> String {
    let mut out = String::from("Intel(R) compiler environment set\n");
    out.push_str(MARKER_PLACEHOLDER);
    out.push('\n');
    for (key, value) in vars {
        out.push_str(&format!("{}={}\0", key, value));
    }
    out
}

/// Stdout of a cmd.exe capture: CRLF lines after the marker line.
pub fn lines_dump(vars: &[(&str, &str)]) -> String {
    let mut out = String::from(MARKER_PLACEHOLDER);
    out.push_str("\r\n");
    for (key, value) in vars {
        out.push_str(&format!("{}={}\r\n", key, value));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_executor_records_calls() {
        let exec = MockExecutor::new();
        exec.expect("gcc --version", MockProcessOutput::success("gcc 12.0.0"));

        let out = exec
            .run(&ProcessBuilder::new("gcc").arg("--version"))
            .unwrap();
        assert!(out.success());
        assert_eq!(out.stdout, "gcc 12.0.0");
        assert_eq!(exec.calls(), ["gcc --version"]);
    }

    #[test]
    fn test_mock_executor_unexpected() {
        let exec = MockExecutor::new();
        assert!(exec.run(&ProcessBuilder::new("make")).is_err());
        assert_eq!(exec.call_count(), 1);
    }

    #[test]
    fn test_marker_substitution() {
        let exec = MockExecutor::new();
        exec.respond_with_dump(nul_dump(&[("A", "1")]));

        let marker = format!("compilervars-{}", "ab".repeat(16));
        let cmd = ProcessBuilder::new("sh")
            .arg("-c")
            .arg(format!("true && printf '%s\\n' {} && env -0", marker));
        let out = exec.run(&cmd).unwrap();

        assert!(out.stdout.contains(&format!("\n{}\n", marker)));
        assert!(!out.stdout.contains(MARKER_PLACEHOLDER));
    }

    #[test]
    fn test_mock_config_store() {
        let mut store = MockConfigStore::new();
        store.insert(r"SOFTWARE\Key", "Value", "data");

        assert_eq!(store.read(r"SOFTWARE\Key", "Value").as_deref(), Some("data"));
        assert_eq!(store.read(r"SOFTWARE\Key", "Other"), None);
    }
}
