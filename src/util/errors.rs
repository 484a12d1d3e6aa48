//! Activation error types and diagnostics.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Result alias for activation operations.
pub type ActivationResult<T> = std::result::Result<T, ActivationError>;

/// Hard failures of the activation pipeline.
///
/// A missing toolchain is not an error; these variants only cover
/// inconsistent caller metadata and activation scripts that misbehave.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ActivationError {
    #[error("configuration defect: {message}")]
    #[diagnostic(code(compilervars::config_defect))]
    ConfigurationDefect { message: String },

    #[error("activation failed: {reason}")]
    #[diagnostic(
        code(compilervars::activation_failed),
        help("Run the activation command by hand to see what the script reports")
    )]
    ActivationFailed {
        /// Printable command line that was run
        command: String,
        /// Exit code, if the process exited normally
        exit_code: Option<i32>,
        /// Captured stdout followed by stderr
        output: String,
        /// What went wrong
        reason: String,
    },

    #[error("failed to start `{command}`")]
    #[diagnostic(code(compilervars::spawn))]
    Spawn {
        command: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ActivationError {
    /// An unmapped base-compiler version.
    pub fn unknown_base_version(version: &str) -> Self {
        ActivationError::ConfigurationDefect {
            message: format!(
                "unknown Visual Studio version `{}` for the vendor activation script",
                version
            ),
        }
    }

    /// The child process ran but did not produce a usable result.
    pub fn activation_failed(
        command: impl Into<String>,
        exit_code: Option<i32>,
        output: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ActivationError::ActivationFailed {
            command: command.into(),
            exit_code,
            output: output.into(),
            reason: reason.into(),
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ActivationError::ConfigurationDefect { message } => Diagnostic::error(message.clone())
                .with_suggestion(suggestions::CHECK_BASE_VERSION),

            ActivationError::ActivationFailed {
                command,
                exit_code,
                output,
                reason,
            } => {
                let mut diag = Diagnostic::error(format!("activation failed: {}", reason))
                    .with_context(format!("command: {}", command));

                if let Some(code) = exit_code {
                    diag = diag.with_context(format!("exit code: {}", code));
                }

                let trimmed = output.trim();
                if !trimmed.is_empty() {
                    diag = diag.with_context(format!("output:\n{}", trimmed));
                }

                diag.with_suggestion(suggestions::CHECK_SCRIPT)
                    .with_suggestion(suggestions::FORCE)
            }

            ActivationError::Spawn { command, source } => {
                Diagnostic::error(format!("failed to start `{}`", command))
                    .with_context(format!("{:#}", source))
                    .with_suggestion(suggestions::CHECK_SHELL)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_base_version_message() {
        let err = ActivationError::unknown_base_version("99");
        assert!(err.to_string().contains("`99`"));
        assert!(matches!(err, ActivationError::ConfigurationDefect { .. }));
    }

    #[test]
    fn test_activation_failed_diagnostic_includes_output() {
        let err = ActivationError::activation_failed(
            "cmd /c call compilervars.bat",
            Some(1),
            "The system cannot find the path specified.",
            "process exited with a non-zero status",
        );

        let output = err.to_diagnostic().format(false);
        assert!(output.contains("error: activation failed"));
        assert!(output.contains("exit code: 1"));
        assert!(output.contains("cannot find the path"));
        assert!(output.contains("help: consider:"));
    }
}
