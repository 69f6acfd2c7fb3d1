//! Running camelot against a file on disk.
//!
//! The analyzer is invoked as
//!
//! ```text
//! <command> -show <json|ta> -f <path>
//! ```
//!
//! and its stdout is parsed according to the requested format. camelot reads
//! the file from disk, so results reflect the last saved contents.
//!
//! The child process is killed when the future driving it is dropped, so
//! cancelling a validation cycle also stops its analyzer run.
//!
//! Failures are returned as [`Invocation::Failed`] rather than `Err`: a
//! missing or broken analyzer must not disturb editing, and callers decide
//! what a failure means through [`Invocation::into_findings`].

use std::io;
use std::path::Path;
use std::process::{Output, Stdio};

use thiserror::Error;
use tokio::process::Command;

use crate::config::AnalyzerCommand;
use crate::output::{Finding, OutputFormat, ParseError};

/// Why an invocation produced no usable findings.
#[derive(Debug, Error)]
pub enum InvocationError {
    /// The process could not be started (missing binary, permissions, ...).
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        /// The program that failed to start.
        command: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The process ran but exited unsuccessfully.
    #[error("`{command}` exited with {status}{}", format_stderr(.stderr))]
    NonZeroExit {
        /// The program that failed.
        command: String,
        /// Exit status description.
        status: String,
        /// Captured stderr, trimmed.
        stderr: String,
    },

    /// The process succeeded but its output could not be decoded.
    #[error("could not decode output of `{command}`: {source}")]
    Decode {
        /// The program whose output was rejected.
        command: String,
        /// The parse failure.
        #[source]
        source: ParseError,
    },
}

fn format_stderr(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

/// The outcome of one analyzer run.
#[derive(Debug)]
pub enum Invocation {
    /// The analyzer ran and its output decoded.
    Findings(Vec<Finding>),
    /// The analyzer could not be run or its output was unusable.
    Failed(InvocationError),
}

impl Invocation {
    /// Whether this invocation failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Invocation::Failed(_))
    }

    /// Apply the fail-open policy: a failed invocation counts as no findings.
    pub fn into_findings(self) -> Vec<Finding> {
        match self {
            Invocation::Findings(findings) => findings,
            Invocation::Failed(error) => {
                tracing::debug!(%error, "analyzer invocation failed; treating as no findings");
                Vec::new()
            }
        }
    }
}

/// Build the analyzer command line for `document_path`.
pub fn build_command(command: &AnalyzerCommand, format: OutputFormat, document_path: &Path) -> Command {
    let mut cmd = Command::new(command.program());
    cmd.arg("-show")
        .arg(format.show_flag())
        .arg("-f")
        .arg(document_path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    cmd
}

/// Run the analyzer on `document_path` and parse its output.
///
/// Completes when the process exits. There is no timeout.
pub async fn invoke(command: &AnalyzerCommand, format: OutputFormat, document_path: &Path) -> Invocation {
    tracing::info!(
        "Running {} -show {} -f {}",
        command,
        format.show_flag(),
        document_path.display()
    );

    let output = match build_command(command, format, document_path).output().await {
        Ok(output) => output,
        Err(source) => {
            return Invocation::Failed(InvocationError::Spawn {
                command: command.to_string(),
                source,
            });
        }
    };

    match interpret_output(command, format, &output) {
        Ok(findings) => {
            tracing::debug!(count = findings.len(), "analyzer reported findings");
            Invocation::Findings(findings)
        }
        Err(error) => Invocation::Failed(error),
    }
}

fn interpret_output(
    command: &AnalyzerCommand,
    format: OutputFormat,
    output: &Output,
) -> Result<Vec<Finding>, InvocationError> {
    if !output.status.success() {
        return Err(InvocationError::NonZeroExit {
            command: command.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    format
        .parse(&stdout)
        .map_err(|source| InvocationError::Decode {
            command: command.to_string(),
            source,
        })
}
