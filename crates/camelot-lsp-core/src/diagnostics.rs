//! Turning camelot findings into diagnostics for one document.
//!
//! A validation cycle runs the analyzer, drops findings for other files,
//! normalizes the loci of the rest, and builds one warning per survivor.
//! Filtering first keeps unreadable loci in other files from being reported.
//! The result is always the complete set for the document.

use std::path::Path;

use crate::config::AnalyzerCommand;
use crate::filter::filter_findings;
use crate::invoke::{Invocation, invoke};
use crate::normalize::normalize;
use crate::output::{Finding, OutputFormat};
use crate::types::{DIAGNOSTIC_SOURCE, Diagnostic, DiagnosticSeverity};

/// Result of one validation cycle.
#[derive(Debug)]
pub struct ValidationReport {
    /// Diagnostics for the validated document. Empty on failure.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether the analyzer invocation itself failed.
    pub invocation_failed: bool,
}

/// Build a diagnostic from a finding, or `None` if its loci are unreadable.
pub fn finding_to_diagnostic(finding: &Finding) -> Option<Diagnostic> {
    match normalize(finding) {
        Ok(range) => Some(
            Diagnostic::new(range, DiagnosticSeverity::Warning, finding.message())
                .with_related(range, DIAGNOSTIC_SOURCE),
        ),
        Err(error) => {
            tracing::warn!(%error, filename = %finding.filename, "skipping finding");
            None
        }
    }
}

/// Filter `findings` to `document_path`, then convert the survivors.
pub fn build_diagnostics(findings: Vec<Finding>, document_path: &str) -> Vec<Diagnostic> {
    filter_findings(findings, document_path)
        .iter()
        .filter_map(finding_to_diagnostic)
        .collect()
}

/// Run one full validation cycle for the file at `document_path`.
///
/// Never fails: an analyzer that cannot run, exits nonzero, or prints
/// undecodable output yields an empty diagnostic set.
pub async fn validate(
    command: &AnalyzerCommand,
    format: OutputFormat,
    document_path: &Path,
) -> ValidationReport {
    let invocation = invoke(command, format, document_path).await;
    let invocation_failed = invocation.is_failed();
    if let Invocation::Failed(error) = &invocation {
        tracing::warn!(%error, "camelot produced no usable output");
    }

    let diagnostics = build_diagnostics(
        invocation.into_findings(),
        &document_path.to_string_lossy(),
    );

    ValidationReport {
        diagnostics,
        invocation_failed,
    }
}
