//! Transport-agnostic camelot integration.
//!
//! This crate runs the camelot OCaml style checker on a file and turns what
//! it prints into editor diagnostics. It has no LSP protocol dependencies;
//! `camelot-lsp` wraps it in a language server.
//!
//! # Pipeline
//!
//! ```text
//! ConfigProvider ──► invoke ──► OutputFormat::parse ──► filter_findings ──► normalize ──► Diagnostic
//!  (command)        (-show …)   (json | ta)             (by base name)      (0-based)
//! ```
//!
//! Findings are filtered before their loci are normalized. The surviving set
//! is the same either way, but a malformed locus is only logged when it
//! belongs to the document being validated.
//!
//! # Usage
//!
//! ```rust,ignore
//! use camelot_lsp_core::{AnalyzerCommand, OutputFormat, validate};
//!
//! let report = validate(&AnalyzerCommand::default(), OutputFormat::Structured, path).await;
//! for diag in &report.diagnostics {
//!     println!("{}:{} {}", diag.range.start.line, diag.range.start.character, diag.message);
//! }
//! ```

pub mod config;
pub mod diagnostics;
pub mod filter;
pub mod invoke;
pub mod normalize;
pub mod output;
pub mod types;

// Re-export main types and functions for convenience
pub use config::{
    AnalyzerCommand, AnalyzerConfig, CamelotSettings, ConfigProvider, DEFAULT_ANALYZER_COMMAND,
    SETTINGS_SECTION,
};
pub use diagnostics::{ValidationReport, build_diagnostics, validate};
pub use invoke::{Invocation, InvocationError, invoke};
pub use output::{Finding, Locus, OutputFormat};
pub use types::{Diagnostic, DiagnosticSeverity, Position, Range};
