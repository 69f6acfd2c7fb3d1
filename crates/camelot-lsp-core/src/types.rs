//! Core types for editor-facing diagnostics.
//!
//! These types carry no LSP protocol dependency and convert one-to-one into
//! `lsp-types` in the server crate.
//!
//! All positions use 0-based line and character indices, matching the LSP specification.

use serde::{Deserialize, Serialize};

/// Provenance tag attached to every diagnostic the bridge produces.
pub const DIAGNOSTIC_SOURCE: &str = "camelot";

/// A position in a text document, expressed as zero-based line and character offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Position {
    /// Zero-based line number.
    pub line: u32,
    /// Zero-based character offset.
    pub character: u32,
}

impl Position {
    /// Create a new position.
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A range in a text document, expressed as start and end positions.
///
/// Ranges built from analyzer findings are inclusive at both ends, which is
/// how camelot reports its columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Range {
    /// The range's start position.
    pub start: Position,
    /// The range's end position.
    pub end: Position,
}

impl Range {
    /// Create a new range.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// Diagnostic severity levels, matching LSP DiagnosticSeverity.
///
/// camelot only reports style warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    /// Reports a warning.
    Warning = 2,
}

/// Related information for a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticRelatedInformation {
    /// The location of this related diagnostic information.
    pub range: Range,
    /// The message of this related diagnostic information.
    pub message: String,
}

/// A diagnostic message, such as a compiler error or warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The range at which the diagnostic applies.
    pub range: Range,
    /// The diagnostic's severity.
    pub severity: DiagnosticSeverity,
    /// A human-readable string describing the source of this diagnostic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// The diagnostic's message.
    pub message: String,
    /// Additional metadata about the diagnostic.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    /// Create a new diagnostic tagged with the camelot provenance.
    pub fn new(range: Range, severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            range,
            severity,
            source: Some(DIAGNOSTIC_SOURCE.to_string()),
            message: message.into(),
            related_information: Vec::new(),
        }
    }

    /// Add related information.
    pub fn with_related(mut self, range: Range, message: impl Into<String>) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            range,
            message: message.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_defaults_to_camelot_source() {
        let diag = Diagnostic::new(Range::default(), DiagnosticSeverity::Warning, "msg");
        assert_eq!(diag.source.as_deref(), Some("camelot"));
        assert!(diag.related_information.is_empty());
    }

    #[test]
    fn diagnostic_serialization() {
        let diag = Diagnostic::new(
            Range::new(Position::new(0, 0), Position::new(0, 10)),
            DiagnosticSeverity::Warning,
            "Test warning",
        );

        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"severity\":\"warning\""));
        assert!(json.contains("\"source\":\"camelot\""));
        assert!(!json.contains("related_information"));
    }
}
