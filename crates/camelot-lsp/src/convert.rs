//! Conversion between camelot-lsp-core types and tower_lsp::lsp_types.

use tower_lsp::lsp_types::{
    Diagnostic as LspDiagnostic, DiagnosticRelatedInformation as LspRelatedInformation,
    DiagnosticSeverity as LspSeverity, Location, Position as LspPosition,
    Range as LspRange, Url,
};

use camelot_lsp_core::types::{Diagnostic, DiagnosticSeverity, Position, Range};

/// Convert a camelot-lsp-core Position to an lsp-types Position.
pub fn position_to_lsp(pos: &Position) -> LspPosition {
    LspPosition {
        line: pos.line,
        character: pos.character,
    }
}

/// Convert a camelot-lsp-core Range to an lsp-types Range.
pub fn range_to_lsp(range: &Range) -> LspRange {
    LspRange {
        start: position_to_lsp(&range.start),
        end: position_to_lsp(&range.end),
    }
}

/// Convert a camelot-lsp-core DiagnosticSeverity to an lsp-types DiagnosticSeverity.
pub fn severity_to_lsp(severity: &DiagnosticSeverity) -> LspSeverity {
    match severity {
        DiagnosticSeverity::Warning => LspSeverity::WARNING,
    }
}

/// Convert a camelot-lsp-core Diagnostic for the document at `uri`.
///
/// Related information in the core type is always about the same document,
/// so it is anchored at `uri`.
pub fn diagnostic_to_lsp(diag: &Diagnostic, uri: &Url) -> LspDiagnostic {
    let related_information = if diag.related_information.is_empty() {
        None
    } else {
        Some(
            diag.related_information
                .iter()
                .map(|related| LspRelatedInformation {
                    location: Location::new(uri.clone(), range_to_lsp(&related.range)),
                    message: related.message.clone(),
                })
                .collect(),
        )
    };

    LspDiagnostic {
        range: range_to_lsp(&diag.range),
        severity: Some(severity_to_lsp(&diag.severity)),
        code: None,
        code_description: None,
        source: diag.source.clone(),
        message: diag.message.clone(),
        related_information,
        tags: None,
        data: None,
    }
}
