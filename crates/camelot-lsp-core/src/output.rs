//! Parsing of camelot's output into findings.
//!
//! camelot has two output modes, selected with its `-show` flag:
//!
//! ## Structured (`-show json`)
//! ```text
//! [{"filename":"foo.ml","line":[3,3],"col":[2,5],"source":"lint","fix":"remove it","violation":"unused variable"}]
//! ```
//!
//! ## Legacy text (`-show ta`)
//! ```text
//! File foo.ml, line 3, columns: 2-5
//! Warning:unused variable
//! ```
//!
//! Both produce the same [`Finding`] shape. Line and column loci keep the
//! form camelot reported them in; see [`crate::normalize`] for the mapping
//! onto editor coordinates.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

/// Matches one legacy warning block: filename, line locus, column locus, warning text.
static LEGACY_WARNING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"File (.*), line[s]? ([0-9]+(?:-[0-9]+)?), columns: ([0-9]+(?:-[0-9]+)?)\nWarning:(.*)",
    )
    .unwrap()
});

/// A line or column locus as reported by camelot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locus {
    /// Legacy text form: `"N"` or `"N1-N2"`.
    Text(String),
    /// Structured form: an explicit `[start, end]` pair.
    Pair(u32, u32),
}

/// One issue reported by camelot, in camelot's own conventions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// The file camelot attributes the finding to. May be absolute,
    /// relative, or rooted differently from the editor's path.
    pub filename: String,
    /// Line locus (1-based).
    pub line: Locus,
    /// Column locus.
    pub col: Locus,
    /// Short category label. Only present in structured output.
    pub source: Option<String>,
    /// Description of the violation (the warning text in legacy output).
    pub violation: String,
    /// Suggested fix. Only present in structured output.
    pub fix: Option<String>,
}

impl Finding {
    /// Compose the editor-facing message for this finding.
    ///
    /// Structured findings render as `"{source}\nWarning: {violation}\nConsider: {fix}"`;
    /// legacy findings carry only the warning text.
    pub fn message(&self) -> String {
        match (&self.source, &self.fix) {
            (Some(source), Some(fix)) => {
                format!("{}\nWarning: {}\nConsider: {}", source, self.violation, fix)
            }
            (Some(source), None) => format!("{}\nWarning: {}", source, self.violation),
            (None, Some(fix)) => format!("Warning: {}\nConsider: {}", self.violation, fix),
            (None, None) => self.violation.clone(),
        }
    }
}

/// One record of camelot's structured output.
#[derive(Debug, Deserialize)]
struct StructuredRecord {
    filename: String,
    line: [u32; 2],
    col: [u32; 2],
    source: String,
    fix: String,
    violation: String,
}

impl From<StructuredRecord> for Finding {
    fn from(record: StructuredRecord) -> Self {
        Self {
            filename: record.filename,
            line: Locus::Pair(record.line[0], record.line[1]),
            col: Locus::Pair(record.col[0], record.col[1]),
            source: Some(record.source),
            violation: record.violation,
            fix: Some(record.fix),
        }
    }
}

/// Errors from decoding camelot output.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The structured payload was not a JSON array of finding records.
    #[error("malformed structured output: {0}")]
    Structured(#[from] serde_json::Error),
}

/// The output mode requested from camelot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// JSON array of finding records (`-show json`).
    #[default]
    Structured,
    /// Repeating `File ..., line ..., columns: ...\nWarning:...` blocks (`-show ta`).
    LegacyText,
}

impl OutputFormat {
    /// The value passed to camelot's `-show` flag.
    pub fn show_flag(self) -> &'static str {
        match self {
            OutputFormat::Structured => "json",
            OutputFormat::LegacyText => "ta",
        }
    }

    /// Parse raw analyzer stdout according to this format.
    pub fn parse(self, raw: &str) -> Result<Vec<Finding>, ParseError> {
        match self {
            OutputFormat::Structured => parse_structured(raw),
            OutputFormat::LegacyText => Ok(parse_legacy(raw)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.show_flag())
    }
}

/// Error for an unrecognized output format name.
#[derive(Debug, Error)]
#[error("unknown output format `{0}` (expected `json` or `ta`)")]
pub struct UnknownOutputFormat(String);

impl FromStr for OutputFormat {
    type Err = UnknownOutputFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" | "structured" => Ok(OutputFormat::Structured),
            "ta" | "text" | "legacy" => Ok(OutputFormat::LegacyText),
            _ => Err(UnknownOutputFormat(s.to_string())),
        }
    }
}

/// Extract every legacy warning block from `raw`.
///
/// Text that does not match the block shape is skipped, so output with no
/// warnings yields an empty list.
pub fn parse_legacy(raw: &str) -> Vec<Finding> {
    LEGACY_WARNING_RE
        .captures_iter(raw)
        .map(|caps| Finding {
            filename: caps[1].to_string(),
            line: Locus::Text(caps[2].to_string()),
            col: Locus::Text(caps[3].to_string()),
            source: None,
            violation: caps[4].to_string(),
            fix: None,
        })
        .collect()
}

/// Decode the structured JSON array.
pub fn parse_structured(raw: &str) -> Result<Vec<Finding>, ParseError> {
    let records: Vec<StructuredRecord> = serde_json::from_str(raw.trim())?;
    Ok(records.into_iter().map(Finding::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_single_block() {
        let findings = parse_legacy("File foo.ml, line 3, columns: 2-5\nWarning:unused variable");
        assert_eq!(
            findings,
            vec![Finding {
                filename: "foo.ml".to_string(),
                line: Locus::Text("3".to_string()),
                col: Locus::Text("2-5".to_string()),
                source: None,
                violation: "unused variable".to_string(),
                fix: None,
            }]
        );
    }

    #[test]
    fn legacy_multiple_blocks() {
        let raw = "\
File /home/me/src/foo.ml, lines 3-7, columns: 0-12
Warning:nested if statements
File /home/me/src/foo.ml, line 10, columns: 4
Warning:use pattern matching
";
        let findings = parse_legacy(raw);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].filename, "/home/me/src/foo.ml");
        assert_eq!(findings[0].line, Locus::Text("3-7".to_string()));
        assert_eq!(findings[0].col, Locus::Text("0-12".to_string()));
        assert_eq!(findings[0].violation, "nested if statements");
        assert_eq!(findings[1].line, Locus::Text("10".to_string()));
        assert_eq!(findings[1].col, Locus::Text("4".to_string()));
        assert_eq!(findings[1].violation, "use pattern matching");
    }

    #[test]
    fn legacy_ignores_unrelated_output() {
        assert!(parse_legacy("").is_empty());
        assert!(parse_legacy("camelot: nothing to report\n").is_empty());
    }

    #[test]
    fn structured_records() {
        let raw = r#"[{"filename":"foo.ml","line":[3,3],"col":[2,5],"source":"lint","fix":"remove it","violation":"unused variable"}]"#;
        let findings = parse_structured(raw).unwrap();
        assert_eq!(
            findings,
            vec![Finding {
                filename: "foo.ml".to_string(),
                line: Locus::Pair(3, 3),
                col: Locus::Pair(2, 5),
                source: Some("lint".to_string()),
                violation: "unused variable".to_string(),
                fix: Some("remove it".to_string()),
            }]
        );
    }

    #[test]
    fn structured_empty_array_and_whitespace() {
        assert!(parse_structured("  []\n").unwrap().is_empty());
    }

    #[test]
    fn structured_malformed_is_error() {
        assert!(parse_structured("not json").is_err());
        assert!(parse_structured(r#"{"filename":"foo.ml"}"#).is_err());
        assert!(parse_structured(r#"[{"filename":"foo.ml","line":[3],"col":[2,5],"source":"s","fix":"f","violation":"v"}]"#).is_err());
    }

    #[test]
    fn format_dispatch() {
        let legacy = "File foo.ml, line 1, columns: 0\nWarning:x";
        assert_eq!(OutputFormat::LegacyText.parse(legacy).unwrap().len(), 1);
        assert!(OutputFormat::Structured.parse(legacy).is_err());
    }

    #[test]
    fn format_flags_and_names() {
        assert_eq!(OutputFormat::Structured.show_flag(), "json");
        assert_eq!(OutputFormat::LegacyText.show_flag(), "ta");
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Structured);
        assert_eq!("TA".parse::<OutputFormat>().unwrap(), OutputFormat::LegacyText);
        assert!("xml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default(), OutputFormat::Structured);
    }

    #[test]
    fn message_composition() {
        let mut finding = Finding {
            filename: "foo.ml".to_string(),
            line: Locus::Pair(3, 3),
            col: Locus::Pair(2, 5),
            source: Some("lint".to_string()),
            violation: "unused variable".to_string(),
            fix: Some("remove it".to_string()),
        };
        assert_eq!(
            finding.message(),
            "lint\nWarning: unused variable\nConsider: remove it"
        );

        finding.source = None;
        finding.fix = None;
        assert_eq!(finding.message(), "unused variable");
    }
}
