//! Filtering of findings down to the validated document.
//!
//! camelot can report on files other than the one it was pointed at, and
//! spells paths its own way. Findings are matched on base name only, so two
//! files named `util.ml` in different directories are indistinguishable.

use crate::output::Finding;

/// The last path component of `path`, accepting either separator.
pub fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Keep only findings whose filename has the same base name as `target_path`.
pub fn filter_findings(findings: Vec<Finding>, target_path: &str) -> Vec<Finding> {
    let target = base_name(target_path);
    findings
        .into_iter()
        .filter(|finding| base_name(&finding.filename) == target)
        .collect()
}
