//! Mapping of camelot loci onto zero-based editor ranges.
//!
//! camelot reports 1-based lines and columns that already line up with the
//! editor's character offsets. Lines are therefore shifted down by one and
//! columns pass through unchanged, for both output formats.

use thiserror::Error;

use crate::output::{Finding, Locus};
use crate::types::{Position, Range};

/// A locus that could not be read as one or two numbers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid locus `{0}`")]
pub struct LocusError(pub String);

impl Locus {
    /// The inclusive `(start, end)` bounds of this locus, unadjusted.
    ///
    /// A single value `"N"` yields `(N, N)`.
    pub fn bounds(&self) -> Result<(u32, u32), LocusError> {
        match self {
            Locus::Pair(start, end) => Ok((*start, *end)),
            Locus::Text(text) => {
                let mut parts = text.split('-');
                let start = parse_bound(text, parts.next())?;
                let end = match parts.next() {
                    Some(part) => parse_bound(text, Some(part))?,
                    None => start,
                };
                if parts.next().is_some() {
                    return Err(LocusError(text.clone()));
                }
                Ok((start, end))
            }
        }
    }
}

fn parse_bound(text: &str, part: Option<&str>) -> Result<u32, LocusError> {
    part.and_then(|p| p.trim().parse::<u32>().ok())
        .ok_or_else(|| LocusError(text.to_string()))
}

/// Convert a finding's loci into a zero-based range.
///
/// Line 0 (which camelot should never emit) clamps to line 0 rather than wrapping.
pub fn normalize(finding: &Finding) -> Result<Range, LocusError> {
    let (line_start, line_end) = finding.line.bounds()?;
    let (col_start, col_end) = finding.col.bounds()?;

    Ok(Range::new(
        Position::new(line_start.saturating_sub(1), col_start),
        Position::new(line_end.saturating_sub(1), col_end),
    ))
}
