//! Auto-fix application: rewrites description literals in place

use crate::{FileReport, Fix};
use std::fs;
use std::path::Path;

/// Which replacement of a [`Fix`] to write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FixLevel {
    /// One fix step, as reported for the first violation
    SinglePass,
    /// The literal after repairing until nothing more can be fixed
    #[default]
    FixedPoint,
}

impl FixLevel {
    fn replacement(self, fix: &Fix) -> &str {
        match self {
            FixLevel::SinglePass => &fix.replacement,
            FixLevel::FixedPoint => &fix.final_replacement,
        }
    }
}

/// Result of applying fixes to one source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedSource {
    pub content: String,
    pub applied: usize,
    /// Fixes dropped because they overlapped another fix or fell outside the text
    pub skipped: usize,
}

/// All fixes carried by a report, in source order
pub fn collect_fixes(report: &FileReport) -> Vec<Fix> {
    report.issues.iter().filter_map(|i| i.fix.clone()).collect()
}

/// Apply fixes to source text. Fixes are applied from bottom to top so byte offsets remain valid.
pub fn apply_fixes_to_source(source: &str, fixes: &[Fix], level: FixLevel) -> FixedSource {
    let mut sorted: Vec<&Fix> = fixes.iter().collect();
    sorted.sort_by(|a, b| b.range.start.cmp(&a.range.start));

    let mut content = source.to_string();
    let mut applied = 0;
    let mut skipped = 0;
    // Start of the last applied range; anything reaching past it overlaps
    let mut limit = source.len();

    for fix in sorted {
        let range = fix.range.start..fix.range.end;
        let in_bounds = range.start <= range.end
            && range.end <= limit
            && content.is_char_boundary(range.start)
            && content.is_char_boundary(range.end);
        if !in_bounds {
            tracing::debug!(start = range.start, end = range.end, "skipping overlapping fix");
            skipped += 1;
            continue;
        }
        content.replace_range(range.clone(), level.replacement(fix));
        limit = range.start;
        applied += 1;
    }

    FixedSource {
        content,
        applied,
        skipped,
    }
}

/// Apply fixes to a file on disk. Returns the number of fixes written.
pub fn apply_fixes(path: &Path, fixes: &[Fix], level: FixLevel) -> std::io::Result<usize> {
    if fixes.is_empty() {
        return Ok(0);
    }
    let source = fs::read_to_string(path)?;
    let fixed = apply_fixes_to_source(&source, fixes, level);
    if fixed.applied > 0 {
        fs::write(path, fixed.content)?;
    }
    Ok(fixed.applied)
}
