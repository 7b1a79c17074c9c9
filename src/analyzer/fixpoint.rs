//! Bounded fixed-point repair of a description
//!
//! A single fix is not always final: "should not be called" loses its vague
//! opener first, then "not be called" becomes "is not called". The loop
//! re-analyzes the fixed text until it is valid or nothing more can be fixed.

use super::description::{analyze, Analysis, Description, DescriptionOptions};
use crate::lexicon::Lexicon;
use crate::ViolationKind;

/// Upper bound on fix steps applied to one description
pub const MAX_FIX_PASSES: usize = 10;

/// Where the repair loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    /// Final description (same delimiter and start offset as the input)
    pub description: Description,
    /// Kinds fixed along the way, in order
    pub applied: Vec<ViolationKind>,
    /// Violation left once no fix applies (None when the result is valid)
    pub remaining: Option<ViolationKind>,
    /// False when the pass limit was hit or a fix made no progress
    pub converged: bool,
}

impl FixOutcome {
    /// Number of fix steps applied
    pub fn passes(&self) -> usize {
        self.applied.len()
    }

    pub fn is_valid(&self) -> bool {
        self.converged && self.remaining.is_none()
    }

    /// Final literal, quotes included
    pub fn literal(&self) -> String {
        self.description.literal()
    }
}

/// Apply fixes until the description is valid, unfixable, or `MAX_FIX_PASSES` is reached
pub fn fix_to_fixpoint(
    description: &Description,
    options: &DescriptionOptions,
    lexicon: &Lexicon,
) -> FixOutcome {
    fix_to_fixpoint_with(description, options, lexicon, |_| true)
}

/// Like [`fix_to_fixpoint`], but a violation whose kind `enabled` rejects is
/// left in place: the loop stops there, as if that kind had no fix.
pub fn fix_to_fixpoint_with(
    description: &Description,
    options: &DescriptionOptions,
    lexicon: &Lexicon,
    enabled: impl Fn(ViolationKind) -> bool,
) -> FixOutcome {
    let mut current = description.clone();
    let mut applied = Vec::new();

    loop {
        let violation = match analyze(&current, options, lexicon) {
            Analysis::Valid => {
                return FixOutcome {
                    description: current,
                    applied,
                    remaining: None,
                    converged: true,
                }
            }
            Analysis::Violation(v) => v,
        };

        let fix = violation.fix.filter(|_| enabled(violation.kind));
        let Some(fix) = fix else {
            return FixOutcome {
                description: current,
                applied,
                remaining: Some(violation.kind),
                converged: true,
            };
        };

        if applied.len() == MAX_FIX_PASSES || fix.text == current.text {
            tracing::warn!(
                description = %description.text,
                partial = %current.text,
                kind = %violation.kind,
                passes = applied.len(),
                "description fix did not converge"
            );
            return FixOutcome {
                description: current,
                applied,
                remaining: Some(violation.kind),
                converged: false,
            };
        }

        tracing::debug!(
            pass = applied.len() + 1,
            kind = %violation.kind,
            from = %current.text,
            to = %fix.text,
            "applied description fix"
        );
        applied.push(violation.kind);
        current = current.with_text(fix.text);
    }
}
