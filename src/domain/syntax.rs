// ============================================================
// Layer 3 - Syntax Labels
// ============================================================
// Constituent labels returned by a syntax chart.
//
// Charts report "no constituent here" with a NOTAG sentinel.
// Inside the crate the sentinel is a variant rather than a
// string, so the parent search terminates on a type-level match:
//
//   SyntaxLabel::NoTag        - no constituent spans exactly [s, e]
//   ParentLabel::Unresolved   - no parent found at this span yet

use serde::{Deserialize, Serialize};

/// Printed form of the sentinel label.
pub const NO_TAG: &str = "NOTAG";

/// A label attached to an exact span of the chart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyntaxLabel {
    Constituent(String),
    NoTag,
}

impl SyntaxLabel {
    pub fn constituent(label: impl Into<String>) -> Self {
        Self::Constituent(label.into())
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::NoTag)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Constituent(label) => label,
            Self::NoTag              => NO_TAG,
        }
    }
}

/// Result of asking a chart for the parent of a span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentLabel {
    Resolved(String),
    Unresolved,
}

/// One `find_parent` answer: the parent (if any) plus whether the
/// span already touches the chart's left edge, which decides the
/// widening direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentLookup {
    pub parent:           ParentLabel,
    pub at_left_boundary: bool,
}

impl ParentLookup {
    pub fn resolved(label: impl Into<String>, at_left_boundary: bool) -> Self {
        Self { parent: ParentLabel::Resolved(label.into()), at_left_boundary }
    }

    pub fn unresolved(at_left_boundary: bool) -> Self {
        Self { parent: ParentLabel::Unresolved, at_left_boundary }
    }
}
