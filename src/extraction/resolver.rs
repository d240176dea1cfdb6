// ============================================================
// Layer 5 - Syntax Span Resolver
// ============================================================
// Resolves the syntactic description of a source span against a
// SyntaxChart.
//
// Syntax features:
//   labels_covering(start, end) on the original span. When the
//   chart returns several labels, a NOTAG among them is dropped;
//   NOTAG only survives as the sole placeholder.
//
// Parent label (span widening):
//
//   [start, end] ──find_parent──► Resolved(label) ──► done
//        │
//        └─ Unresolved:
//             not at left edge -> start -= 1
//             at left edge     -> end   += 1
//
// The loop is capped at sentence_len + 1 widening steps. A chart
// that keeps answering Unresolved past the cap, or that asks to
// widen left from position 0, is an integrity error.

use crate::domain::error::ExtractionError;
use crate::domain::span::Span;
use crate::domain::syntax::ParentLabel;
use crate::domain::traits::SyntaxChart;

/// Outcome of the widening search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentResolution {
    /// Label of the enclosing constituent
    pub label: String,

    /// Span at which the parent was found
    pub widened: Span,

    /// Number of widening steps taken
    pub steps: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxSpanResolver {
    /// Overrides the sentence-length based step cap
    step_limit: Option<usize>,
}

impl SyntaxSpanResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed widening cap instead of `sentence_len + 1`.
    pub fn with_step_limit(limit: usize) -> Self {
        Self { step_limit: Some(limit) }
    }

    /// Labels covering exactly `span`, with the sentinel removed
    /// whenever a real label is also present.
    pub fn syntax_features<C: SyntaxChart>(&self, chart: &C, span: Span) -> Vec<String> {
        let labels = chart.labels_covering(span.start, span.end);
        let several = labels.len() > 1;
        labels
            .iter()
            .filter(|label| !(several && label.is_sentinel()))
            .map(|label| label.as_str().to_string())
            .collect()
    }

    /// Widen `span` until the chart reports an enclosing constituent.
    pub fn resolve_parent<C: SyntaxChart>(
        &self,
        chart: &C,
        span:  Span,
    ) -> Result<ParentResolution, ExtractionError> {
        let limit = self.step_limit.unwrap_or(chart.sentence_len() + 1);
        let unterminated = || ExtractionError::UnterminatedWidening {
            start: span.start,
            end:   span.end,
            limit,
        };

        let mut current = span;
        let mut steps   = 0usize;

        loop {
            let lookup = chart.find_parent(current.start, current.end);
            if let ParentLabel::Resolved(label) = lookup.parent {
                return Ok(ParentResolution { label, widened: current, steps });
            }

            if steps == limit {
                return Err(unterminated());
            }

            if lookup.at_left_boundary {
                current.end += 1;
            } else {
                current.start = current.start.checked_sub(1).ok_or_else(unterminated)?;
            }
            steps += 1;
        }
    }
}
