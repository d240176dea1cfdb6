// ============================================================
// Layer 3 - Source Spans and Span Buckets
// ============================================================
// A Span is an inclusive [start, end] range of token positions.
//
// Span length is coarsened into a handful of buckets so the
// feature space stays small while longer spans still rank above
// shorter ones:
//
//   length   1   2   3   4-6   7-10   >10
//   bucket   1   2   3    4      7      8

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

use crate::domain::error::ExtractionError;

/// Inclusive token range inside one sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end:   usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of tokens covered, `end - start + 1`.
    /// A span whose end lies before its start has no valid length.
    pub fn length(&self) -> Result<NonZeroUsize, ExtractionError> {
        self.end
            .checked_sub(self.start)
            .and_then(|width| NonZeroUsize::new(width + 1))
            .ok_or(ExtractionError::NonPositiveSpan { start: self.start, end: self.end })
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Map a span length to its feature bucket.
pub fn span_bucket(length: NonZeroUsize) -> u8 {
    match length.get() {
        1       => 1,
        2       => 2,
        3       => 3,
        4..=6   => 4,
        7..=10  => 7,
        _       => 8,
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(length: usize) -> u8 {
        span_bucket(NonZeroUsize::new(length).unwrap())
    }

    #[test]
    fn test_bucket_table() {
        let expected = [(1, 1), (2, 2), (3, 3), (4, 4), (5, 4), (6, 4),
                        (7, 7), (8, 7), (9, 7), (10, 7), (11, 8), (40, 8)];
        for (length, expected_bucket) in expected {
            assert_eq!(bucket(length), expected_bucket, "length {length}");
        }
    }

    #[test]
    fn test_bucket_is_monotone() {
        let mut last = 0;
        for length in 1..200 {
            let b = bucket(length);
            assert!(b >= last, "bucket dropped at length {length}");
            last = b;
        }
    }

    #[test]
    fn test_length_of_single_token() {
        assert_eq!(Span::new(4, 4).length().unwrap().get(), 1);
        assert_eq!(Span::new(2, 3).length().unwrap().get(), 2);
        assert_eq!(span_bucket(Span::new(0, 5).length().unwrap()), 4);
    }

    #[test]
    fn test_reversed_span_is_rejected() {
        let err = Span::new(5, 3).length().unwrap_err();
        assert_eq!(err, ExtractionError::NonPositiveSpan { start: 5, end: 3 });
    }
}
