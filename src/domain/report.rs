// ============================================================
// Layer 3 - Extraction Report
// ============================================================
// Counters accumulated by the driver over one run. They only
// ever go up. The driver owns one report and hands it back when
// the input is exhausted.
//
// Invariants:
//   source_survived <= source_total
//   target_survived <= target_total

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Phrase groups closed (each opened group is closed once)
    pub source_total: usize,

    /// Phrase groups emitted as training examples
    pub source_survived: usize,

    /// Records that reached target marking
    pub target_total: usize,

    /// Records whose target matched a candidate
    pub target_survived: usize,

    /// Records skipped because the source phrase is not in the table
    pub records_skipped: usize,

    /// Raw sentences consumed from the corpus stream
    pub sentences_read: usize,
}

impl ExtractionReport {
    pub fn source_filtered(&self) -> usize {
        self.source_total - self.source_survived
    }

    pub fn target_filtered(&self) -> usize {
        self.target_total - self.target_survived
    }
}

impl std::fmt::Display for ExtractionReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Filtered phrases: source {}, target {}",
            self.source_filtered(),
            self.target_filtered()
        )?;
        write!(
            f,
            "Remaining phrases: source {}, target {}",
            self.source_survived, self.target_survived
        )
    }
}
