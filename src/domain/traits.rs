// ============================================================
// Layer 3 - Core Traits (Collaborator Abstractions)
// ============================================================
// The driver never touches a phrase-table file, a parse string or
// an output format directly. It talks to these traits instead:
//
//   PhraseTable   -> FilePhraseTable      (infra/phrase_table.rs)
//   ChartBuilder  -> ParseChartBuilder    (data/parse_chart.rs)
//   SyntaxChart   -> ParseChart           (data/parse_chart.rs)
//   ExampleSink   -> VwTrainSink          (infra/vw_sink.rs)
//
// Tests swap in in-memory fakes for each of them.

use anyhow::Result;

use crate::domain::phrase_group::{Example, TranslationCandidate};
use crate::domain::syntax::{ParentLookup, SyntaxLabel};

// ─── PhraseTable ──────────────────────────────────────────────────────────────
/// Lookup side of a phrase table.
pub trait PhraseTable {
    /// Whether the table has any translation for `source_phrase`.
    fn contains_source(&self, source_phrase: &str) -> bool;

    /// Candidate translations of `source_phrase` in table order.
    /// Empty when the phrase is unknown.
    fn candidates_for(&self, source_phrase: &str) -> &[TranslationCandidate];

    /// Id of a target phrase in the table's target index.
    fn target_id(&self, target_phrase: &str) -> Option<usize>;
}

// ─── SyntaxChart ──────────────────────────────────────────────────────────────
/// Read-only constituent queries over one parsed sentence.
pub trait SyntaxChart {
    /// Number of tokens the chart was built for.
    fn sentence_len(&self) -> usize;

    /// All labels whose span is exactly [start, end].
    /// Contains `SyntaxLabel::NoTag` when there are none.
    fn labels_covering(&self, start: usize, end: usize) -> Vec<SyntaxLabel>;

    /// Nearest enclosing constituent of [start, end], plus whether
    /// `start` already sits at the chart's left edge.
    fn find_parent(&self, start: usize, end: usize) -> ParentLookup;
}

// ─── ChartBuilder ─────────────────────────────────────────────────────────────
/// Builds a chart from one parse-stream line.
pub trait ChartBuilder {
    type Chart: SyntaxChart;

    fn build(&self, sentence_len: usize, parse_line: &str) -> Result<Self::Chart>;
}

// ─── ExampleSink ──────────────────────────────────────────────────────────────
/// Consumer of finalised training examples.
pub trait ExampleSink {
    /// Accept one example.
    fn consume(&mut self, example: &Example) -> Result<()>;

    /// Flush and close the sink. Called once after the last example.
    fn finish(&mut self) -> Result<()>;
}
