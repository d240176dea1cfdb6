// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `extract` and `inspect-chart`,
// and their arguments.

use clap::{Args, Subcommand};
use crate::application::extract_use_case::ExtractConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build training examples from a disambiguation stream
    Extract(ExtractArgs),

    /// Show the syntax chart of one sentence and its parse
    InspectChart(InspectArgs),
}

/// Arguments for `extract`. The seven paths are positional, in
/// the order the legacy pipeline scripts pass them.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Disambiguation (PSD) records, one per line
    pub disambiguation: String,

    /// Parse trees, one per corpus sentence
    pub parse: String,

    /// Raw factored corpus, one sentence per line
    pub corpus: String,

    /// Phrase table
    pub phrase_table: String,

    /// Extractor config (JSON)
    pub config: String,

    /// Training output file (Vowpal Wabbit format)
    pub output_train: String,

    /// Target phrase index output file
    pub output_index: String,

    /// Also write the filtering counters as JSON
    #[arg(long)]
    pub report: Option<String>,

    /// Maximum parent-search widening steps
    /// (default: sentence length + 1)
    #[arg(long)]
    pub max_widening_steps: Option<usize>,
}

impl From<ExtractArgs> for ExtractConfig {
    fn from(a: ExtractArgs) -> Self {
        ExtractConfig {
            disambiguation_path:   a.disambiguation,
            parse_path:            a.parse,
            corpus_path:           a.corpus,
            phrase_table_path:     a.phrase_table,
            extractor_config_path: a.config,
            output_train_path:     a.output_train,
            output_index_path:     a.output_index,
            report_path:           a.report,
            max_widening_steps:    a.max_widening_steps,
        }
    }
}

/// Arguments for `inspect-chart`
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Corpus line of the sentence
    #[arg(long)]
    pub sentence: String,

    /// Bracketed parse of the sentence
    #[arg(long)]
    pub parse: String,

    /// First token of a span to resolve
    #[arg(long, requires = "end")]
    pub start: Option<usize>,

    /// Last token of a span to resolve
    #[arg(long, requires = "start")]
    pub end: Option<usize>,

    #[arg(long)]
    pub max_widening_steps: Option<usize>,
}
