// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// File formats and persistence:
//
//   phrase_table.rs     - loads the phrase table, assigns target
//                         ids and writes the target index
//
//   extractor_config.rs - reads the JSON extractor configuration
//
//   vw_sink.rs          - Vowpal Wabbit csoaa_ldf training output
//
//   report.rs           - JSON run report

/// Phrase table loading and target index output
pub mod phrase_table;

/// Extractor configuration loading
pub mod extractor_config;

/// Training example writer
pub mod vw_sink;

/// Run report persistence
pub mod report;
