// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust structs, enums and traits describing what the
// extractor works with. No file handles and no output formats
// live here.
//
// The core concepts:
//   - DisambiguationRecord: one observed (source, target) pair
//   - Span:                 a source token range and its bucket
//   - SyntaxLabel:          a constituent label or the NOTAG sentinel
//   - PhraseGroup:          the training unit for one source phrase
//   - ExtractionReport:     running filter statistics
//
// Collaborators (phrase table, chart, example sink) are traits
// so the driver can be exercised with in-memory fakes.

// One parsed line of the disambiguation stream
pub mod record;

// Source spans and span-length bucketing
pub mod span;

// Constituent labels and parent lookups
pub mod syntax;

// Phrase groups, loss vectors and emitted examples
pub mod phrase_group;

// Filtering counters accumulated over a run
pub mod report;

// Factor layout, context window and feature switches
pub mod extractor_config;

// Input-integrity errors
pub mod error;

// Collaborator abstractions implemented by other layers
pub mod traits;
