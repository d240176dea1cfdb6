// ============================================================
// Layer 3 - Input-Integrity Errors
// ============================================================
// Every variant here is fatal for the run. Filtering outcomes
// (unknown source phrase, target not among candidates) are not
// errors and never appear in this enum.
//
// These travel inside anyhow::Error through the upper layers;
// callers that need the variant use `downcast_ref`.

use thiserror::Error;

/// Fatal data-integrity violations detected while extracting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// A disambiguation line could not be parsed
    #[error("malformed disambiguation record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// A raw-sentence token carries the wrong number of factors
    #[error("wrong count of factors in token '{token}': expected {expected}, found {found}")]
    FactorCountMismatch {
        token:    String,
        expected: usize,
        found:    usize,
    },

    /// Records went back to an earlier sentence
    #[error("sentence index went backwards: cursor at {current}, record asks for {requested}")]
    NonMonotonicSentence { current: usize, requested: usize },

    /// A companion stream ended before the requested sentence
    #[error("{stream} stream ended before sentence {sentence}")]
    StreamExhausted { stream: &'static str, sentence: usize },

    /// The cursor has not read any sentence yet
    #[error("no sentence has been read yet")]
    NoCurrentSentence,

    /// end - start + 1 was zero or negative
    #[error("non-positive span length for [{start}, {end}]")]
    NonPositiveSpan { start: usize, end: usize },

    /// The record's span reaches past the end of its sentence
    #[error("span [{start}, {end}] lies outside sentence {sentence} of length {sentence_len}")]
    SpanOutOfSentence {
        sentence:     usize,
        start:        usize,
        end:          usize,
        sentence_len: usize,
    },

    /// Parent search did not settle within its step cap
    #[error("parent search for span [{start}, {end}] did not terminate within {limit} steps")]
    UnterminatedWidening { start: usize, end: usize, limit: usize },

    /// A source phrase occurrence reappeared after its group was closed
    #[error("records for '{phrase}' in sentence {sentence} are not contiguous")]
    NonContiguousGroup { phrase: String, sentence: usize },

    /// A phrase-table line could not be parsed
    #[error("malformed phrase table line {line}: {reason}")]
    MalformedPhraseTable { line: usize, reason: String },

    /// A parse-tree line is not a balanced bracketing
    #[error("malformed parse tree: {reason}")]
    MalformedParse { reason: String },

    /// The extractor configuration is unusable
    #[error("invalid extractor configuration: {0}")]
    InvalidConfig(String),
}
