// ============================================================
// Layer 3 - DisambiguationRecord Domain Type
// ============================================================
// One line of the disambiguation (PSD) stream: a source phrase
// observed in a sentence together with the target phrase it was
// aligned to.
//
// Line format, tab separated:
//   sentence_id  src_start  src_end  tgt_start  tgt_end  src_phrase  tgt_phrase
//
// Example:
//   3	2	3	1	2	the cat	le chat
//
// Sentence ids start at 1. Spans are 0-based and inclusive.

use crate::domain::error::ExtractionError;
use crate::domain::span::Span;

const COLUMN_COUNT: usize = 7;

/// An immutable, parsed disambiguation observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisambiguationRecord {
    /// 1-based index of the sentence this observation belongs to
    pub sentence_index: usize,

    /// Source phrase as it appears in the phrase table
    pub source_phrase: String,

    /// Observed correct translation
    pub target_phrase: String,

    /// Source token span of the phrase
    pub source_span: Span,
}

impl DisambiguationRecord {
    pub fn new(
        sentence_index: usize,
        source_phrase:  impl Into<String>,
        target_phrase:  impl Into<String>,
        source_span:    Span,
    ) -> Self {
        Self {
            sentence_index,
            source_phrase: source_phrase.into(),
            target_phrase: target_phrase.into(),
            source_span,
        }
    }

    /// Parse one tab-separated line. `line_no` is only used for
    /// error reporting.
    pub fn parse(line: &str, line_no: usize) -> Result<Self, ExtractionError> {
        let malformed = |reason: String| ExtractionError::MalformedRecord { line: line_no, reason };

        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() != COLUMN_COUNT {
            return Err(malformed(format!(
                "expected {COLUMN_COUNT} tab-separated columns, found {}",
                columns.len()
            )));
        }

        let number = |idx: usize, name: &str| -> Result<usize, ExtractionError> {
            columns[idx]
                .trim()
                .parse::<usize>()
                .map_err(|e| malformed(format!("{name} '{}': {e}", columns[idx])))
        };

        let sentence_index = number(0, "sentence id")?;
        if sentence_index == 0 {
            return Err(malformed("sentence ids start at 1".to_string()));
        }

        let source_span = Span::new(number(1, "source start")?, number(2, "source end")?);
        // Target positions are validated but not used
        number(3, "target start")?;
        number(4, "target end")?;

        let source_phrase = columns[5].trim();
        let target_phrase = columns[6].trim();
        if source_phrase.is_empty() || target_phrase.is_empty() {
            return Err(malformed("empty source or target phrase".to_string()));
        }

        Ok(Self {
            sentence_index,
            source_phrase: source_phrase.to_string(),
            target_phrase: target_phrase.to_string(),
            source_span,
        })
    }
}
