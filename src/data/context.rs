// ============================================================
// Layer 4 - Factored Sentence Reader
// ============================================================
// Splits a raw corpus line into per-token factor tuples.
//
//   "the|DT|the cats|NNS|cat"   (3 factors per token)
//       │
//       ▼
//   [["the","DT","the"], ["cats","NNS","cat"]]
//
// Every token must carry exactly the number of factors named in
// the extractor configuration.

use crate::domain::error::ExtractionError;
use crate::domain::phrase_group::SentenceContext;

pub const FACTOR_SEPARATOR: char = '|';

/// Parse one sentence line into a SentenceContext.
pub fn read_factored_line(line: &str, factor_count: usize) -> Result<SentenceContext, ExtractionError> {
    let mut tokens = Vec::new();
    for word in line.split_whitespace() {
        let factors: Vec<String> = word.split(FACTOR_SEPARATOR).map(str::to_string).collect();
        if factors.len() != factor_count {
            return Err(ExtractionError::FactorCountMismatch {
                token:    word.to_string(),
                expected: factor_count,
                found:    factors.len(),
            });
        }
        tokens.push(factors);
    }
    Ok(SentenceContext::new(tokens))
}

/// Number of whitespace-separated tokens in a sentence line.
pub fn sentence_len(line: &str) -> usize {
    line.split_whitespace().count()
}
