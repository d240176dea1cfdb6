// ============================================================
// Layer 4 - Sentence Cursor
// ============================================================
// Walks the raw-sentence stream and the parse stream in lockstep.
//
// Sentence ids start at 1: a fresh cursor sits at index 0, before
// the first line. advance_to(k) reads one line from each stream
// per step until the cursor is at k, leaving line k of both
// streams as the "current" lines.
//
//   index:   0        1        2        3
//   corpus:  -    sent 1   sent 2   sent 3
//   parse:   -    tree 1   tree 2   tree 3
//
// Nothing is buffered beyond the current line of each stream.

use anyhow::{Context, Result};
use std::io::BufRead;

use crate::domain::error::ExtractionError;

pub struct SentenceCursor<C: BufRead, P: BufRead> {
    corpus:        C,
    parse:         P,
    index:         usize,
    sentence_line: Option<String>,
    parse_line:    Option<String>,
}

impl<C: BufRead, P: BufRead> SentenceCursor<C, P> {
    pub fn new(corpus: C, parse: P) -> Self {
        Self {
            corpus,
            parse,
            index:         0,
            sentence_line: None,
            parse_line:    None,
        }
    }

    /// Move forward to sentence `target`. Returns how many
    /// sentences were consumed.
    ///
    /// Moving backwards is an input-ordering error.
    pub fn advance_to(&mut self, target: usize) -> Result<usize> {
        if target < self.index {
            return Err(ExtractionError::NonMonotonicSentence {
                current:   self.index,
                requested: target,
            }
            .into());
        }

        let mut consumed = 0;
        while self.index < target {
            let next = self.index + 1;
            let sentence = read_one(&mut self.corpus, "corpus", next)?;
            let parse    = read_one(&mut self.parse, "parse", next)?;

            self.sentence_line = Some(sentence);
            self.parse_line    = Some(parse);
            self.index         = next;
            consumed += 1;
        }
        Ok(consumed)
    }

    /// Raw sentence line at the current index.
    pub fn current_sentence(&self) -> Result<&str> {
        self.sentence_line
            .as_deref()
            .ok_or_else(|| ExtractionError::NoCurrentSentence.into())
    }

    /// Parse line at the current index.
    pub fn current_parse(&self) -> Result<&str> {
        self.parse_line
            .as_deref()
            .ok_or_else(|| ExtractionError::NoCurrentSentence.into())
    }
}

/// Read a single line, stripping the line terminator.
fn read_one<R: BufRead>(reader: &mut R, stream: &'static str, sentence: usize) -> Result<String> {
    let mut line = String::new();
    let n = reader
        .read_line(&mut line)
        .with_context(|| format!("Cannot read {stream} line for sentence {sentence}"))?;
    if n == 0 {
        return Err(ExtractionError::StreamExhausted { stream, sentence }.into());
    }
    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);
    Ok(line)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn cursor(corpus: &str, parse: &str) -> SentenceCursor<Cursor<String>, Cursor<String>> {
        SentenceCursor::new(Cursor::new(corpus.to_string()), Cursor::new(parse.to_string()))
    }

    #[test]
    fn test_advances_both_streams_together() {
        let mut c = cursor("a b\nc d\ne f\n", "(X a b)\n(Y c d)\n(Z e f)\n");
        assert_eq!(c.advance_to(2).unwrap(), 2);
        assert_eq!(c.current_sentence().unwrap(), "c d");
        assert_eq!(c.current_parse().unwrap(), "(Y c d)");
    }

    #[test]
    fn test_same_index_does_not_read() {
        let mut c = cursor("a\nb\n", "(X a)\n(X b)\n");
        c.advance_to(1).unwrap();
        assert_eq!(c.advance_to(1).unwrap(), 0);
        assert_eq!(c.current_sentence().unwrap(), "a");
    }

    #[test]
    fn test_going_backwards_is_fatal() {
        let mut c = cursor("a\nb\n", "(X a)\n(X b)\n");
        c.advance_to(2).unwrap();
        let err = c.advance_to(1).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ExtractionError>(),
            Some(&ExtractionError::NonMonotonicSentence { current: 2, requested: 1 })
        );
    }

    #[test]
    fn test_short_parse_stream_is_fatal() {
        let mut c = cursor("a\nb\n", "(X a)\n");
        let err = c.advance_to(2).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ExtractionError>(),
            Some(&ExtractionError::StreamExhausted { stream: "parse", sentence: 2 })
        );
    }

    #[test]
    fn test_no_current_line_before_first_advance() {
        let c = cursor("a\n", "(X a)\n");
        assert!(c.current_sentence().is_err());
        assert!(c.current_parse().is_err());
    }
}
