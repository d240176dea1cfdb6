// ============================================================
// Layer 3 - PhraseGroup Domain Type
// ============================================================
// A PhraseGroup collects every consecutive disambiguation record
// that shares one source phrase. It owns the candidate
// translations from the phrase table and a loss vector aligned
// with them index-for-index:
//
//   candidates: [ id 3 , id 5 , id 9 ]
//   losses:     [ 1.0  , 0.0  , 1.0  ]   <- id 5 was observed
//
// Lifecycle:
//   open()            -> all losses 1, has_translation = false
//   mark_if_correct() -> first candidate with the id gets loss 0
//   close()           -> Some(Example) only if something was marked
//
// The group never shrinks or grows its candidate list, so
// losses.len() == candidates.len() holds for its whole life.

use serde::{Deserialize, Serialize};

use crate::domain::span::Span;

/// Loss for a candidate that was never observed as correct.
pub const INCORRECT_LOSS: f32 = 1.0;

/// Loss for the observed correct candidate.
pub const CORRECT_LOSS: f32 = 0.0;

/// One translation option for a source phrase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationCandidate {
    /// Target phrase id from the phrase table's target index
    pub id: usize,

    /// Target phrase text
    pub phrase: String,

    /// Phrase-table scores in file order
    pub scores: Vec<f32>,
}

impl TranslationCandidate {
    pub fn new(id: usize, phrase: impl Into<String>) -> Self {
        Self { id, phrase: phrase.into(), scores: Vec::new() }
    }

    pub fn with_scores(mut self, scores: Vec<f32>) -> Self {
        self.scores = scores;
        self
    }
}

/// The sentence a group was found in, one factor tuple per token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentenceContext {
    pub tokens: Vec<Vec<String>>,
}

impl SentenceContext {
    pub fn new(tokens: Vec<Vec<String>>) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Factor `factor` of token `position`, if both exist.
    pub fn factor(&self, position: usize, factor: usize) -> Option<&str> {
        self.tokens.get(position)?.get(factor).map(String::as_str)
    }
}

/// Syntactic description of a group's span, resolved once when
/// the group opens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSyntax {
    /// Labels covering the original span, sentinel-filtered
    pub features: Vec<String>,

    /// Label of the nearest enclosing constituent
    pub parent_label: String,

    /// Bucketed length of the original span
    pub span_bucket: u8,
}

impl Default for GroupSyntax {
    fn default() -> Self {
        Self {
            features:     Vec::new(),
            parent_label: crate::domain::syntax::NO_TAG.to_string(),
            span_bucket:  1,
        }
    }
}

/// The open training unit for one source phrase.
#[derive(Debug, Clone)]
pub struct PhraseGroup {
    pub source_phrase:  String,
    pub sentence_index: usize,
    pub span:           Span,
    pub context:        SentenceContext,
    pub syntax:         GroupSyntax,
    candidates:         Vec<TranslationCandidate>,
    losses:             Vec<f32>,
    has_translation:    bool,
}

impl PhraseGroup {
    /// Start a group with every candidate marked incorrect.
    pub fn open(
        source_phrase: impl Into<String>,
        span:          Span,
        candidates:    Vec<TranslationCandidate>,
    ) -> Self {
        let losses = vec![INCORRECT_LOSS; candidates.len()];
        Self {
            source_phrase:  source_phrase.into(),
            sentence_index: 0,
            span,
            context:        SentenceContext::default(),
            syntax:         GroupSyntax::default(),
            candidates,
            losses,
            has_translation: false,
        }
    }

    /// Set the loss of the first candidate with `target_id` to 0.
    ///
    /// Returns false and leaves the group untouched when no
    /// candidate carries the id. Later duplicates of the same id
    /// are never marked.
    pub fn mark_if_correct(&mut self, target_id: usize) -> bool {
        match self.candidates.iter().position(|c| c.id == target_id) {
            Some(i) => {
                self.losses[i]       = CORRECT_LOSS;
                self.has_translation = true;
                true
            }
            None => false,
        }
    }

    pub fn has_translation(&self) -> bool {
        self.has_translation
    }

    pub fn candidates(&self) -> &[TranslationCandidate] {
        &self.candidates
    }

    pub fn losses(&self) -> &[f32] {
        &self.losses
    }

    /// Finish the group. Groups where no observed translation
    /// survived filtering produce nothing.
    pub fn close(self) -> Option<Example> {
        if !self.has_translation() {
            return None;
        }
        Some(Example {
            sentence_index:  self.sentence_index,
            context:         self.context,
            source_phrase:   self.source_phrase,
            syntax_features: self.syntax.features,
            parent_label:    self.syntax.parent_label,
            span_bucket:     self.syntax.span_bucket,
            span_start:      self.span.start,
            span_end:        self.span.end,
            candidates:      self.candidates,
            losses:          self.losses,
        })
    }
}

/// A finalised training example handed to the example sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub sentence_index:  usize,
    pub context:         SentenceContext,
    pub source_phrase:   String,
    pub syntax_features: Vec<String>,
    pub parent_label:    String,
    pub span_bucket:     u8,
    pub span_start:      usize,
    pub span_end:        usize,
    pub candidates:      Vec<TranslationCandidate>,
    pub losses:          Vec<f32>,
}
