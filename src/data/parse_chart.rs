// ============================================================
// Layer 4 - Parse Chart
// ============================================================
// A syntax chart built from one bracketed parse tree.
//
//   (S (NP (DT the) (NN cat)) (VP (VBZ sleeps)))
//
// becomes the constituent table
//
//   S   [0, 2]   depth 0
//   NP  [0, 1]   depth 1
//   DT  [0, 0]   depth 2
//   NN  [1, 1]   depth 2
//   VP  [2, 2]   depth 1
//   VBZ [2, 2]   depth 2
//
// Preterminals count as constituents, so every single-token span
// has at least one label. An outer bracket without a label, as
// in "( (S ...) )", is accepted and contributes no constituent.
//
// find_parent only answers for spans that are constituents
// themselves; any other span is Unresolved and the caller widens
// it until it hits one. A span touching both sentence edges
// always resolves to the top label.
//
// Reference: Penn Treebank bracketing guidelines (Bies et al. 1995)

use anyhow::Result;

use crate::domain::error::ExtractionError;
use crate::domain::span::Span;
use crate::domain::syntax::{ParentLookup, SyntaxLabel};
use crate::domain::traits::{ChartBuilder, SyntaxChart};

/// Label used when the tree root does not cover the sentence.
pub const TOP_LABEL: &str = "TOP";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constituent {
    pub label: String,
    pub span:  Span,
    pub depth: usize,
}

#[derive(Debug, Clone)]
pub struct ParseChart {
    sentence_len: usize,
    constituents: Vec<Constituent>,
    top_label:    String,
}

impl ParseChart {
    /// Build a chart for a sentence of `sentence_len` tokens.
    /// An empty parse line gives a chart without constituents.
    pub fn from_tree(sentence_len: usize, parse_line: &str) -> Result<Self, ExtractionError> {
        let (mut constituents, leaves) = parse_brackets(parse_line)?;

        if leaves != 0 && leaves != sentence_len {
            tracing::warn!(
                "Parse tree has {} leaves but the sentence has {} tokens",
                leaves,
                sentence_len
            );
        }

        // Outermost first, then left to right
        constituents.sort_by_key(|c| (c.depth, c.span.start, c.span.end));

        let top_label = constituents
            .iter()
            .find(|c| c.span.start == 0 && c.span.end + 1 == sentence_len)
            .map(|c| c.label.clone())
            .unwrap_or_else(|| TOP_LABEL.to_string());

        Ok(Self { sentence_len, constituents, top_label })
    }

    pub fn constituents(&self) -> &[Constituent] {
        &self.constituents
    }

    pub fn top_label(&self) -> &str {
        &self.top_label
    }

    fn exact(&self, start: usize, end: usize) -> impl Iterator<Item = &Constituent> {
        self.constituents
            .iter()
            .filter(move |c| c.span.start == start && c.span.end == end)
    }
}

impl SyntaxChart for ParseChart {
    fn sentence_len(&self) -> usize {
        self.sentence_len
    }

    fn labels_covering(&self, start: usize, end: usize) -> Vec<SyntaxLabel> {
        let labels: Vec<SyntaxLabel> = self
            .exact(start, end)
            .map(|c| SyntaxLabel::constituent(c.label.clone()))
            .collect();
        if labels.is_empty() {
            vec![SyntaxLabel::NoTag]
        } else {
            labels
        }
    }

    fn find_parent(&self, start: usize, end: usize) -> ParentLookup {
        let at_left_boundary = start == 0;

        if at_left_boundary && end + 1 >= self.sentence_len {
            return ParentLookup::resolved(self.top_label.clone(), at_left_boundary);
        }

        if self.exact(start, end).next().is_none() {
            return ParentLookup::unresolved(at_left_boundary);
        }

        // Smallest strictly larger span; deepest node on ties
        let parent = self
            .constituents
            .iter()
            .filter(|c| c.span.start <= start && c.span.end >= end)
            .filter(|c| !(c.span.start == start && c.span.end == end))
            .min_by_key(|c| (c.span.end - c.span.start, std::cmp::Reverse(c.depth)));

        let label = parent.map_or(self.top_label.as_str(), |c| c.label.as_str());
        ParentLookup::resolved(label, at_left_boundary)
    }
}

/// Builds ParseCharts for the extraction driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseChartBuilder;

impl ChartBuilder for ParseChartBuilder {
    type Chart = ParseChart;

    fn build(&self, sentence_len: usize, parse_line: &str) -> Result<ParseChart> {
        Ok(ParseChart::from_tree(sentence_len, parse_line)?)
    }
}

// ─── Bracket Parsing ──────────────────────────────────────────────────────────

enum Token<'a> {
    Open,
    Close,
    Word(&'a str),
}

fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;

    for (i, ch) in line.char_indices() {
        let is_break = ch == '(' || ch == ')' || ch.is_whitespace();
        if is_break {
            if let Some(s) = word_start.take() {
                tokens.push(Token::Word(&line[s..i]));
            }
            match ch {
                '(' => tokens.push(Token::Open),
                ')' => tokens.push(Token::Close),
                _   => {}
            }
        } else if word_start.is_none() {
            word_start = Some(i);
        }
    }
    if let Some(s) = word_start {
        tokens.push(Token::Word(&line[s..]));
    }
    tokens
}

/// Returns the constituents and the number of leaves.
fn parse_brackets(line: &str) -> Result<(Vec<Constituent>, usize), ExtractionError> {
    let tokens = tokenize(line);
    let mut constituents = Vec::new();
    // (label, first leaf position)
    let mut stack: Vec<(Option<&str>, usize)> = Vec::new();
    let mut position = 0usize;
    let mut i = 0usize;

    while i < tokens.len() {
        match tokens[i] {
            Token::Open => {
                let label = match tokens.get(i + 1) {
                    Some(Token::Word(w)) => {
                        i += 1;
                        Some(*w)
                    }
                    _ => None,
                };
                stack.push((label, position));
            }
            Token::Close => {
                let (label, start) = stack.pop().ok_or_else(|| ExtractionError::MalformedParse {
                    reason: format!("unbalanced ')' after {position} leaves"),
                })?;
                if let Some(label) = label {
                    if position > start {
                        constituents.push(Constituent {
                            label: label.to_string(),
                            span:  Span::new(start, position - 1),
                            depth: stack.len(),
                        });
                    }
                }
            }
            Token::Word(_) => {
                if stack.is_empty() {
                    return Err(ExtractionError::MalformedParse {
                        reason: "leaf outside of any bracket".to_string(),
                    });
                }
                position += 1;
            }
        }
        i += 1;
    }

    if !stack.is_empty() {
        return Err(ExtractionError::MalformedParse {
            reason: format!("{} unclosed '('", stack.len()),
        });
    }

    // An unlabelled wrapper shifts every depth by one; normalise so
    // the outermost labelled node sits at depth 0.
    if let Some(min_depth) = constituents.iter().map(|c| c.depth).min() {
        for c in &mut constituents {
            c.depth -= min_depth;
        }
    }

    Ok((constituents, position))
}
