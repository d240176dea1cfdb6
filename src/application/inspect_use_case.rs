// ============================================================
// Layer 2 - InspectChartUseCase
// ============================================================
// Builds the chart for a single sentence/parse pair and shows
// what the extractor would see. Used to debug misaligned parse
// and corpus files without running a full extraction.

use anyhow::Result;
use std::fmt;

use crate::data::context::sentence_len;
use crate::data::parse_chart::{Constituent, ParseChart};
use crate::domain::span::{span_bucket, Span};
use crate::extraction::resolver::{ParentResolution, SyntaxSpanResolver};

/// Syntax view of one source span.
#[derive(Debug, Clone)]
pub struct SpanInspection {
    pub span:     Span,
    pub features: Vec<String>,
    pub parent:   ParentResolution,
    pub bucket:   u8,
}

#[derive(Debug, Clone)]
pub struct ChartInspection {
    pub sentence_len: usize,
    pub top_label:    String,
    pub constituents: Vec<Constituent>,
    pub span:         Option<SpanInspection>,
}

pub struct InspectChartUseCase {
    resolver: SyntaxSpanResolver,
}

impl InspectChartUseCase {
    pub fn new(resolver: SyntaxSpanResolver) -> Self {
        Self { resolver }
    }

    pub fn inspect(&self, sentence: &str, parse: &str, span: Option<Span>) -> Result<ChartInspection> {
        let len   = sentence_len(sentence);
        let chart = ParseChart::from_tree(len, parse)?;

        let span = match span {
            Some(span) => {
                let bucket = span_bucket(span.length()?);
                Some(SpanInspection {
                    span,
                    features: self.resolver.syntax_features(&chart, span),
                    parent:   self.resolver.resolve_parent(&chart, span)?,
                    bucket,
                })
            }
            None => None,
        };

        Ok(ChartInspection {
            sentence_len: len,
            top_label:    chart.top_label().to_string(),
            constituents: chart.constituents().to_vec(),
            span,
        })
    }
}

impl fmt::Display for ChartInspection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sentence length: {}", self.sentence_len)?;
        writeln!(f, "Top label:       {}", self.top_label)?;
        writeln!(f, "Constituents:")?;
        for c in &self.constituents {
            writeln!(f, "  {:indent$}{} {}", "", c.label, c.span, indent = c.depth * 2)?;
        }

        if let Some(s) = &self.span {
            writeln!(f, "Span {}:", s.span)?;
            writeln!(f, "  syntax features: {}", s.features.join(" "))?;
            writeln!(
                f,
                "  parent:          {} at {} after {} widening steps",
                s.parent.label, s.parent.widened, s.parent.steps
            )?;
            writeln!(f, "  span bucket:     {}", s.bucket)?;
        }
        Ok(())
    }
}
