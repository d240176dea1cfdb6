// ============================================================
// Layer 5 - Extraction Driver
// ============================================================
// The main loop. Pulls disambiguation records one at a time and
// folds them into phrase groups:
//
//   record ──► source in table? ──no──► skip (records_skipped)
//                  │ yes
//                  ▼
//          cursor.advance_to(sentence)
//                  │
//                  ▼
//       same source phrase as open group?
//          │ yes                 │ no
//          │                     ▼
//          │        close open group (emit if it has a translation)
//          │        open new group: context, chart, syntax, bucket
//          ▼                     │
//       target_total += 1 ◄──────┘
//       mark target id in the open group (target_survived on hit)
//
// When the records run out, the last open group is closed the
// same way and the sink is finished.
//
// Groups rely on records for one source phrase being adjacent.
// An occurrence (sentence, phrase, span) that shows up again
// after its group was closed is rejected.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::io::BufRead;

use crate::data::context::read_factored_line;
use crate::data::cursor::SentenceCursor;
use crate::domain::error::ExtractionError;
use crate::domain::phrase_group::{GroupSyntax, PhraseGroup, CORRECT_LOSS};
use crate::domain::record::DisambiguationRecord;
use crate::domain::report::ExtractionReport;
use crate::domain::span::{span_bucket, Span};
use crate::domain::traits::{ChartBuilder, ExampleSink, PhraseTable};
use crate::extraction::resolver::SyntaxSpanResolver;

/// What a record does to the open group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    SameGroup,
    NewGroup,
}

/// Occurrences seen in the current sentence.
#[derive(Default)]
struct OccurrenceLog {
    sentence: usize,
    seen:     HashSet<(String, Span)>,
}

impl OccurrenceLog {
    fn enter_sentence(&mut self, sentence: usize) {
        if sentence != self.sentence {
            self.sentence = sentence;
            self.seen.clear();
        }
    }

    /// Record an occurrence. When `opens_group` is set, a repeat
    /// means the records were not contiguous.
    fn note(&mut self, record: &DisambiguationRecord, opens_group: bool) -> Result<(), ExtractionError> {
        let key = (record.source_phrase.clone(), record.source_span);
        let fresh = self.seen.insert(key);
        if opens_group && !fresh {
            return Err(ExtractionError::NonContiguousGroup {
                phrase:   record.source_phrase.clone(),
                sentence: record.sentence_index,
            });
        }
        Ok(())
    }
}

pub struct ExtractionDriver<'a, T, B, S> {
    table:        &'a T,
    charts:       &'a B,
    sink:         &'a mut S,
    resolver:     SyntaxSpanResolver,
    factor_count: usize,
}

impl<'a, T, B, S> ExtractionDriver<'a, T, B, S>
where
    T: PhraseTable,
    B: ChartBuilder,
    S: ExampleSink,
{
    pub fn new(table: &'a T, charts: &'a B, sink: &'a mut S, factor_count: usize) -> Self {
        Self {
            table,
            charts,
            sink,
            resolver: SyntaxSpanResolver::new(),
            factor_count,
        }
    }

    pub fn with_resolver(mut self, resolver: SyntaxSpanResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Consume every record, emit the surviving groups and return
    /// the run's counters. The sink is finished before returning.
    pub fn run<I, C, P>(
        &mut self,
        records: I,
        cursor:  &mut SentenceCursor<C, P>,
    ) -> Result<ExtractionReport>
    where
        I: IntoIterator<Item = Result<DisambiguationRecord>>,
        C: BufRead,
        P: BufRead,
    {
        let mut report      = ExtractionReport::default();
        let mut current     = None::<PhraseGroup>;
        let mut occurrences = OccurrenceLog::default();

        for record in records {
            let record = record?;

            if !self.table.contains_source(&record.source_phrase) {
                report.records_skipped += 1;
                tracing::trace!("Source phrase '{}' not in phrase table", record.source_phrase);
                continue;
            }

            report.sentences_read += cursor.advance_to(record.sentence_index)?;
            occurrences.enter_sentence(record.sentence_index);

            let transition = match &current {
                Some(group) if group.source_phrase == record.source_phrase => Transition::SameGroup,
                _ => Transition::NewGroup,
            };
            occurrences.note(&record, transition == Transition::NewGroup)?;

            let group = match (transition, current.take()) {
                (Transition::SameGroup, Some(group)) => group,
                (_, previous) => {
                    if let Some(previous) = previous {
                        self.close_group(previous, &mut report)?;
                    }
                    self.open_group(&record, cursor)?
                }
            };
            let group = current.insert(group);

            report.target_total += 1;
            if let Some(target_id) = self.table.target_id(&record.target_phrase) {
                if group.mark_if_correct(target_id) {
                    report.target_survived += 1;
                }
            }
        }

        if let Some(last) = current.take() {
            self.close_group(last, &mut report)?;
        }
        self.sink.finish().context("Cannot finish example output")?;

        tracing::info!(
            "Extraction finished: {} of {} source phrases emitted",
            report.source_survived,
            report.source_total
        );
        Ok(report)
    }

    /// Build a group for the record's source phrase from the
    /// current sentence and parse lines.
    fn open_group<C: BufRead, P: BufRead>(
        &self,
        record: &DisambiguationRecord,
        cursor: &SentenceCursor<C, P>,
    ) -> Result<PhraseGroup> {
        let span   = record.source_span;
        let length = span.length()?;

        let context = read_factored_line(cursor.current_sentence()?, self.factor_count)?;
        if span.end >= context.len() {
            return Err(ExtractionError::SpanOutOfSentence {
                sentence:     record.sentence_index,
                start:        span.start,
                end:          span.end,
                sentence_len: context.len(),
            }
            .into());
        }

        let chart = self
            .charts
            .build(context.len(), cursor.current_parse()?)
            .with_context(|| format!("Cannot build syntax chart for sentence {}", record.sentence_index))?;

        let features = self.resolver.syntax_features(&chart, span);
        let parent   = self.resolver.resolve_parent(&chart, span)?;

        tracing::debug!(
            "Group '{}' sentence {} span {}: labels {:?}, parent {} after {} widening steps",
            record.source_phrase,
            record.sentence_index,
            span,
            features,
            parent.label,
            parent.steps
        );

        let candidates = self.table.candidates_for(&record.source_phrase).to_vec();
        let mut group  = PhraseGroup::open(record.source_phrase.as_str(), span, candidates);
        group.sentence_index = record.sentence_index;
        group.context        = context;
        group.syntax         = GroupSyntax {
            features,
            parent_label: parent.label,
            span_bucket:  span_bucket(length),
        };
        Ok(group)
    }

    fn close_group(&mut self, group: PhraseGroup, report: &mut ExtractionReport) -> Result<()> {
        report.source_total += 1;
        tracing::trace!(
            "Closing group '{}': {} candidates, {} marked correct",
            group.source_phrase,
            group.candidates().len(),
            group.losses().iter().filter(|&&loss| loss == CORRECT_LOSS).count()
        );
        let phrase = group.source_phrase.clone();
        if let Some(example) = group.close() {
            report.source_survived += 1;
            self.sink
                .consume(&example)
                .with_context(|| format!("Cannot write example for '{phrase}'"))?;
        }
        Ok(())
    }
}
