// ============================================================
// Layer 4 - Disambiguation Stream Reader
// ============================================================
// Turns a line-oriented PSD stream into DisambiguationRecords.
//
// The reader is an Iterator over Result so the driver can pull
// one record at a time and stop at the first malformed line.
// Blank lines are skipped. Line numbers are 1-based and count
// blank lines, so they match what an editor shows.

use anyhow::{Context, Result};
use std::io::BufRead;

use crate::domain::record::DisambiguationRecord;

pub struct DisambiguationReader<R: BufRead> {
    lines:   std::io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> DisambiguationReader<R> {
    pub fn new(reader: R) -> Self {
        Self { lines: reader.lines(), line_no: 0 }
    }
}

impl<R: BufRead> Iterator for DisambiguationReader<R> {
    type Item = Result<DisambiguationRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_no += 1;

            let line = match line.with_context(|| {
                format!("Cannot read disambiguation line {}", self.line_no)
            }) {
                Ok(line) => line,
                Err(e)   => return Some(Err(e)),
            };

            let line = line.trim_end_matches(['\r', '\n']);
            if line.trim().is_empty() {
                continue;
            }

            return Some(DisambiguationRecord::parse(line, self.line_no).map_err(Into::into));
        }
    }
}
