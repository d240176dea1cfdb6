// ============================================================
// Layer 6 - Vowpal Wabbit Training Sink
// ============================================================
// Writes examples in Vowpal Wabbit's label-dependent-features
// multiline format (csoaa_ldf), one block per example:
//
//   shared |s srcphr^the_cat srcext^L1^0^saw parent^VP span^2
//   4:1 |t tgtphr^le_chaton tgtint^le tgtint^chaton p0:0.1
//   5:0 |t tgtphr^le_chat tgtint^le tgtint^chat p0:0.6
//   <blank line>
//
// Labels are "target id:loss". Indicator features are written
// bare, real-valued ones as name:value.
//
// Reference: Vowpal Wabbit wiki, "Cost-Sensitive One Against All
//            with label dependent features"

use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::domain::phrase_group::Example;
use crate::domain::traits::ExampleSink;
use crate::extraction::features::{Feature, FeatureExtractor};

const SHARED_NAMESPACE:    char = 's';
const CANDIDATE_NAMESPACE: char = 't';

pub struct VwTrainSink<W: Write> {
    out:       W,
    extractor: FeatureExtractor,
    written:   usize,
}

impl VwTrainSink<BufWriter<File>> {
    /// Create (or truncate) the training file at `path`.
    pub fn create(path: impl AsRef<Path>, extractor: FeatureExtractor) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Cannot create training output '{}'", path.display()))?;
        Ok(Self::new(BufWriter::new(file), extractor))
    }
}

impl<W: Write> VwTrainSink<W> {
    pub fn new(out: W, extractor: FeatureExtractor) -> Self {
        Self { out, extractor, written: 0 }
    }

    /// Number of examples written so far.
    pub fn written(&self) -> usize {
        self.written
    }
}

impl<W: Write> ExampleSink for VwTrainSink<W> {
    fn consume(&mut self, example: &Example) -> Result<()> {
        let features = self.extractor.extract(example);

        write!(self.out, "shared |{SHARED_NAMESPACE}")?;
        write_features(&mut self.out, &features.shared)?;
        writeln!(self.out)?;

        let rows = example.candidates.iter().zip(&example.losses).zip(&features.candidates);
        for ((candidate, loss), candidate_features) in rows {
            write!(self.out, "{}:{} |{CANDIDATE_NAMESPACE}", candidate.id, loss)?;
            write_features(&mut self.out, candidate_features)?;
            writeln!(self.out)?;
        }
        writeln!(self.out)?;

        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush().context("Cannot flush training output")?;
        tracing::debug!("Wrote {} training examples", self.written);
        Ok(())
    }
}

fn write_features<W: Write>(out: &mut W, features: &[Feature]) -> std::io::Result<()> {
    for f in features {
        let name = escape(&f.name);
        if f.value == 1.0 {
            write!(out, " {name}")?;
        } else {
            write!(out, " {name}:{}", f.value)?;
        }
    }
    Ok(())
}

/// Replace characters VW reserves inside feature names.
fn escape(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            ':'                   => out.push_str("_COLON_"),
            '|'                   => out.push_str("_PIPE_"),
            c if c.is_whitespace() => out.push('_'),
            c                     => out.push(c),
        }
    }
    out
}
