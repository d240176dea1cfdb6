// ============================================================
// Layer 6 - Phrase Table
// ============================================================
// Loads a Moses-style phrase table into memory:
//
//   the cat ||| le chat ||| 0.6 0.4 0.5 0.3 ||| 0-0 1-1 ||| 10 8 6
//   the cat ||| la chatte ||| 0.1 0.2 0.1 0.1
//   cat ||| chat ||| 0.9 0.8 0.7 0.9
//
// Only the first three fields are used. Candidates keep the file
// order of their source phrase. Target phrases get ids starting
// at 1, in order of first appearance; the target index artifact
// lists them one per line in id order.
//
// Reference: Koehn et al. (2007) Moses toolkit, phrase table format

use anyhow::{Context, Result};
use std::{
    collections::{HashMap, HashSet},
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::domain::error::ExtractionError;
use crate::domain::phrase_group::TranslationCandidate;
use crate::domain::traits::PhraseTable;

const FIELD_SEPARATOR: &str = "|||";

#[derive(Debug, Default)]
pub struct FilePhraseTable {
    sources:    HashMap<String, Vec<TranslationCandidate>>,
    target_ids: HashMap<String, usize>,
    /// targets[id - 1] is the phrase with that id
    targets:    Vec<String>,
}

impl FilePhraseTable {
    /// Load the phrase table at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Cannot open phrase table '{}'", path.display()))?;
        let table = Self::from_reader(BufReader::new(file))
            .with_context(|| format!("Cannot load phrase table '{}'", path.display()))?;

        tracing::info!(
            "Loaded phrase table: {} source phrases, {} target phrases",
            table.source_count(),
            table.targets.len()
        );
        Ok(table)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut table      = Self::default();
        let mut seen_pairs = HashSet::new();
        let mut duplicates = 0usize;

        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.with_context(|| format!("Cannot read phrase table line {line_no}"))?;
            if line.trim().is_empty() {
                continue;
            }

            let (source, target, scores) = parse_line(&line, line_no)?;
            if !seen_pairs.insert((source.clone(), target.clone())) {
                duplicates += 1;
            }

            let id = table.intern_target(&target);
            table
                .sources
                .entry(source)
                .or_default()
                .push(TranslationCandidate::new(id, target).with_scores(scores));
        }

        if duplicates > 0 {
            tracing::warn!(
                "Phrase table repeats {} source/target pairs; only the first of each is ever marked correct",
                duplicates
            );
        }
        Ok(table)
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Write the target index, one phrase per line in id order.
    pub fn write_target_index(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Cannot create target index '{}'", path.display()))?;
        let mut out = BufWriter::new(file);
        self.write_target_index_to(&mut out)?;
        out.flush()
            .with_context(|| format!("Cannot write target index '{}'", path.display()))?;

        tracing::debug!("Wrote {} target phrases to '{}'", self.targets.len(), path.display());
        Ok(())
    }

    pub fn write_target_index_to<W: Write>(&self, out: &mut W) -> Result<()> {
        for phrase in &self.targets {
            writeln!(out, "{phrase}")?;
        }
        Ok(())
    }

    fn intern_target(&mut self, target: &str) -> usize {
        if let Some(&id) = self.target_ids.get(target) {
            return id;
        }
        self.targets.push(target.to_string());
        let id = self.targets.len();
        self.target_ids.insert(target.to_string(), id);
        id
    }
}

impl PhraseTable for FilePhraseTable {
    fn contains_source(&self, source_phrase: &str) -> bool {
        self.sources.contains_key(source_phrase)
    }

    fn candidates_for(&self, source_phrase: &str) -> &[TranslationCandidate] {
        self.sources
            .get(source_phrase)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn target_id(&self, target_phrase: &str) -> Option<usize> {
        self.target_ids.get(target_phrase).copied()
    }
}

/// Split one line into (source, target, scores).
fn parse_line(line: &str, line_no: usize) -> Result<(String, String, Vec<f32>), ExtractionError> {
    let malformed = |reason: String| ExtractionError::MalformedPhraseTable { line: line_no, reason };

    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).map(str::trim).collect();
    if fields.len() < 3 {
        return Err(malformed(format!(
            "expected at least 3 '{FIELD_SEPARATOR}' separated fields, found {}",
            fields.len()
        )));
    }
    if fields[0].is_empty() || fields[1].is_empty() {
        return Err(malformed("empty source or target phrase".to_string()));
    }

    let scores = fields[2]
        .split_whitespace()
        .map(|s| s.parse::<f32>().map_err(|e| malformed(format!("score '{s}': {e}"))))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((fields[0].to_string(), fields[1].to_string(), scores))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TABLE: &str = "\
the cat ||| le chat ||| 0.6 0.4 ||| 0-0 1-1 ||| 10 8
the cat ||| la chatte ||| 0.1 0.2
cat ||| chat ||| 0.9 0.8

dog ||| chien ||| 0.7 0.7
cat ||| le chat ||| 0.05 0.1
";

    fn table() -> FilePhraseTable {
        FilePhraseTable::from_reader(Cursor::new(TABLE)).unwrap()
    }

    #[test]
    fn test_candidates_keep_file_order() {
        let t = table();
        let cands: Vec<&str> = t.candidates_for("the cat").iter().map(|c| c.phrase.as_str()).collect();
        assert_eq!(cands, vec!["le chat", "la chatte"]);
        assert_eq!(t.candidates_for("the cat")[0].scores, vec![0.6, 0.4]);
    }

    #[test]
    fn test_target_ids_are_shared_across_sources() {
        let t = table();
        assert_eq!(t.target_id("le chat"), Some(1));
        assert_eq!(t.target_id("chien"), Some(4));
        assert_eq!(t.candidates_for("cat")[1].id, 1);
        assert_eq!(t.target_id("der Hund"), None);
    }

    #[test]
    fn test_unknown_source() {
        let t = table();
        assert!(!t.contains_source("bird"));
        assert!(t.candidates_for("bird").is_empty());
        assert_eq!(t.source_count(), 3);
    }

    #[test]
    fn test_target_index_in_id_order() {
        let mut out = Vec::new();
        table().write_target_index_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "le chat\nla chatte\nchat\nchien\n");
    }

    #[test]
    fn test_bad_score_reports_line() {
        let err = FilePhraseTable::from_reader(Cursor::new("a ||| b ||| 0.5\nc ||| d ||| high\n"))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExtractionError>(),
            Some(ExtractionError::MalformedPhraseTable { line: 2, .. })
        ));
    }

    #[test]
    fn test_missing_fields_rejected() {
        assert!(FilePhraseTable::from_reader(Cursor::new("a ||| b\n")).is_err());
    }

    #[test]
    fn test_duplicate_pairs_are_kept() {
        let t = FilePhraseTable::from_reader(Cursor::new("a ||| b ||| 1\na ||| b ||| 2\n")).unwrap();
        assert_eq!(t.candidates_for("a").len(), 2);
        assert_eq!(t.candidates_for("a")[1].id, 1);
    }
}
