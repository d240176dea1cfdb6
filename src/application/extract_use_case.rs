// ============================================================
// Layer 2 - ExtractUseCase
// ============================================================
// Runs one extraction end to end:
//
//   Step 1: Open the three lockstep input streams   (Layer 4 - data)
//   Step 2: Load the phrase table and config        (Layer 6 - infra)
//   Step 3: Create the report and training outputs  (Layer 6 - infra)
//   Step 4: Write the target index                  (Layer 6 - infra)
//   Step 5: Run the extraction driver               (Layer 5 - extraction)
//   Step 6: Fill in the run report, if requested    (Layer 6 - infra)
//
// Every input is opened and every output created before the
// first record is read, so a missing file fails the run early.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::BufReader,
    path::Path,
};

use crate::data::{
    cursor::SentenceCursor,
    disambiguation::DisambiguationReader,
    parse_chart::ParseChartBuilder,
};
use crate::domain::report::ExtractionReport;
use crate::extraction::{
    driver::ExtractionDriver,
    features::FeatureExtractor,
    resolver::SyntaxSpanResolver,
};
use crate::infra::{
    extractor_config::load_extractor_config,
    phrase_table::FilePhraseTable,
    report::ReportFile,
    vw_sink::VwTrainSink,
};

// ─── Run Configuration ───────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    pub disambiguation_path:   String,
    pub parse_path:            String,
    pub corpus_path:           String,
    pub phrase_table_path:     String,
    pub extractor_config_path: String,
    pub output_train_path:     String,
    pub output_index_path:     String,
    pub report_path:           Option<String>,
    pub max_widening_steps:    Option<usize>,
}

// ─── ExtractUseCase ──────────────────────────────────────────────────────────
pub struct ExtractUseCase {
    config: ExtractConfig,
}

impl ExtractUseCase {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    /// Execute the full extraction and return its counters.
    pub fn execute(&self) -> Result<ExtractionReport> {
        let cfg = &self.config;

        // ── Step 1: Open input streams ───────────────────────────────────────
        let records = DisambiguationReader::new(open(&cfg.disambiguation_path, "disambiguation")?);
        let mut cursor = SentenceCursor::new(
            open(&cfg.corpus_path, "corpus")?,
            open(&cfg.parse_path, "parse")?,
        );

        // ── Step 2: Phrase table and extractor config ────────────────────────
        let table     = FilePhraseTable::load(&cfg.phrase_table_path)?;
        let extractor = load_extractor_config(&cfg.extractor_config_path)?;
        let factors   = extractor.factor_count();

        // ── Step 3: Outputs ──────────────────────────────────────────────────
        let report_file = cfg.report_path.as_ref().map(ReportFile::create).transpose()?;
        let mut sink = VwTrainSink::create(&cfg.output_train_path, FeatureExtractor::new(extractor))?;

        // ── Step 4: Target index ─────────────────────────────────────────────
        table.write_target_index(&cfg.output_index_path)?;

        // ── Step 5: Main loop ────────────────────────────────────────────────
        tracing::info!("Extracting examples from '{}'", cfg.disambiguation_path);
        let charts = ParseChartBuilder;
        let mut driver = ExtractionDriver::new(&table, &charts, &mut sink, factors);
        if let Some(limit) = cfg.max_widening_steps {
            driver = driver.with_resolver(SyntaxSpanResolver::with_step_limit(limit));
        }
        let report = driver.run(records, &mut cursor)?;

        tracing::info!(
            "Wrote {} examples from {} sentences to '{}'",
            sink.written(),
            report.sentences_read,
            cfg.output_train_path
        );

        // ── Step 6: Run report ───────────────────────────────────────────────
        if let Some(file) = report_file {
            file.write(&report)?;
        }

        Ok(report)
    }
}

fn open(path: &str, what: &str) -> Result<BufReader<File>> {
    let file = File::open(Path::new(path))
        .with_context(|| format!("Cannot open {what} stream '{path}'"))?;
    Ok(BufReader::new(file))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ExtractionError;
    use std::fs;
    use tempfile::TempDir;

    const CORPUS: &str = "we saw the cat\n";
    const PARSE:  &str = "(S (NP (PRP we)) (VP (VBD saw) (NP (DT the) (NN cat))))\n";
    const TABLE:  &str = "\
the cat ||| le chaton ||| 0.2
the cat ||| le chat ||| 0.7
we ||| nous ||| 0.9
saw the ||| a vu le ||| 0.3
";
    const RECORDS: &str = "\
1\t2\t3\t1\t2\tthe cat\tle chat
1\t0\t0\t0\t0\twe\tnous
1\t1\t1\t0\t0\tsaw\tvu
";
    const CONFIG: &str = r#"{"factors": ["surface"], "features": {"source_external": false}}"#;

    fn write_inputs(dir: &TempDir, records: &str) -> ExtractConfig {
        let path = |name: &str| dir.path().join(name).to_string_lossy().into_owned();
        fs::write(path("psd.tsv"), records).unwrap();
        fs::write(path("corpus.txt"), CORPUS).unwrap();
        fs::write(path("parse.txt"), PARSE).unwrap();
        fs::write(path("table.txt"), TABLE).unwrap();
        fs::write(path("config.json"), CONFIG).unwrap();

        ExtractConfig {
            disambiguation_path:   path("psd.tsv"),
            parse_path:            path("parse.txt"),
            corpus_path:           path("corpus.txt"),
            phrase_table_path:     path("table.txt"),
            extractor_config_path: path("config.json"),
            output_train_path:     path("train.vw"),
            output_index_path:     path("targets.txt"),
            report_path:           Some(path("report.json")),
            max_widening_steps:    None,
        }
    }

    #[test]
    fn test_end_to_end_extraction() {
        let dir    = tempfile::tempdir().unwrap();
        let cfg    = write_inputs(&dir, RECORDS);
        let report = ExtractUseCase::new(cfg.clone()).execute().unwrap();

        assert_eq!(report.source_total, 2);
        assert_eq!(report.source_survived, 2);
        assert_eq!(report.target_total, 2);
        assert_eq!(report.target_survived, 2);
        assert_eq!(report.records_skipped, 1);
        assert_eq!(report.sentences_read, 1);

        let index = fs::read_to_string(&cfg.output_index_path).unwrap();
        assert_eq!(index, "le chaton\nle chat\nnous\na vu le\n");

        let train = fs::read_to_string(&cfg.output_train_path).unwrap();
        let blocks: Vec<&str> = train.split("\n\n").filter(|b| !b.trim().is_empty()).collect();
        assert_eq!(blocks.len(), 2);

        let cat: Vec<&str> = blocks[0].lines().collect();
        assert!(cat[0].starts_with("shared |s srcphr^the_cat"));
        assert!(cat[0].contains("syn^NP parent^VP span^2"));
        assert!(cat[1].starts_with("1:1 |t tgtphr^le_chaton"));
        assert!(cat[2].starts_with("2:0 |t tgtphr^le_chat"));

        let we: Vec<&str> = blocks[1].lines().collect();
        assert!(we[0].contains("syn^NP syn^PRP parent^S span^1"));
        assert_eq!(we[1], "3:0 |t tgtphr^nous tgtint^nous p0:0.9");

        let saved = fs::read_to_string(cfg.report_path.as_deref().unwrap()).unwrap();
        let saved: ExtractionReport = serde_json::from_str(&saved).unwrap();
        assert_eq!(saved, report);
    }

    #[test]
    fn test_missing_input_fails_before_outputs_exist() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = write_inputs(&dir, RECORDS);
        cfg.parse_path = dir.path().join("absent.txt").to_string_lossy().into_owned();

        let err = ExtractUseCase::new(cfg.clone()).execute().unwrap_err();
        assert!(err.to_string().contains("parse"));
        assert!(!Path::new(&cfg.output_train_path).exists());
        assert!(!Path::new(&cfg.output_index_path).exists());
    }

    #[test]
    fn test_integrity_error_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = write_inputs(&dir, "2\t0\t0\t0\t0\twe\tnous\n");

        let err = ExtractUseCase::new(cfg).execute().unwrap_err();
        let fatal = err.chain().find_map(|e| e.downcast_ref::<ExtractionError>());
        assert!(matches!(
            fatal,
            Some(ExtractionError::StreamExhausted { stream: "corpus", sentence: 2 })
        ));
    }

    #[test]
    fn test_unwritable_report_fails_before_processing() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = write_inputs(&dir, RECORDS);
        cfg.report_path = Some(dir.path().join("no_such_dir").join("report.json").to_string_lossy().into_owned());

        let err = ExtractUseCase::new(cfg.clone()).execute().unwrap_err();
        assert!(err.to_string().contains("Cannot create run report"));
        assert!(!Path::new(&cfg.output_train_path).exists());
        assert!(!Path::new(&cfg.output_index_path).exists());
    }

    const WIDENING_RECORD: &str = "1\t1\t2\t0\t2\tsaw the\ta vu le\n";

    #[test]
    fn test_widening_cap_from_config_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = write_inputs(&dir, WIDENING_RECORD);
        cfg.max_widening_steps = Some(1);

        let err = ExtractUseCase::new(cfg).execute().unwrap_err();
        let fatal = err.chain().find_map(|e| e.downcast_ref::<ExtractionError>());
        assert!(matches!(
            fatal,
            Some(ExtractionError::UnterminatedWidening { start: 1, end: 2, limit: 1 })
        ));
    }

    #[test]
    fn test_widening_cap_large_enough_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = write_inputs(&dir, WIDENING_RECORD);
        cfg.max_widening_steps = Some(2);

        let report = ExtractUseCase::new(cfg.clone()).execute().unwrap();
        assert_eq!(report.source_survived, 1);

        let train = fs::read_to_string(&cfg.output_train_path).unwrap();
        assert!(train.contains("syn^NOTAG parent^S span^2"));
    }
}
