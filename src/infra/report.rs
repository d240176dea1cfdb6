// ============================================================
// Layer 6 - Run Report Writer
// ============================================================
// Saves the filtering counters of a run as JSON so several runs
// can be compared later:
//
//   {
//     "source_total": 1200,
//     "source_survived": 950,
//     "target_total": 3100,
//     "target_survived": 2700,
//     "records_skipped": 40,
//     "sentences_read": 500
//   }
//
// The file is created when the run starts and filled in once the
// counters are final.

use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::domain::report::ExtractionReport;

/// A report output that has been created but not yet written.
#[derive(Debug)]
pub struct ReportFile {
    out:  BufWriter<File>,
    path: PathBuf,
}

impl ReportFile {
    /// Create (or truncate) the report file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)
            .with_context(|| format!("Cannot create run report '{}'", path.display()))?;
        Ok(Self { out: BufWriter::new(file), path })
    }

    pub fn write(mut self, report: &ExtractionReport) -> Result<()> {
        write_report_to(report, &mut self.out)
            .and_then(|_| self.out.flush().map_err(Into::into))
            .with_context(|| format!("Cannot write run report to '{}'", self.path.display()))?;

        tracing::debug!("Saved run report to '{}'", self.path.display());
        Ok(())
    }
}

pub fn write_report_to<W: Write>(report: &ExtractionReport, out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}
