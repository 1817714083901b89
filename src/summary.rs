// src/summary.rs

use std::io::{self, Write};
use std::path::PathBuf;

use crate::error::MergeError;
use crate::types::{Aggregates, LineStats};

/// Per-sample totals kept alongside the matrix.
#[derive(Debug, Clone)]
pub struct SampleSummary {
    pub sample_id: String,
    pub path: PathBuf,
    pub aggregates: Aggregates,
    /// Sum of the counts that made it into the matrix for this sample.
    pub assigned_at_rank: u64,
    pub stats: LineStats,
}

/// Reports dropped from the run, with the reason.
#[derive(Debug)]
pub struct FailedReport {
    pub sample_id: String,
    pub path: PathBuf,
    pub error: MergeError,
}

/// Run-wide counters, for the closing log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    pub files_found: usize,
    pub files_parsed: usize,
    pub files_failed: usize,
    pub lines: LineStats,
}

impl RunSummary {
    pub fn log(&self) {
        log::info!(
            "parsed {}/{} report(s), {} failed; {} line(s) read, {} skipped ({} malformed, {} bad counts), {} contaminant line(s) excluded",
            self.files_parsed,
            self.files_found,
            self.files_failed,
            self.lines.lines,
            self.lines.skipped(),
            self.lines.malformed,
            self.lines.bad_count,
            self.lines.excluded,
        );
    }
}

/// Write `sample / root / unclassified / assigned_at_rank` as a TSV table.
pub fn write_aggregates_tsv<W: Write>(mut out: W, samples: &[SampleSummary]) -> io::Result<()> {
    writeln!(out, "sample\troot\tunclassified\tassigned_at_rank")?;
    for s in samples {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            s.sample_id, s.aggregates.root, s.aggregates.unclassified, s.assigned_at_rank
        )?;
    }
    out.flush()
}
