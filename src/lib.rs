// src/lib.rs
pub mod contaminants;
pub mod error;
pub mod matrix;
pub mod rank;
pub mod report;
pub mod sample_id;
pub mod summary;
pub mod types;

use rayon::prelude::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

pub use crate::contaminants::ContaminantSet;
pub use crate::error::MergeError;
pub use crate::matrix::{assemble, MergedMatrix};
pub use crate::rank::TargetRank;
pub use crate::report::parse_report;
pub use crate::sample_id::SampleIdDeriver;
pub use crate::types::{Aggregates, ParsedReport, SampleCounts};

use crate::summary::{write_aggregates_tsv, FailedReport, RunSummary, SampleSummary};

/// Default name of the merged table.
pub const DEFAULT_OUTPUT: &str = "merged_kraken_counts.tsv";

/// What to extract from each report and how.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub target_rank: TargetRank,
    pub contaminants: ContaminantSet,
    pub sample_ids: SampleIdDeriver,
    /// Reports parsed concurrently; 1 parses them one after another.
    pub threads: usize,
}

impl MergeOptions {
    pub fn new(target_rank: TargetRank) -> Self {
        Self {
            target_rank,
            contaminants: ContaminantSet::new(),
            sample_ids: SampleIdDeriver::default(),
            threads: 1,
        }
    }
}

/// Output of a merge run.
pub struct MergeResults {
    pub matrix: MergedMatrix,
    /// One entry per matrix column, in column order.
    pub samples: Vec<SampleSummary>,
    /// Reports that could not be read or named; they have no column.
    /// Input order is not preserved across the two kinds.
    pub failed: Vec<FailedReport>,
    pub summary: RunSummary,
}

impl MergeResults {
    pub fn write_matrix<P: AsRef<Path>>(&self, path: P) -> Result<(), MergeError> {
        let path = path.as_ref();
        let f = File::create(path).map_err(|e| MergeError::io(path, e))?;
        self.matrix
            .write_tsv(BufWriter::new(f))
            .map_err(|e| MergeError::io(path, e))
    }

    pub fn write_aggregates<P: AsRef<Path>>(&self, path: P) -> Result<(), MergeError> {
        let path = path.as_ref();
        let f = File::create(path).map_err(|e| MergeError::io(path, e))?;
        write_aggregates_tsv(BufWriter::new(f), &self.samples).map_err(|e| MergeError::io(path, e))
    }
}

/// Expand a wildcard pattern into report paths, sorted by path.
pub fn discover_reports(pattern: &str) -> Result<Vec<PathBuf>, MergeError> {
    let mut paths = Vec::new();
    for entry in glob::glob(pattern)? {
        match entry {
            Ok(path) => paths.push(path),
            Err(e) => log::warn!("skipping {}: {}", e.path().display(), e.error()),
        }
    }
    if paths.is_empty() {
        return Err(MergeError::NoMatches {
            pattern: pattern.to_string(),
        });
    }
    paths.sort();
    Ok(paths)
}

/// Parse every report and merge them into one matrix.
pub fn merge_reports(paths: &[PathBuf], opts: &MergeOptions) -> Result<MergeResults, MergeError> {
    merge_reports_with(paths, opts, &|_: &Path| {})
}

/// Like [`merge_reports`], calling `on_report` after each report has been read.
/// With more than one thread the calls come from the worker threads.
pub fn merge_reports_with(
    paths: &[PathBuf],
    opts: &MergeOptions,
    on_report: &(dyn Fn(&Path) + Sync),
) -> Result<MergeResults, MergeError> {
    if paths.is_empty() {
        return Err(MergeError::NoInputFiles);
    }

    let mut failed = Vec::new();
    let mut summary = RunSummary {
        files_found: paths.len(),
        ..Default::default()
    };

    // 1. Sample ids; a collision aborts before any report is read
    let mut inputs = Vec::with_capacity(paths.len());
    for (id, path) in opts.sample_ids.derive_all(paths)?.into_iter().zip(paths) {
        match id {
            Ok(id) => inputs.push((id, path)),
            Err(error) => {
                log::warn!("dropping {}: {}", path.display(), error);
                summary.files_failed += 1;
                failed.push(FailedReport {
                    sample_id: String::new(),
                    path: path.clone(),
                    error,
                });
            }
        }
    }

    // 2. Parse
    let parse_one = |(_, path): &(String, &PathBuf)| {
        let parsed = parse_report(path, &opts.target_rank, &opts.contaminants);
        on_report(path.as_path());
        parsed
    };
    let parsed: Vec<Result<ParsedReport, MergeError>> = if opts.threads > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(opts.threads)
            .build()?;
        pool.install(|| inputs.par_iter().map(parse_one).collect())
    } else {
        inputs.iter().map(parse_one).collect()
    };

    // 3. Split successes from failures, keeping input order
    let mut columns = Vec::with_capacity(inputs.len());
    let mut samples = Vec::with_capacity(inputs.len());

    for ((id, path), result) in inputs.into_iter().zip(parsed) {
        match result {
            Ok(report) => {
                summary.files_parsed += 1;
                summary.lines += report.stats;
                samples.push(SampleSummary {
                    sample_id: id.clone(),
                    path: path.clone(),
                    aggregates: report.aggregates,
                    assigned_at_rank: report.counts.total(),
                    stats: report.stats,
                });
                columns.push((id, report.counts));
            }
            Err(error) => {
                log::warn!("dropping sample {}: {}", id, error);
                summary.files_failed += 1;
                failed.push(FailedReport {
                    sample_id: id,
                    path: path.clone(),
                    error,
                });
            }
        }
    }

    if columns.is_empty() {
        return Err(MergeError::NoSamplesParsed {
            attempted: paths.len(),
        });
    }

    // 4. Outer join
    let matrix = assemble(&columns)?;
    log::info!(
        "merged {} sample(s) into {} taxa at rank {}",
        matrix.n_samples(),
        matrix.n_taxa(),
        opts.target_rank
    );

    Ok(MergeResults {
        matrix,
        samples,
        failed,
        summary,
    })
}
