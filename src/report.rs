// src/report.rs

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::contaminants::ContaminantSet;
use crate::error::MergeError;
use crate::rank::{TargetRank, ROOT_RANK, UNCLASSIFIED_RANK};
use crate::types::{ParsedReport, ReportLine};

/// Why a line did not yield a `ReportLine`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSkip {
    Empty,
    /// Number of tab-separated fields found.
    FieldCount(usize),
    BadCount,
}

/// Parse a single report line.
///
/// The line is trimmed, split on tabs, and must have 6 or 8 fields.
/// Rank, taxID and name are trimmed; names are indented in reports.
pub fn parse_report_line(line: &str) -> Result<ReportLine, LineSkip> {
    let line = line.trim();
    if line.is_empty() {
        return Err(LineSkip::Empty);
    }

    let fields: Vec<&str> = line.split('\t').collect();
    let (clade, rank, tax_id, name) = match fields.as_slice() {
        [_, clade, _, _, _, rank, tax_id, name] => (clade, rank, tax_id, name),
        [_, clade, _, rank, tax_id, name] => (clade, rank, tax_id, name),
        other => return Err(LineSkip::FieldCount(other.len())),
    };

    let clade_reads: u64 = clade.trim().parse().map_err(|_| LineSkip::BadCount)?;

    Ok(ReportLine {
        clade_reads,
        rank: rank.trim().to_string(),
        tax_id: tax_id.trim().to_string(),
        name: name.trim().to_string(),
    })
}

/// Extract the counts at `target_rank` plus the root/unclassified totals
/// from any line source.
///
/// Unreadable lines are counted in the returned stats and skipped; only an
/// I/O failure of the reader itself is an error.
pub fn parse_report_reader<R: BufRead>(
    mut reader: R,
    target_rank: &TargetRank,
    contaminants: &ContaminantSet,
) -> io::Result<ParsedReport> {
    let mut parsed = ParsedReport::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break; // EOF
        }
        parsed.stats.lines += 1;

        let text = String::from_utf8_lossy(&buf);
        let line = match parse_report_line(&text) {
            Ok(line) => line,
            Err(LineSkip::Empty) => {
                parsed.stats.empty += 1;
                continue;
            }
            Err(LineSkip::FieldCount(_)) => {
                parsed.stats.malformed += 1;
                continue;
            }
            Err(LineSkip::BadCount) => {
                parsed.stats.bad_count += 1;
                continue;
            }
        };

        // R and U are taken before the target rank check, last one wins.
        if line.rank == ROOT_RANK {
            parsed.aggregates.root = line.clade_reads;
        } else if line.rank == UNCLASSIFIED_RANK {
            parsed.aggregates.unclassified = line.clade_reads;
        } else if !target_rank.matches(&line.rank) {
            continue;
        } else if contaminants.contains(&line.tax_id, &line.name) {
            parsed.stats.excluded += 1;
        } else if line.clade_reads == 0 {
            parsed.stats.zero += 1;
        } else {
            parsed.stats.kept += 1;
            parsed.counts.insert(line.name, line.clade_reads);
        }
    }

    Ok(parsed)
}

/// Parse the report at `path`. Files ending in `.gz` are decompressed on the fly.
pub fn parse_report<P: AsRef<Path>>(
    path: P,
    target_rank: &TargetRank,
    contaminants: &ContaminantSet,
) -> Result<ParsedReport, MergeError> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| MergeError::io(path, e))?;

    let is_gz = path
        .extension()
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let reader: Box<dyn BufRead> = if is_gz {
        Box::new(BufReader::new(MultiGzDecoder::new(f)))
    } else {
        Box::new(BufReader::new(f))
    };

    let parsed = parse_report_reader(reader, target_rank, contaminants)
        .map_err(|e| MergeError::io(path, e))?;

    log::debug!(
        "{}: {} taxa at rank {}, root={}, unclassified={}, {} line(s) skipped",
        path.display(),
        parsed.counts.len(),
        target_rank,
        parsed.aggregates.root,
        parsed.aggregates.unclassified,
        parsed.stats.skipped()
    );

    Ok(parsed)
}
