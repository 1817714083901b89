//src/types.rs

use ahash::AHashMap;
use std::ops::AddAssign;

/// A structured representation of one well-formed line of a Kraken report.
///
/// Both report layouts are accepted:
/// ```text
///  %  clade  direct  minimizers  uniq_minimizers  rank  taxID  name   (8 fields)
///  %  clade  direct  rank  taxID  name                                (6 fields)
/// ```
/// Only the columns the merge needs are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub clade_reads: u64,
    pub rank: String,
    pub tax_id: String,
    pub name: String,
}

/// Root (total classified) and unclassified counts of one report.
/// Both stay 0 when the report has no `R` / `U` line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aggregates {
    pub root: u64,
    pub unclassified: u64,
}

/// Tally of what happened to each line of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineStats {
    /// Every line read, including blank ones.
    pub lines: usize,
    pub empty: usize,
    /// Field count other than 6 or 8.
    pub malformed: usize,
    /// Clade count not an unsigned integer.
    pub bad_count: usize,
    /// Lines at the target rank dropped as contaminants.
    pub excluded: usize,
    /// Lines at the target rank with a zero clade count.
    pub zero: usize,
    pub kept: usize,
}

impl LineStats {
    /// Lines skipped because they could not be read as a report line.
    pub fn skipped(&self) -> usize {
        self.malformed + self.bad_count
    }
}

impl AddAssign for LineStats {
    fn add_assign(&mut self, rhs: Self) {
        self.lines += rhs.lines;
        self.empty += rhs.empty;
        self.malformed += rhs.malformed;
        self.bad_count += rhs.bad_count;
        self.excluded += rhs.excluded;
        self.zero += rhs.zero;
        self.kept += rhs.kept;
    }
}

/// Per-sample counts at a single rank, keyed by taxon name.
///
/// Names keep the position in which they were first inserted; inserting an
/// existing name replaces its count in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleCounts {
    names: Vec<String>,
    counts: Vec<u64>,
    index: AHashMap<String, usize>,
}

impl SampleCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `count`, returning the count it replaced.
    pub fn insert(&mut self, name: impl Into<String>, count: u64) -> Option<u64> {
        let name = name.into();
        if let Some(&i) = self.index.get(&name) {
            return Some(std::mem::replace(&mut self.counts[i], count));
        }
        self.index.insert(name.clone(), self.names.len());
        self.names.push(name);
        self.counts.push(count);
        None
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.index.get(name).map(|&i| self.counts[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in first-inserted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.counts.iter().copied())
    }

    /// Sum of all stored counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for SampleCounts {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut counts = SampleCounts::new();
        for (name, count) in iter {
            counts.insert(name, count);
        }
        counts
    }
}

/// Everything extracted from one report.
#[derive(Debug, Clone, Default)]
pub struct ParsedReport {
    pub counts: SampleCounts,
    pub aggregates: Aggregates,
    pub stats: LineStats,
}
