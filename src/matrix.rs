// src/matrix.rs

use ahash::{AHashMap, AHashSet};
use std::io::{self, Write};

use crate::error::MergeError;
use crate::types::SampleCounts;

/// Header of the row label column.
pub const TAXON_LABEL: &str = "taxon";

/// Dense taxon x sample count table.
///
/// Rows are taxa in the order they were first seen walking the samples in
/// input order; columns are samples in input order. Absent taxa count 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedMatrix {
    taxa: Vec<String>,
    samples: Vec<String>,
    /// Row-major, `taxa.len() * samples.len()` cells.
    cells: Vec<u64>,
    taxon_index: AHashMap<String, usize>,
    sample_index: AHashMap<String, usize>,
}

/// Outer-join the per-sample counts into one matrix.
pub fn assemble(samples: &[(String, SampleCounts)]) -> Result<MergedMatrix, MergeError> {
    let mut seen = AHashSet::with_capacity(samples.len());
    for (id, _) in samples {
        if id == TAXON_LABEL {
            return Err(MergeError::ReservedSampleId { id: id.clone() });
        }
        if !seen.insert(id.as_str()) {
            return Err(MergeError::DuplicateSampleColumn { id: id.clone() });
        }
    }

    // Union of taxon names, first-seen order.
    let mut taxa: Vec<String> = Vec::new();
    let mut taxon_index: AHashMap<String, usize> = AHashMap::new();
    for (id, counts) in samples {
        for name in counts.names() {
            if name == TAXON_LABEL {
                return Err(MergeError::ReservedTaxonName {
                    name: name.to_string(),
                    sample: id.clone(),
                });
            }
            if !taxon_index.contains_key(name) {
                taxon_index.insert(name.to_string(), taxa.len());
                taxa.push(name.to_string());
            }
        }
    }

    let n_samples = samples.len();
    let mut cells = vec![0u64; taxa.len() * n_samples];
    for (col, (_, counts)) in samples.iter().enumerate() {
        for (name, count) in counts.iter() {
            if let Some(&row) = taxon_index.get(name) {
                cells[row * n_samples + col] = count;
            }
        }
    }

    let sample_ids: Vec<String> = samples.iter().map(|(id, _)| id.clone()).collect();
    let sample_index = sample_ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.clone(), i))
        .collect();

    Ok(MergedMatrix {
        taxa,
        samples: sample_ids,
        cells,
        taxon_index,
        sample_index,
    })
}

impl MergedMatrix {
    pub fn taxa(&self) -> &[String] {
        &self.taxa
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn n_taxa(&self) -> usize {
        self.taxa.len()
    }

    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    /// Count of `taxon` in `sample`; `None` only if either is not in the matrix.
    pub fn get(&self, taxon: &str, sample: &str) -> Option<u64> {
        let row = *self.taxon_index.get(taxon)?;
        let col = *self.sample_index.get(sample)?;
        Some(self.cells[row * self.samples.len() + col])
    }

    /// Counts of the `i`-th taxon, one per sample.
    pub fn row(&self, i: usize) -> &[u64] {
        let n = self.samples.len();
        &self.cells[i * n..(i + 1) * n]
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &[u64])> {
        self.taxa
            .iter()
            .enumerate()
            .map(move |(i, taxon)| (taxon.as_str(), self.row(i)))
    }

    /// Column totals, one per sample.
    pub fn column_totals(&self) -> Vec<u64> {
        let mut totals = vec![0u64; self.samples.len()];
        for (_, row) in self.rows() {
            for (t, &v) in totals.iter_mut().zip(row) {
                *t += v;
            }
        }
        totals
    }

    /// Write the matrix as a tab-separated table with a `taxon` header column.
    pub fn write_tsv<W: Write>(&self, mut out: W) -> io::Result<()> {
        out.write_all(self.to_tsv_string().as_bytes())?;
        out.flush()
    }

    pub fn to_tsv_string(&self) -> String {
        let mut output = String::new();
        output.push_str(TAXON_LABEL);
        for sample in &self.samples {
            output.push('\t');
            output.push_str(sample);
        }
        output.push('\n');

        for (taxon, row) in self.rows() {
            output.push_str(taxon);
            for count in row {
                output.push('\t');
                output.push_str(&count.to_string());
            }
            output.push('\n');
        }
        output
    }
}
