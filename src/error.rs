// src/error.rs

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can abort a merge run, or knock a single report out of it.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("no files matched the pattern: {pattern}")]
    NoMatches { pattern: String },

    #[error("no report files to merge")]
    NoInputFiles,

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("none of the {attempted} report(s) could be parsed")]
    NoSamplesParsed { attempted: usize },

    #[error(
        "sample id '{id}' derived from both {} and {}",
        first.display(),
        second.display()
    )]
    DuplicateSampleId {
        id: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("sample id '{id}' appears more than once in the merge input")]
    DuplicateSampleColumn { id: String },

    #[error("could not derive a sample id from {}", path.display())]
    EmptySampleId { path: PathBuf },

    #[error("invalid taxonomic rank code '{0}'")]
    InvalidRank(String),

    #[error("sample id '{id}' collides with the row label column")]
    ReservedSampleId { id: String },

    #[error("taxon name '{name}' in sample '{sample}' collides with the row label column")]
    ReservedTaxonName { name: String, sample: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl MergeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        MergeError::Io {
            path: path.into(),
            source,
        }
    }
}
