// src/sample_id.rs

use ahash::AHashMap;
use std::path::{Path, PathBuf};

use crate::error::MergeError;

/// Suffix Kraken pipelines conventionally append to report file names.
pub const DEFAULT_MARKER: &str = "_kraken.report";

/// Turns report file names into sample column names by cutting the file
/// name at `marker`: `S01_kraken.report` -> `S01`.
#[derive(Debug, Clone)]
pub struct SampleIdDeriver {
    marker: String,
}

impl Default for SampleIdDeriver {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

impl SampleIdDeriver {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Everything in the base name before the first occurrence of the marker,
    /// or the whole base name when the marker is absent (or empty).
    pub fn derive<P: AsRef<Path>>(&self, path: P) -> Result<String, MergeError> {
        let path = path.as_ref();
        let base = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        let id = match self.marker.as_str() {
            "" => &base[..],
            marker => base.find(marker).map_or(&base[..], |pos| &base[..pos]),
        };

        if id.is_empty() {
            return Err(MergeError::EmptySampleId {
                path: path.to_path_buf(),
            });
        }
        Ok(id.to_string())
    }

    /// Derive ids for every path, in order.
    ///
    /// A path with no usable id gets its own `Err` entry and is left out of
    /// the collision check; a collision between two derived ids fails the
    /// whole call.
    pub fn derive_all(
        &self,
        paths: &[PathBuf],
    ) -> Result<Vec<Result<String, MergeError>>, MergeError> {
        let ids: Vec<_> = paths.iter().map(|path| self.derive(path)).collect();
        check_unique(
            ids.iter()
                .zip(paths)
                .filter_map(|(id, path)| Some((id.as_ref().ok()?.as_str(), path))),
        )?;
        Ok(ids)
    }
}

/// Two distinct files must never map onto the same sample column.
pub fn check_unique<'a, I>(ids: I) -> Result<(), MergeError>
where
    I: IntoIterator<Item = (&'a str, &'a PathBuf)>,
{
    let mut seen: AHashMap<&str, &PathBuf> = AHashMap::new();
    for (id, path) in ids {
        if let Some(first) = seen.insert(id, path) {
            return Err(MergeError::DuplicateSampleId {
                id: id.to_string(),
                first: first.clone(),
                second: path.clone(),
            });
        }
    }
    Ok(())
}
