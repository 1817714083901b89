// src/contaminants.rs

use ahash::AHashSet;

/// Taxa to leave out of the merged counts, given by taxID or by name.
///
/// Names on the command line use `_` for spaces (`Escherichia_coli`);
/// they are stored with spaces so they compare against report names directly.
#[derive(Debug, Clone, Default)]
pub struct ContaminantSet {
    entries: AHashSet<String>,
}

impl ContaminantSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a comma-separated list such as `Escherichia_coli,9606`.
    pub fn parse(list: &str) -> Self {
        Self::from_tokens(list.split(','))
    }

    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = tokens
            .into_iter()
            .map(|t| t.as_ref().trim().replace('_', " "))
            .filter(|t| !t.is_empty())
            .collect();
        Self { entries }
    }

    /// True if either the taxID or the name of a line is listed.
    pub fn contains(&self, tax_id: &str, name: &str) -> bool {
        self.entries.contains(tax_id) || self.entries.contains(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
