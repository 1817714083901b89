// src/rank.rs

use std::fmt;

use crate::error::MergeError;

/// Rank code of the total classified line.
pub const ROOT_RANK: &str = "R";
/// Rank code of the unclassified line.
pub const UNCLASSIFIED_RANK: &str = "U";

/// Single-letter rank codes written by Kraken:
/// unclassified, root, domain, kingdom, phylum, class, order, family, genus, species.
pub const STANDARD_RANKS: [&str; 10] = ["U", "R", "D", "K", "P", "C", "O", "F", "G", "S"];

/// The rank whose lines are pulled out of every report.
///
/// Matching is exact: `S` does not match the `S1` sub-rank lines some
/// reports carry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetRank(String);

impl TargetRank {
    pub fn new(code: &str) -> Result<Self, MergeError> {
        let code = code.trim();
        if code.is_empty() || code.chars().any(char::is_whitespace) {
            return Err(MergeError::InvalidRank(code.to_string()));
        }
        Ok(TargetRank(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is one of the plain Kraken rank letters.
    pub fn is_standard(&self) -> bool {
        STANDARD_RANKS.contains(&self.0.as_str())
    }

    pub fn matches(&self, code: &str) -> bool {
        self.0 == code
    }
}

impl fmt::Display for TargetRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
