//! Name search

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Record;

/// Characters ignored by normalized matching
const SEPARATORS: [char; 4] = ['.', '_', ',', '-'];

/// How a search term is compared with record names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Contains,
    Exact,
}

impl FromStr for SearchMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "contains" => Ok(SearchMode::Contains),
            "exact" => Ok(SearchMode::Exact),
            other => Err(Error::Query(format!("unknown search mode: {}", other))),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Contains => f.write_str("contains"),
            SearchMode::Exact => f.write_str("exact"),
        }
    }
}

/// Case-insensitive name matching over a record snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSearchEngine;

impl TextSearchEngine {
    pub fn new() -> Self {
        Self
    }

    /// Records whose name matches `term`, in snapshot order.
    ///
    /// An empty term, or one made only of ignored separators, returns
    /// nothing. With `normalize`, `. _ , -` are
    /// dropped from both sides so `P.12-A` finds `P12A`.
    pub fn search<'r>(&self, records: &'r [Record], term: &str, mode: SearchMode, normalize: bool) -> Vec<&'r Record> {
        search(records, term, mode, normalize)
    }
}

/// Records whose name matches `term`, in snapshot order
pub fn search<'r>(records: &'r [Record], term: &str, mode: SearchMode, normalize: bool) -> Vec<&'r Record> {
    let query = fold(term, normalize);
    if query.is_empty() {
        return Vec::new();
    }

    records
        .iter()
        .filter(|record| !record.name.is_empty())
        .filter(|record| {
            let name = fold(&record.name, normalize);
            match mode {
                SearchMode::Exact => name == query,
                SearchMode::Contains => name.contains(&query),
            }
        })
        .collect()
}

fn fold(value: &str, normalize: bool) -> String {
    let lower = value.to_lowercase();
    if normalize {
        lower.chars().filter(|c| !SEPARATORS.contains(c)).collect()
    } else {
        lower
    }
}
