//! Text patterns applied to header cells

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n]+").unwrap());

static ID_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"ID:([0-9]+)").unwrap());

/// How many `ID:<digits>` tokens to take from one sub-header cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdMatch {
    /// Only the leftmost token
    #[default]
    First,
    /// Every token, left to right
    All,
}

impl FromStr for IdMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" => Ok(IdMatch::First),
            "all" => Ok(IdMatch::All),
            other => Err(format!(
                "Unknown ID match mode '{}', expected 'first' or 'all'",
                other
            )),
        }
    }
}

impl std::fmt::Display for IdMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdMatch::First => write!(f, "first"),
            IdMatch::All => write!(f, "all"),
        }
    }
}

/// Remove every CR/LF run, then trim surrounding whitespace
pub fn normalize_company_name(cell: &str) -> String {
    LINE_BREAKS.replace_all(cell, "").trim().to_string()
}

/// Pull the digit part of `ID:<digits>` tokens out of a cell
pub fn extract_ids(cell: &str, mode: IdMatch) -> Vec<String> {
    let ids = ID_TOKEN
        .captures_iter(cell)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    match mode {
        IdMatch::First => ids.take(1).collect(),
        IdMatch::All => ids.collect(),
    }
}
