//! Run configuration
//!
//! Resolved once from the command line and the environment (after loading an
//! optional `.env`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::extract::IdMatch;

/// Environment variable selecting how many IDs to take per cell
pub const ID_MATCH_ENV: &str = "XLSX2HTTP_ID_MATCH";

/// Default output location, relative to the home directory
const DEFAULT_OUTPUT_SUBDIR: [&str; 2] = ["workspace", "xlsx2http"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub output_dir: PathBuf,
    pub input_file: PathBuf,
    pub id_match: IdMatch,
}

impl Config {
    /// Build from parsed arguments, falling back to `~/workspace/xlsx2http`
    pub fn resolve(output_dir: Option<PathBuf>, input_file: PathBuf) -> Result<Self> {
        let output_dir = match output_dir {
            Some(dir) => dir,
            None => {
                let home = dirs::home_dir().context("Failed to determine user home directory")?;
                default_output_dir(&home)
            }
        };

        let id_match = id_match_from(std::env::var(ID_MATCH_ENV).ok().as_deref())?;

        Ok(Self {
            output_dir,
            input_file,
            id_match,
        })
    }
}

pub fn default_output_dir(home: &Path) -> PathBuf {
    DEFAULT_OUTPUT_SUBDIR
        .iter()
        .fold(home.to_path_buf(), |dir, part| dir.join(part))
}

/// Parse the ID match mode; unset or blank means the default
fn id_match_from(raw: Option<&str>) -> Result<IdMatch> {
    match raw.map(str::trim) {
        None | Some("") => Ok(IdMatch::default()),
        Some(value) => value
            .parse()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Invalid {}", ID_MATCH_ENV)),
    }
}
