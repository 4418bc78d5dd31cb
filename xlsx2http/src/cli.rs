//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;

/// Convert a company/item spreadsheet into a batch of `.http` request blocks
///
/// Usage: `xlsx2http <OUTPUT_DIR> <INPUT_FILE>` or `xlsx2http <INPUT_FILE>`
#[derive(Debug, Parser)]
#[command(name = "xlsx2http", version, about, long_about = None)]
pub struct Cli {
    /// Output directory followed by the input workbook, or just the input workbook
    #[arg(value_name = "PATH", num_args = 1..=2, required = true)]
    paths: Vec<PathBuf>,
}

impl Cli {
    /// Split the positional paths into (explicit output dir, input file)
    pub fn into_paths(self) -> (Option<PathBuf>, PathBuf) {
        let mut paths = self.paths.into_iter();
        match (paths.next(), paths.next()) {
            (Some(output_dir), Some(input)) => (Some(output_dir), input),
            (Some(input), None) => (None, input),
            // clap enforces at least one path
            (None, _) => (None, PathBuf::new()),
        }
    }
}
