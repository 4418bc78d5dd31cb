mod cli;
mod clock;
mod config;
mod emit;
mod extract;
mod output;
mod workbook;

use anyhow::{Context, Result};
use clap::Parser;

use crate::cli::Cli;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::emit::{EmitSummary, emit_requests};
use crate::extract::extract_columns;
use crate::output::OutputFile;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (output_dir, input_file) = Cli::parse().into_paths();
    let config = Config::resolve(output_dir, input_file)?;

    log::info!(
        "Output directory: {}, input file: {}, ID match: {}",
        config.output_dir.display(),
        config.input_file.display(),
        config.id_match
    );

    let report = run(&config, &SystemClock)?;
    let summary = &report.emitted;

    log::info!(
        "Sheet '{}': {} column(s), {} request(s) written, {} write failure(s), {} column(s) skipped, {} cell(s) ignored",
        report.sheet_name,
        report.columns,
        summary.blocks_written,
        summary.write_failures,
        summary.skipped_columns.len(),
        report.dropped_cells
    );
    if !report.flushed {
        log::warn!("Output file was not fully flushed; written count may be overstated");
    }
    Ok(())
}

/// What a run produced
#[derive(Debug)]
struct RunReport {
    sheet_name: String,
    columns: usize,
    dropped_cells: usize,
    emitted: EmitSummary,
    /// Whether the buffered output reached the file
    flushed: bool,
}

/// Read the workbook named by `config` and write the request file
fn run(config: &Config, clock: &dyn Clock) -> Result<RunReport> {
    let mut output = OutputFile::create(&config.output_dir, clock)
        .context("Failed to prepare output file")?;

    let (sheet_name, grid) = workbook::read_first_sheet(&config.input_file)
        .context("Failed to load input workbook")?;

    let columns = extract_columns(&grid, config.id_match);
    if columns.is_empty() {
        log::warn!("Sheet '{}' has no company columns", sheet_name);
    }

    let emitted = emit_requests(&columns, output.writer());

    log::info!("Finished writing {}", output.path().display());
    let flushed = output.close();

    Ok(RunReport {
        sheet_name,
        columns: columns.len(),
        dropped_cells: columns.dropped_cells,
        emitted,
        flushed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::extract::IdMatch;
    use rust_xlsxwriter::Workbook;
    use std::fs;
    use std::path::Path;

    fn write_workbook(path: &Path, rows: &[&[&str]]) {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if !cell.is_empty() {
                    sheet.write_string(r as u32, c as u16, *cell).unwrap();
                }
            }
        }
        workbook.save(path).unwrap();
    }

    #[test]
    fn test_run_writes_request_file() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("companies.xlsx");
        write_workbook(
            &input,
            &[
                &["Acme\n", " Globex "],
                &["ID:7", "x ID:8 y"],
                &["apples", ""],
                &["pears", "plums"],
            ],
        );

        let config = Config {
            output_dir: tmp.path().join("out"),
            input_file: input,
            id_match: IdMatch::First,
        };
        let clock = FixedClock::at(2024, 6, 1, 12, 30).unwrap();

        let report = run(&config, &clock).unwrap();
        assert_eq!(report.sheet_name, "Sheet1");
        assert_eq!(report.columns, 2);
        assert_eq!(report.emitted.blocks_written, 2);
        assert_eq!(report.emitted.write_failures, 0);
        assert!(report.flushed);

        let text = fs::read_to_string(tmp.path().join("out").join("output_202406011230.http")).unwrap();
        assert!(text.contains("### Acme 2 \n"));
        assert!(text.contains("content=apples, pears\n&expressNo=\n&id=7\n"));
        assert!(text.contains("### Globex 1 \n"));
        assert!(text.contains("content=plums\n&expressNo=\n&id=8\n"));
        assert!(text.find("&id=7").unwrap() < text.find("&id=8").unwrap());
    }

    #[test]
    fn test_run_fails_on_missing_input() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config {
            output_dir: tmp.path().to_path_buf(),
            input_file: tmp.path().join("nope.xlsx"),
            id_match: IdMatch::First,
        };
        let clock = FixedClock::at(2024, 6, 1, 12, 30).unwrap();

        let err = run(&config, &clock).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load input workbook"));
    }

    #[test]
    fn test_run_takes_every_id_when_configured() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("companies.xlsx");
        write_workbook(
            &input,
            &[&["Acme"], &["ID:1 ID:2"], &["apples"], &["pears"]],
        );

        let mut config = Config {
            output_dir: tmp.path().to_path_buf(),
            input_file: input,
            id_match: IdMatch::All,
        };
        let clock = FixedClock::at(2024, 6, 1, 12, 30).unwrap();

        let report = run(&config, &clock).unwrap();
        assert_eq!(report.emitted.blocks_written, 2);
        let text = fs::read_to_string(tmp.path().join("output_202406011230.http")).unwrap();
        assert!(text.contains("content=apples, pears\n&expressNo=\n&id=1\n"));
        assert!(text.contains("content=apples, pears\n&expressNo=\n&id=2\n"));

        config.id_match = IdMatch::First;
        assert_eq!(run(&config, &clock).unwrap().emitted.blocks_written, 1);
    }

    #[test]
    fn test_run_reports_ignored_cells() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("companies.xlsx");
        write_workbook(
            &input,
            &[&["Acme"], &["ID:1", "ID:2"], &["apples", "extra"]],
        );

        let config = Config {
            output_dir: tmp.path().to_path_buf(),
            input_file: input,
            id_match: IdMatch::First,
        };
        let clock = FixedClock::at(2024, 6, 1, 12, 30).unwrap();

        let report = run(&config, &clock).unwrap();
        assert_eq!(report.columns, 1);
        assert_eq!(report.dropped_cells, 2);
        assert_eq!(report.emitted.blocks_written, 1);
        assert!(report.emitted.skipped_columns.is_empty());
    }
}
