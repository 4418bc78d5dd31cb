//! Read the first worksheet of a workbook into a string grid

use std::path::{Path, PathBuf};

use calamine::{Data, ExcelDateTime, Range, Reader, open_workbook_auto};
use chrono::Timelike;

use crate::extract::Grid;

/// Failure while loading the input workbook
#[derive(Debug)]
pub enum WorkbookError {
    Open {
        path: PathBuf,
        source: calamine::Error,
    },
    NoSheet {
        path: PathBuf,
    },
    ReadSheet {
        sheet: String,
        source: calamine::Error,
    },
}

impl std::fmt::Display for WorkbookError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkbookError::Open { path, source } => {
                write!(f, "Failed to open Excel file {}: {}", path.display(), source)
            }
            WorkbookError::NoSheet { path } => {
                write!(f, "Could not determine first sheet name of {}", path.display())
            }
            WorkbookError::ReadSheet { sheet, source } => {
                write!(f, "Failed to read rows of sheet '{}': {}", sheet, source)
            }
        }
    }
}

impl std::error::Error for WorkbookError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorkbookError::Open { source, .. } | WorkbookError::ReadSheet { source, .. } => {
                Some(source)
            }
            WorkbookError::NoSheet { .. } => None,
        }
    }
}

/// Flatten a cell to the text a user sees in the sheet
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // Whole numbers without a trailing ".0"
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        Data::DateTime(dt) => format_datetime(dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}

/// Dates as `YYYY-MM-DD`, date-times as `YYYY-MM-DD HH:MM:SS`
///
/// Durations and serials outside chrono's range keep calamine's own rendering.
fn format_datetime(dt: &ExcelDateTime) -> String {
    if dt.is_duration() {
        return dt.to_string();
    }

    match dt.as_datetime() {
        Some(value) if value.num_seconds_from_midnight() == 0 => {
            value.format("%Y-%m-%d").to_string()
        }
        Some(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => dt.to_string(),
    }
}

/// Convert a calamine range into rows anchored at cell A1
///
/// calamine ranges start at the first used cell, so leading empty rows and
/// columns are restored here. Trailing empty cells are cut from every row,
/// which makes rows ragged the same way the sheet looks.
pub fn grid_from_range(range: &Range<Data>) -> Grid {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut rows: Grid = (0..start_row).map(|_| Vec::new()).collect();

    for row in range.rows() {
        let mut cells: Vec<String> = Vec::with_capacity(start_col as usize + row.len());
        cells.extend((0..start_col).map(|_| String::new()));
        cells.extend(row.iter().map(cell_to_string));

        while cells.last().is_some_and(|c| c.is_empty()) {
            cells.pop();
        }
        rows.push(cells);
    }

    rows
}

/// Open `path` and return the first worksheet as a grid
pub fn read_first_sheet<P: AsRef<Path>>(path: P) -> Result<(String, Grid), WorkbookError> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path).map_err(|source| WorkbookError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!("Opened Excel file {}", path.display());

    let sheet_name = workbook
        .sheet_names()
        .first()
        .filter(|name| !name.is_empty())
        .cloned()
        .ok_or_else(|| WorkbookError::NoSheet {
            path: path.to_path_buf(),
        })?;

    log::info!("Using sheet: {}", sheet_name);

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|source| WorkbookError::ReadSheet {
            sheet: sheet_name.clone(),
            source,
        })?;

    let grid = grid_from_range(&range);
    log::info!("Read {} row(s) from sheet '{}'", grid.len(), sheet_name);

    Ok((sheet_name, grid))
}
