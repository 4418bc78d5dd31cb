//! Column extraction
//!
//! Transposes a worksheet grid into per-column bundles:
//! - row 0 holds the company name of each column
//! - row 1 holds free text with an embedded `ID:<digits>` token
//! - rows 2.. hold the content values

mod patterns;

pub use patterns::IdMatch;

use patterns::{extract_ids, normalize_company_name};

/// Rows of cell strings as read from the first worksheet
pub type Grid = Vec<Vec<String>>;

/// Everything extracted for a single spreadsheet column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnBundle {
    /// Column position (0-based, A = 0)
    pub index: usize,
    /// Normalized company name from the header row
    pub company_name: Option<String>,
    /// IDs found in the sub-header row, in match order
    pub ids: Vec<String>,
    /// Non-empty data cells, top to bottom
    pub values: Vec<String>,
}

impl ColumnBundle {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    pub fn has_values(&self) -> bool {
        !self.values.is_empty()
    }
}

/// Result of extracting a grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Columns {
    pub bundles: Vec<ColumnBundle>,
    /// Cells that sat beyond the header row's width and were ignored
    pub dropped_cells: usize,
}

impl Columns {
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnBundle> {
        self.bundles.iter()
    }
}

/// Split a grid into column bundles
///
/// Grids with fewer than two rows yield no columns. The number of columns is
/// fixed by the width of row 0; cells past that width on later rows are
/// counted in [`Columns::dropped_cells`] and otherwise ignored.
pub fn extract_columns(rows: &[Vec<String>], id_match: IdMatch) -> Columns {
    if rows.len() < 2 {
        log::debug!("Grid has {} row(s), nothing to extract", rows.len());
        return Columns::default();
    }

    let num_cols = rows[0].len();
    let mut bundles: Vec<ColumnBundle> = (0..num_cols).map(ColumnBundle::new).collect();
    let mut dropped_cells = 0;

    for (row_idx, row) in rows.iter().enumerate() {
        if row.len() > num_cols {
            dropped_cells += row.len() - num_cols;
        }

        for (col_idx, cell) in row.iter().take(num_cols).enumerate() {
            let bundle = &mut bundles[col_idx];
            match row_idx {
                0 => bundle.company_name = Some(normalize_company_name(cell)),
                1 => bundle.ids.extend(extract_ids(cell, id_match)),
                _ if !cell.is_empty() => bundle.values.push(cell.clone()),
                _ => {}
            }
        }
    }

    if dropped_cells > 0 {
        log::warn!(
            "Ignored {} cell(s) outside the {} header column(s)",
            dropped_cells,
            num_cols
        );
    }

    log::debug!(
        "Extracted {} column(s) from {} row(s)",
        bundles.len(),
        rows.len()
    );

    Columns {
        bundles,
        dropped_cells,
    }
}
