//! Request emission
//!
//! Walks the extracted columns and writes one request block per ID. Problems
//! with a single column or a single write are logged and counted; the run
//! carries on with the next block.

mod template;

pub use template::{RequestBlock, VALUE_SEPARATOR};

use std::io::Write;

use crate::extract::{ColumnBundle, Columns};

/// Error for a column that cannot be rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitError {
    MissingCompanyName { column: usize },
}

impl std::fmt::Display for EmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmitError::MissingCompanyName { column } => {
                write!(f, "missing company name for column {}", column)
            }
        }
    }
}

impl std::error::Error for EmitError {}

/// Outcome of an emission run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitSummary {
    pub blocks_written: usize,
    pub write_failures: usize,
    /// Columns that had values but could not be rendered
    pub skipped_columns: Vec<usize>,
}

/// Column data prepared for rendering, shared by all its blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRequest<'a> {
    pub company_name: &'a str,
    pub num_entries: usize,
    pub content: String,
    pub ids: &'a [String],
}

impl<'a> ColumnRequest<'a> {
    /// Prepare a column; `Ok(None)` when it has no values to send
    pub fn from_bundle(bundle: &'a ColumnBundle) -> Result<Option<Self>, EmitError> {
        if !bundle.has_values() {
            return Ok(None);
        }

        let company_name = bundle
            .company_name
            .as_deref()
            .ok_or(EmitError::MissingCompanyName {
                column: bundle.index,
            })?;

        Ok(Some(Self {
            company_name,
            num_entries: bundle.values.len(),
            content: bundle.values.join(VALUE_SEPARATOR),
            ids: &bundle.ids,
        }))
    }

    pub fn blocks(&self) -> impl Iterator<Item = RequestBlock<'_>> {
        self.ids.iter().map(move |id| RequestBlock {
            company_name: self.company_name,
            num_entries: self.num_entries,
            content: &self.content,
            id: id.as_str(),
        })
    }
}

/// Write every request block for `columns` to `out`
pub fn emit_requests<W: Write>(columns: &Columns, out: &mut W) -> EmitSummary {
    let mut summary = EmitSummary::default();

    for bundle in columns.iter() {
        let request = match ColumnRequest::from_bundle(bundle) {
            Ok(Some(request)) => request,
            Ok(None) => continue,
            Err(e) => {
                log::error!("Skipping column: {}", e);
                summary.skipped_columns.push(bundle.index);
                continue;
            }
        };

        if request.ids.is_empty() {
            log::debug!(
                "Column {} ({}) has {} value(s) but no ID",
                bundle.index,
                request.company_name,
                request.num_entries
            );
        }

        for block in request.blocks() {
            match write!(out, "{}", block) {
                Ok(()) => summary.blocks_written += 1,
                Err(e) => {
                    log::error!("Failed to write request for id {}: {}", block.id, e);
                    summary.write_failures += 1;
                }
            }
        }
    }

    summary
}
