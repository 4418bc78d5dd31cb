//! Spreadsheet input
//!
//! Only the first worksheet is read. Cells are flattened to strings so the
//! extractor never sees spreadsheet types.

mod reader;

pub use reader::read_first_sheet;
