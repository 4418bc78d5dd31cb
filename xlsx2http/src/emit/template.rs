//! The `.http` request block written for every (column, ID) pair

use std::fmt;

/// Separator placed between the values of one column
pub const VALUE_SEPARATOR: &str = ", ";

const DIVIDER: &str = "### ------------------------------------------------";
const REQUEST_LINE: &str = "POST http://address:port/xxxx/xxxxx";
const CONTENT_TYPE: &str = "Content-Type: application/x-www-form-urlencoded";

/// One rendered request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBlock<'a> {
    pub company_name: &'a str,
    pub num_entries: usize,
    pub content: &'a str,
    pub id: &'a str,
}

impl fmt::Display for RequestBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", DIVIDER)?;
        // Trailing space after the count is part of the format
        writeln!(f, "### {} {} ", self.company_name, self.num_entries)?;
        writeln!(f, "{}", REQUEST_LINE)?;
        writeln!(f, "{}", CONTENT_TYPE)?;
        writeln!(f)?;
        writeln!(f, "content={}", self.content)?;
        writeln!(f, "&expressNo=")?;
        writeln!(f, "&id={}", self.id)?;
        write!(f, "\n\n\n")
    }
}
