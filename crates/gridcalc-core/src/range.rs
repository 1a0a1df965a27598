//! Rectangular cell ranges and range expansion

use crate::address::CellAddress;
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A range of cells (e.g., "A1:B10")
///
/// The two corners may be given in any order; the range is normalized so that
/// `start` is the top-left and `end` the bottom-right cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRange {
    /// Start address (top-left)
    pub start: CellAddress,
    /// End address (bottom-right)
    pub end: CellAddress,
}

impl CellRange {
    /// Create a new cell range from two corners
    pub fn new(start: CellAddress, end: CellAddress) -> Self {
        Self {
            start: CellAddress::new(start.row.min(end.row), start.col.min(end.col)),
            end: CellAddress::new(start.row.max(end.row), start.col.max(end.col)),
        }
    }

    /// Create a single-cell range
    pub fn single(addr: CellAddress) -> Self {
        Self::new(addr, addr)
    }

    /// Parse a range from A1:B10 notation
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        match s.split_once(':') {
            Some((start, end)) => Self::from_corners(start, end),
            None => Ok(Self::single(CellAddress::parse(s)?)),
        }
    }

    /// Build a range from two corner names such as `"A1"` and `"$B$10"`
    pub fn from_corners(start: &str, end: &str) -> Result<Self> {
        let start = CellAddress::parse(start)
            .map_err(|e| Error::InvalidRange(format!("start corner '{}': {}", start.trim(), e)))?;
        let end = CellAddress::parse(end)
            .map_err(|e| Error::InvalidRange(format!("end corner '{}': {}", end.trim(), e)))?;
        Ok(Self::new(start, end))
    }

    /// Check if a cell is within this range
    pub fn contains(&self, addr: &CellAddress) -> bool {
        addr.row >= self.start.row
            && addr.row <= self.end.row
            && addr.col >= self.start.col
            && addr.col <= self.end.col
    }

    /// Number of rows in the range
    pub fn row_count(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Number of columns in the range
    pub fn col_count(&self) -> u16 {
        self.end.col - self.start.col + 1
    }

    /// Total number of cells in the range
    pub fn cell_count(&self) -> u64 {
        self.row_count() as u64 * self.col_count() as u64
    }

    /// Iterate over all cell addresses, column by column
    ///
    /// Columns form the outer dimension and rows the inner one, so `A1:B2`
    /// yields A1, A2, B1, B2.
    pub fn cells(&self) -> CellRangeIterator {
        CellRangeIterator {
            range: *self,
            current_row: self.start.row,
            current_col: self.start.col,
            remaining: self.cell_count(),
        }
    }

    /// Canonical names of every cell in the range, in [`CellRange::cells`] order
    pub fn names(&self) -> Vec<String> {
        self.cells().map(|addr| addr.key()).collect()
    }

    /// Format as A1:B10 string
    pub fn to_a1_string(&self) -> String {
        if self.start == self.end {
            self.start.to_a1_string()
        } else {
            format!("{}:{}", self.start.to_a1_string(), self.end.to_a1_string())
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Expand two corner names into the ordered, duplicate-free list of enclosed cell names
///
/// # Examples
/// ```
/// use gridcalc_core::expand_range;
///
/// let names = expand_range("A1", "B3").unwrap();
/// assert_eq!(names, ["A1", "A2", "A3", "B1", "B2", "B3"]);
/// ```
pub fn expand_range(start: &str, end: &str) -> Result<Vec<String>> {
    Ok(CellRange::from_corners(start, end)?.names())
}

/// Iterator over cells in a range (columns outer, rows inner)
pub struct CellRangeIterator {
    range: CellRange,
    current_row: u32,
    current_col: u16,
    remaining: u64,
}

impl Iterator for CellRangeIterator {
    type Item = CellAddress;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let addr = CellAddress::new(self.current_row, self.current_col);
        self.remaining -= 1;

        if self.current_row == self.range.end.row {
            self.current_row = self.range.start.row;
            self.current_col = self.current_col.saturating_add(1);
        } else {
            self.current_row += 1;
        }

        Some(addr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CellRangeIterator {}
