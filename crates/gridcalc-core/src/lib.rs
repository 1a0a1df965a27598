//! # gridcalc-core
//!
//! Core addressing types for the gridcalc formula engine.
//!
//! This crate provides:
//! - [`CellAddress`] - A1-style cell names with optional `$` anchors
//! - [`CellRange`] - Rectangular ranges and their column-major enumeration
//! - [`expand_range`] - Two corner names to the ordered list of enclosed cell names
//!
//! ## Example
//!
//! ```rust
//! use gridcalc_core::{CellAddress, CellRange};
//!
//! let addr: CellAddress = "$B$2".parse().unwrap();
//! assert_eq!(addr.key(), "B2");
//!
//! let range = CellRange::parse("A1:B10").unwrap();
//! assert_eq!(range.cell_count(), 20);
//! ```

pub mod address;
pub mod error;
pub mod range;

pub use address::{canonical_name, CellAddress};
pub use error::{Error, Result};
pub use range::{expand_range, CellRange, CellRangeIterator};

/// Maximum number of rows in a grid
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a grid
pub const MAX_COLS: u16 = 16_384;
