//! Spreadsheet back ends the report is written into.

mod error;
mod xlsx;

pub use self::{error::Error, xlsx::XlsxSink};
use crate::report::{CellRange, CellRef, CellValue};

/// The operations the report needs from a spreadsheet document.
pub trait SheetSink {
    /// Writes `cells` into `row`, starting at column A.
    ///
    /// # Errors
    ///
    /// Returns an error if the back end rejects a cell.
    fn write_row(&mut self, row: u32, cells: &[CellValue]) -> Result<(), Error>;

    /// Declares an auto-filter over `range`.
    ///
    /// # Errors
    ///
    /// Returns an error if the back end rejects the range.
    fn set_autofilter(&mut self, range: CellRange) -> Result<(), Error>;

    /// Stores `formula` in `cell`.
    ///
    /// # Errors
    ///
    /// Returns an error if the back end rejects the formula.
    fn write_formula(&mut self, cell: CellRef, formula: &str) -> Result<(), Error>;
}
