use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet};
use snafu::ResultExt;

use crate::{
    report::{CellRange, CellRef, CellValue},
    sink::{
        SheetSink,
        error::{self, Error},
    },
};

/// An `.xlsx` document with a single worksheet. Nothing touches the disk
/// until [`XlsxSink::save`].
pub struct XlsxSink {
    worksheet: Worksheet,
}

impl XlsxSink {
    /// Creates an empty worksheet named `sheet_name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NameSheet`] if Excel would reject the name.
    pub fn new(sheet_name: &str) -> Result<Self, Error> {
        let mut worksheet = Worksheet::new();
        let _ = worksheet
            .set_name(sheet_name)
            .context(error::NameSheetSnafu { sheet_name })?;
        Ok(Self { worksheet })
    }

    /// Writes the workbook to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SaveWorkbook`] if the file cannot be written.
    pub fn save(self, path: &Path) -> Result<(), Error> {
        let mut workbook = Workbook::new();
        workbook.push_worksheet(self.worksheet);
        workbook.save(path).context(error::SaveWorkbookSnafu { path })
    }
}

impl SheetSink for XlsxSink {
    // Cells store numbers as `f64`; scalars beyond 2^53 lose their low digits.
    #[allow(clippy::cast_precision_loss)]
    fn write_row(&mut self, row: u32, cells: &[CellValue]) -> Result<(), Error> {
        for (column, value) in (0_u16..).zip(cells) {
            // The document is 0-based, `CellRef` rows are 1-based.
            let (sheet_row, cell) = (row - 1, CellRef::new(row, column));
            let written = match value {
                CellValue::Text(text) => self.worksheet.write_string(sheet_row, column, text),
                CellValue::Number(number) => {
                    self.worksheet.write_number(sheet_row, column, *number as f64)
                }
            };
            let _ = written.context(error::WriteCellSnafu { cell: cell.to_string() })?;
        }
        Ok(())
    }

    fn set_autofilter(&mut self, range: CellRange) -> Result<(), Error> {
        let CellRange { first, last } = range;
        let _ = self
            .worksheet
            .autofilter(first.row - 1, first.column, last.row - 1, last.column)
            .context(error::SetAutofilterSnafu { range: range.to_string() })?;
        Ok(())
    }

    fn write_formula(&mut self, cell: CellRef, formula: &str) -> Result<(), Error> {
        let _ = self
            .worksheet
            .write_formula(cell.row - 1, cell.column, formula)
            .context(error::WriteFormulaSnafu { cell: cell.to_string() })?;
        Ok(())
    }
}
