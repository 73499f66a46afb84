use std::path::PathBuf;

use rust_xlsxwriter::XlsxError;
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to name worksheet '{sheet_name}', error: {source}"))]
    NameSheet { sheet_name: String, source: XlsxError },

    #[snafu(display("Failed to write cell {cell}, error: {source}"))]
    WriteCell { cell: String, source: XlsxError },

    #[snafu(display("Failed to set auto-filter on {range}, error: {source}"))]
    SetAutofilter { range: String, source: XlsxError },

    #[snafu(display("Failed to write formula into {cell}, error: {source}"))]
    WriteFormula { cell: String, source: XlsxError },

    #[snafu(display("Failed to save workbook to {}, error: {source}", path.display()))]
    SaveWorkbook { path: PathBuf, source: XlsxError },
}
