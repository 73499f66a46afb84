//! This module renders a report [`Table`] with `comfy_table`.

use comfy_table::{Cell, CellAlignment, ContentArrangement};

use crate::report::{CellValue, HEADER, Table};

/// Extension trait for [`Table`] to render it in a terminal.
pub trait ReportTableExt {
    /// Renders the header and every row, followed by a line with the
    /// unfiltered totals the summary formulas would show.
    fn render_table(&self) -> String;
}

impl ReportTableExt for Table {
    fn render_table(&self) -> String {
        let rows = self
            .rows()
            .iter()
            .map(|row| row.cells().into_iter().map(render_cell).collect::<Vec<_>>())
            .collect::<Vec<_>>();

        let table = comfy_table::Table::new()
            .load_preset(comfy_table::presets::NOTHING)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(HEADER.to_vec())
            .add_rows(rows)
            .to_string();

        let totals = self.totals();
        format!(
            "{table}\n\nRequests: {:.3} CPU, {:.3} GiB memory\nLimits:   {:.3} CPU, {:.3} GiB \
             memory",
            totals.request_cpu_cores,
            totals.request_memory_gib,
            totals.limit_cpu_cores,
            totals.limit_memory_gib,
        )
    }
}

/// Numbers are right-aligned so scalar columns line up.
fn render_cell(value: CellValue) -> Cell {
    match value {
        CellValue::Text(text) => Cell::new(text),
        CellValue::Number(number) => Cell::new(number).set_alignment(CellAlignment::Right),
    }
}
