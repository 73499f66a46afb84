use std::fmt;

use k8s_openapi::api::core::v1::Pod;

use crate::{
    report::{ContainerResourceRow, Error},
    sink::{self, SheetSink},
};

/// Column titles, in the order of [`ContainerResourceRow::cells`].
pub const HEADER: [&str; 15] = [
    "Namespace",
    "Pod",
    "Node",
    "Container",
    "Request.Cpu",
    "Request.Cpu(Canonical)",
    "Request.Mem",
    "Request.Mem(Canonical)",
    "Limits.Cpu",
    "Limits.Cpu(Canonical)",
    "Limits.Mem",
    "Limits.Mem(Canonical)",
    "Affinity",
    "NodeSelector",
    "TopologySpreadConstraints",
];

const SUMMARY_ROW: u32 = 1;
const HEADER_ROW: u32 = 2;
const FIRST_DATA_ROW: u32 = 3;

/// The auto-filter ends at column M, leaving `NodeSelector` and
/// `TopologySpreadConstraints` outside of it. Existing workbooks built on this
/// report rely on that range.
const FILTER_LAST_COLUMN: u16 = 12;

/// `SUBTOTAL` function number for a sum that skips rows hidden by a filter.
const SUBTOTAL_SUM_VISIBLE: u8 = 109;

const CPU_DIVISOR: &str = "/1000";
const MEMORY_DIVISOR: &str = "/1024/1024/1024";

/// Scalar columns summed above the header, with the divisor that turns
/// milli-cores into cores and bytes into GiB.
const SUMMARY_COLUMNS: [(u16, &str); 4] =
    [(4, CPU_DIVISOR), (6, MEMORY_DIVISOR), (8, CPU_DIVISOR), (10, MEMORY_DIVISOR)];

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// A cell address: 1-based row, 0-based column. Displays in A1 notation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRef {
    pub row: u32,
    pub column: u16,
}

impl CellRef {
    #[must_use]
    pub const fn new(row: u32, column: u16) -> Self { Self { row, column } }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut letters = Vec::new();
        let mut index = u32::from(self.column) + 1;
        while index > 0 {
            letters.push(char::from(b'A' + ((index - 1) % 26) as u8));
            index = (index - 1) / 26;
        }
        letters.iter().rev().try_for_each(|letter| write!(f, "{letter}"))?;
        write!(f, "{}", self.row)
    }
}

/// An inclusive rectangle of cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
    pub first: CellRef,
    pub last: CellRef,
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.first, self.last)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    Number(i64),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryFormula {
    pub cell: CellRef,
    pub formula: String,
}

/// Column totals in the units of the summary formulas, as they evaluate with
/// no filter applied.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResourceTotals {
    pub request_cpu_cores: f64,
    pub request_memory_gib: f64,
    pub limit_cpu_cores: f64,
    pub limit_memory_gib: f64,
}

/// The report layout: summary formulas on row 1, the header on row 2 and one
/// row per container from row 3 on.
#[derive(Clone, Debug, Default)]
pub struct Table {
    rows: Vec<ContainerResourceRow>,
}

impl Table {
    /// Lays out `rows` in the order given.
    pub fn build<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = ContainerResourceRow>,
    {
        Self { rows: rows.into_iter().collect() }
    }

    /// Projects and lays out every container of `pods`.
    ///
    /// # Errors
    ///
    /// Fails if any container carries a malformed quantity; no table is
    /// produced in that case.
    pub fn from_pods(pods: &[Pod]) -> Result<Self, Error> {
        ContainerResourceRow::project_all(pods).map(Self::build)
    }

    #[must_use]
    pub fn rows(&self) -> &[ContainerResourceRow] { &self.rows }

    /// Rows paired with their sheet row number.
    pub fn positioned_rows(&self) -> impl Iterator<Item = (u32, &ContainerResourceRow)> {
        (FIRST_DATA_ROW..).zip(self.rows.iter())
    }

    #[must_use]
    pub const fn filter_range() -> CellRange {
        CellRange {
            first: CellRef::new(HEADER_ROW, 0),
            last: CellRef::new(HEADER_ROW, FILTER_LAST_COLUMN),
        }
    }

    /// Last sheet row covered by the summary formulas. With no data this is
    /// the first data row, so a range never reaches up into the header.
    #[must_use]
    pub fn last_data_row(&self) -> u32 {
        self.positioned_rows().last().map_or(FIRST_DATA_ROW, |(row, _)| row)
    }

    /// The four filter-aware totals placed above the header.
    #[must_use]
    pub fn summary_formulas(&self) -> [SummaryFormula; 4] {
        let last_row = self.last_data_row();
        SUMMARY_COLUMNS.map(|(column, divisor)| {
            let range = CellRange {
                first: CellRef::new(FIRST_DATA_ROW, column),
                last: CellRef::new(last_row, column),
            };
            SummaryFormula {
                cell: CellRef::new(SUMMARY_ROW, column),
                formula: format!("SUBTOTAL({SUBTOTAL_SUM_VISIBLE},{range}){divisor}"),
            }
        })
    }

    /// Spreadsheets hold numbers as `f64`, so these totals carry the same
    /// precision as the evaluated formulas.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn totals(&self) -> ResourceTotals {
        let sum = |scalar: fn(&ContainerResourceRow) -> i64| {
            self.rows.iter().map(|row| i128::from(scalar(row))).sum::<i128>() as f64
        };
        ResourceTotals {
            request_cpu_cores: sum(|row| row.request_cpu.scalar) / 1000.0,
            request_memory_gib: sum(|row| row.request_memory.scalar) / BYTES_PER_GIB,
            limit_cpu_cores: sum(|row| row.limit_cpu.scalar) / 1000.0,
            limit_memory_gib: sum(|row| row.limit_memory.scalar) / BYTES_PER_GIB,
        }
    }

    /// Replays the table into `sink`: header, filter, rows, then formulas.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by the sink.
    pub fn write_to<S>(&self, sink: &mut S) -> Result<(), sink::Error>
    where
        S: SheetSink + ?Sized,
    {
        sink.write_row(HEADER_ROW, &HEADER.map(|title| CellValue::Text(title.to_string())))?;
        sink.set_autofilter(Self::filter_range())?;
        for (row, record) in self.positioned_rows() {
            sink.write_row(row, &record.cells())?;
        }
        for SummaryFormula { cell, formula } in self.summary_formulas() {
            sink.write_formula(cell, &formula)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        report::testing::{container, pod},
        sink::testing::RecordingSink,
    };

    fn scenario_pods() -> Vec<Pod> {
        vec![pod(
            "shop",
            "web-0",
            vec![
                container("a", &[("cpu", "500m"), ("memory", "128Mi")], &[]),
                container("b", &[], &[]),
            ],
        )]
    }

    #[test]
    fn test_cell_ref_display() {
        assert_eq!(CellRef::new(1, 0).to_string(), "A1");
        assert_eq!(CellRef::new(2, 12).to_string(), "M2");
        assert_eq!(CellRef::new(3, 14).to_string(), "O3");
        assert_eq!(CellRef::new(7, 25).to_string(), "Z7");
        assert_eq!(CellRef::new(7, 26).to_string(), "AA7");
        assert_eq!(CellRef::new(9, 701).to_string(), "ZZ9");
        assert_eq!(CellRef::new(9, 702).to_string(), "AAA9");
    }

    #[test]
    fn test_header_layout() {
        assert_eq!(HEADER.len(), 15);
        assert_eq!(HEADER[4], "Request.Cpu");
        assert_eq!(HEADER[14], "TopologySpreadConstraints");
        assert_eq!(Table::filter_range().to_string(), "A2:M2");
    }

    #[test]
    fn test_two_container_scenario() {
        let table = Table::from_pods(&scenario_pods()).unwrap();

        let positions: Vec<_> = table
            .positioned_rows()
            .map(|(row, record)| (row, record.container_name.as_str(), record.request_cpu.scalar))
            .collect();
        assert_eq!(positions, [(3, "a", 500), (4, "b", 0)]);
        assert_eq!(table.last_data_row(), 4);

        let formulas = table.summary_formulas();
        assert_eq!(formulas[0].cell.to_string(), "E1");
        assert_eq!(formulas[0].formula, "SUBTOTAL(109,E3:E4)/1000");
        assert_eq!(formulas[1].cell.to_string(), "G1");
        assert_eq!(formulas[1].formula, "SUBTOTAL(109,G3:G4)/1024/1024/1024");
        assert_eq!(formulas[2].cell.to_string(), "I1");
        assert_eq!(formulas[2].formula, "SUBTOTAL(109,I3:I4)/1000");
        assert_eq!(formulas[3].cell.to_string(), "K1");
        assert_eq!(formulas[3].formula, "SUBTOTAL(109,K3:K4)/1024/1024/1024");

        let totals = table.totals();
        assert!((totals.request_cpu_cores - 0.5).abs() < f64::EPSILON);
        assert!((totals.request_memory_gib - 0.125).abs() < f64::EPSILON);
        assert!(totals.limit_cpu_cores.abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_table() {
        let table = Table::from_pods(&[]).unwrap();
        assert!(table.rows().is_empty());
        assert_eq!(table.last_data_row(), 3);
        assert_eq!(table.totals(), ResourceTotals::default());

        let formulas: Vec<_> =
            table.summary_formulas().into_iter().map(|summary| summary.formula).collect();
        assert_eq!(formulas, [
            "SUBTOTAL(109,E3:E3)/1000",
            "SUBTOTAL(109,G3:G3)/1024/1024/1024",
            "SUBTOTAL(109,I3:I3)/1000",
            "SUBTOTAL(109,K3:K3)/1024/1024/1024",
        ]);

        let mut sink = RecordingSink::default();
        table.write_to(&mut sink).unwrap();
        assert_eq!(sink.rows.len(), 1);
        assert_eq!(sink.autofilter.map(|range| range.to_string()).as_deref(), Some("A2:M2"));
        assert_eq!(sink.formulas.len(), 4);
    }

    #[test]
    fn test_row_count_matches_container_count() {
        let pods = vec![
            pod("a", "one", vec![container("x", &[], &[])]),
            pod("a", "two", vec![container("y", &[], &[]), container("z", &[], &[])]),
            pod("b", "three", Vec::new()),
        ];
        let table = Table::from_pods(&pods).unwrap();
        assert_eq!(table.rows().len(), 3);
        assert_eq!(table.last_data_row(), 5);
        assert_eq!(table.summary_formulas()[0].formula, "SUBTOTAL(109,E3:E5)/1000");
    }

    #[test]
    fn test_duplicate_rows_are_kept() {
        let pods = scenario_pods();
        let rows = ContainerResourceRow::project_all(&pods).unwrap();
        let table = Table::build(rows.iter().cloned().chain(rows.iter().cloned()));
        assert_eq!(table.rows().len(), 4);
        assert_eq!(table.rows()[0], table.rows()[2]);
    }

    #[test]
    fn test_write_to_places_header_rows_and_formulas() {
        let table = Table::from_pods(&scenario_pods()).unwrap();
        let mut sink = RecordingSink::default();
        table.write_to(&mut sink).unwrap();

        let (header_row, header) = &sink.rows[0];
        assert_eq!(*header_row, 2);
        assert_eq!(header.len(), 15);
        assert_eq!(header[0], CellValue::Text("Namespace".to_string()));

        let data_rows: Vec<_> = sink.rows[1..].iter().map(|(row, _)| *row).collect();
        assert_eq!(data_rows, [3, 4]);
        assert_eq!(sink.rows[1].1[4], CellValue::Number(500));
        assert_eq!(sink.rows[2].1[4], CellValue::Number(0));

        let cells: Vec<_> = sink.formulas.iter().map(|(cell, _)| cell.to_string()).collect();
        assert_eq!(cells, ["E1", "G1", "I1", "K1"]);
        assert!(sink.formulas.iter().all(|(_, formula)| !formula.contains("E2")));
    }
}
