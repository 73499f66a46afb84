//! Renders report tables for the terminal.

mod report_ext;

/// Re-exports the [`ReportTableExt`] trait, which renders a report
/// [`Table`](crate::report::Table) the way `preview` prints it.
pub use self::report_ext::ReportTableExt;
