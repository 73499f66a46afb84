//! Terminal rendering of the report.

pub mod table;
