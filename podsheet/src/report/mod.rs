//! The capacity report: quantities, scheduling metadata, rows and the table
//! layout that the sheet sinks replay.

mod error;
mod metadata;
mod quantity;
mod row;
mod table;

pub use self::{
    error::Error,
    metadata::PodMetadata,
    quantity::{QuantityError, ResourceKind, ResourceQuantity},
    row::ContainerResourceRow,
    table::{CellRange, CellRef, CellValue, HEADER, Table},
};
