//! gf-params: reference parameter tables for every known HRU.
//!
//! The tables ship inside the crate as CSV text with composite row labels
//! (`"A/B, forest, flat"`). They parse once, on first use, into typed
//! per-family maps; rows are plain copyable structs so each simulation can
//! take its own copy without touching the shared table.

mod table;

pub use table::{ImperviousParams, ParamRow, ParamTables, PerviousParams, builtin};

use thiserror::Error;

pub type ParamsResult<T> = Result<T, ParamsError>;

#[derive(Error, Debug)]
pub enum ParamsError {
    #[error("Reference table is missing column {column}")]
    MissingColumn { column: &'static str },

    #[error("Row {row}: expected {expected} fields, found {found}")]
    FieldCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row {row}: label {label:?} should name {expected} axes, found {found}")]
    LabelShape {
        row: usize,
        label: String,
        expected: usize,
        found: usize,
    },

    #[error("Row {row}: unknown {axis} label {label:?}")]
    UnknownLabel {
        row: usize,
        axis: &'static str,
        label: String,
    },

    #[error("Row {row}: column {column} is not numeric: {value:?}")]
    BadNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("Duplicate parameter row for {hru}")]
    DuplicateHru { hru: String },
}
