//! gf-forcing: input documents and forcing series assembly.
//!
//! One grid cell's run consumes exactly two aligned hourly series, both in
//! inches: precipitation (from the input document, mm) and potential
//! evapotranspiration (from one of three sources, see [`EvapSource`]). The
//! assembler owns the alignment invariant: a series that does not match the
//! simulation window is an error, never silently truncated or padded.

mod assemble;
mod evap;
mod input;

pub use assemble::{ForcingBundle, assemble};
pub use evap::{DailyNormals, EvapSource, MonthlyNormals, build_evap_series, builtin_monthly};
pub use input::{InputDocument, Series};

use thiserror::Error;

pub type ForcingResult<T> = Result<T, ForcingError>;

#[derive(Error, Debug)]
pub enum ForcingError {
    #[error("Series {name} has {actual} values; the window requires {expected}")]
    SeriesLength {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Input document: {0}")]
    BadDocument(#[from] serde_json::Error),

    #[error("Daily PET normals: {what}")]
    BadNormals { what: String },

    #[error("Daily PET normals have no column for grid cell {gridcell}")]
    UnknownCell { gridcell: String },

    #[error("Daily PET normals have no entry for {month:02}-{day:02}")]
    MissingDay { month: u32, day: u32 },

    #[error(transparent)]
    Core(#[from] gf_core::CoreError),
}
