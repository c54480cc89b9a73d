//! gf-core: stable foundation for gridflow.
//!
//! Contains:
//! - hru (typed land-parcel identifiers + code synthesis)
//! - siminfo (simulation window + step arithmetic)
//! - convert (unit constants + output rounding)
//! - error (shared error types)

pub mod convert;
pub mod error;
pub mod hru;
pub mod siminfo;

// Re-exports: nice ergonomics for downstream crates
pub use convert::*;
pub use error::{CoreError, CoreResult};
pub use hru::{Hru, LandCover, SlopeClass, SoilGroup};
pub use siminfo::{MINUTES_PER_DAY, SimInfo, UnitSystem, parse_timestamp};
