//! Forcing bundle assembly.

use gf_core::{SimInfo, mm_to_inch};

use crate::evap::{EvapSource, build_evap_series};
use crate::{ForcingError, ForcingResult};

/// The two aligned series every solver run consumes, in inches per step.
#[derive(Debug, Clone, PartialEq)]
pub struct ForcingBundle {
    pub precip: Vec<f64>,
    pub pet: Vec<f64>,
}

impl ForcingBundle {
    pub fn steps(&self) -> usize {
        self.precip.len()
    }
}

/// Convert raw precipitation (mm per step) and build the PET series.
///
/// The precipitation record defines the window's step count and must match
/// it exactly; the PET builder produces a matching-length series by
/// construction.
pub fn assemble(
    precip_mm: &[f64],
    source: EvapSource<'_>,
    info: &SimInfo,
) -> ForcingResult<ForcingBundle> {
    if precip_mm.len() != info.steps {
        return Err(ForcingError::SeriesLength {
            name: "prec",
            expected: info.steps,
            actual: precip_mm.len(),
        });
    }
    let precip = precip_mm.iter().copied().map(mm_to_inch).collect();
    let pet = build_evap_series(info, source)?;
    Ok(ForcingBundle { precip, pet })
}
