//! Impervious land water budget: retention storage with roughness-delayed
//! overflow. Only surface runoff leaves an impervious parcel; the other
//! output slots stay unpopulated.

use gf_core::SimInfo;
use gf_runner::{ImperviousBundle, SolverError, SolverReport, SolverResult};

use crate::guard;

pub(crate) fn simulate(info: &SimInfo, b: &mut ImperviousBundle) -> SolverResult<SolverReport> {
    let steps = b.steps;
    if steps == 0 {
        b.surface_runoff = Some(Vec::new());
        return Ok(SolverReport::default());
    }
    guard::positive("RETSC", b.retsc[0])?;
    guard::positive("NSUR", b.nsur[0])?;

    let hours = f64::from(info.delt_minutes) / 60.0;
    let mut rets = 0.0_f64;
    let mut surs = 0.0_f64;
    let mut suro = vec![0.0; steps];
    let mut clamped_pet = 0_usize;

    for i in 0..steps {
        let pet = if b.pet[i] < 0.0 {
            clamped_pet += 1;
            0.0
        } else {
            b.pet[i]
        };

        rets += b.precip[i];
        let overflow = (rets - b.retsc[i]).max(0.0);
        rets -= overflow;
        surs += overflow;

        let suro_now = surs * hours / (hours + b.nsur[i]);
        surs -= suro_now;

        let evaporated = pet.min(rets);
        rets -= evaporated;

        if !suro_now.is_finite() {
            return Err(SolverError::NonFinite {
                what: "surface runoff",
                step: i,
            });
        }
        suro[i] = suro_now;
    }

    b.surface_runoff = Some(suro);

    let mut report = SolverReport::default();
    if clamped_pet > 0 {
        report
            .messages
            .push(format!("clamped {clamped_pet} negative PET values to zero"));
    }
    Ok(report)
}
