//! Shared fixtures for this crate's tests.

use gf_core::{SimInfo, parse_timestamp};
use gf_forcing::ForcingBundle;

use crate::bundle::{ImperviousBundle, PerviousBundle};
use crate::solver::{RunoffSolver, SolverError, SolverReport, SolverResult};

pub(crate) fn test_info(days: i64) -> SimInfo {
    let start = parse_timestamp("1970-01-01").unwrap();
    SimInfo::hourly(start, start + chrono::Duration::days(days), "HIS", "R17C42").unwrap()
}

pub(crate) fn test_forcing(steps: usize) -> ForcingBundle {
    ForcingBundle {
        precip: vec![0.05; steps],
        pet: vec![0.004; steps],
    }
}

/// Fills surface runoff with a constant; fails when INFILT (pervious) or
/// RETSC (impervious) is negative, the way a real solver rejects a bad
/// parameter row.
pub(crate) struct StubSolver {
    pub fill: f64,
}

impl RunoffSolver for StubSolver {
    fn run_pervious(
        &self,
        _info: &SimInfo,
        bundle: &mut PerviousBundle,
    ) -> SolverResult<SolverReport> {
        if bundle.infilt[0] < 0.0 {
            return Err(SolverError::InvalidParameter {
                name: "INFILT",
                value: bundle.infilt[0],
                reason: "must be positive",
            });
        }
        bundle.surface_runoff = Some(vec![self.fill; bundle.steps]);
        bundle.interflow = Some(vec![self.fill / 2.0; bundle.steps]);
        Ok(SolverReport::default())
    }

    fn run_impervious(
        &self,
        _info: &SimInfo,
        bundle: &mut ImperviousBundle,
    ) -> SolverResult<SolverReport> {
        if bundle.retsc[0] < 0.0 {
            return Err(SolverError::InvalidParameter {
                name: "RETSC",
                value: bundle.retsc[0],
                reason: "must be positive",
            });
        }
        bundle.surface_runoff = Some(vec![self.fill; bundle.steps]);
        Ok(SolverReport::with_messages(vec!["note".to_string()]))
    }
}
