//! Batch execution across an HRU set.

use std::collections::BTreeMap;

use gf_core::{Hru, SimInfo};
use gf_forcing::ForcingBundle;
use gf_params::ParamTables;
use tracing::debug;

use crate::outcome::HruOutcome;
use crate::runner::{RunnerResult, run_hru};
use crate::solver::RunoffSolver;

/// Outcome per HRU, in code order.
pub type BatchResults = BTreeMap<Hru, HruOutcome>;

/// Run every requested HRU against one job's forcing.
///
/// Each HRU gets a freshly built bundle. A solver failure lands in that
/// HRU's outcome and the batch keeps going; only configuration problems
/// (unknown HRU, misaligned forcing) abort the whole batch.
pub fn run_batch<S: RunoffSolver + ?Sized>(
    solver: &S,
    forcing: &ForcingBundle,
    info: &SimInfo,
    hrus: &[Hru],
    tables: &ParamTables,
) -> RunnerResult<BatchResults> {
    let mut results = BatchResults::new();
    for &hru in hrus {
        let outcome = run_hru(solver, hru, forcing, info, tables)?;
        if let HruOutcome::Failure { message, .. } = &outcome {
            debug!(%hru, %message, "hru run failed");
        }
        results.insert(hru, outcome);
    }
    Ok(results)
}
