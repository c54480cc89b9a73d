//! Single-HRU execution.

use gf_core::{Hru, SimInfo, round4};
use gf_forcing::ForcingBundle;
use gf_params::{ParamRow, ParamTables};
use thiserror::Error;

use crate::bundle::{ImperviousBundle, PerviousBundle};
use crate::outcome::{HruOutcome, HruSuccess};
use crate::solver::{RunoffSolver, SolverReport};

pub type RunnerResult<T> = Result<T, RunnerError>;

/// Problems with the run's configuration, as opposed to solver failures,
/// which are captured per HRU in the outcome.
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("HRU {hru} is not in the parameter tables")]
    UnknownHru { hru: String },

    #[error("Forcing bundle has {actual} steps; the window requires {expected}")]
    StepMismatch { expected: usize, actual: usize },
}

/// Run one HRU against the shared forcing.
///
/// Builds a fresh bundle, dispatches to the family's solver entry point,
/// and normalizes what comes back: outputs rounded to storage precision,
/// missing outputs zero-filled. Solver errors become a
/// [`HruOutcome::Failure`], not an `Err`.
pub fn run_hru<S: RunoffSolver + ?Sized>(
    solver: &S,
    hru: Hru,
    forcing: &ForcingBundle,
    info: &SimInfo,
    tables: &ParamTables,
) -> RunnerResult<HruOutcome> {
    if forcing.steps() != info.steps {
        return Err(RunnerError::StepMismatch {
            expected: info.steps,
            actual: forcing.steps(),
        });
    }
    let row = tables.row(hru).ok_or_else(|| RunnerError::UnknownHru {
        hru: hru.to_string(),
    })?;
    let outcome = match row {
        ParamRow::Pervious(params) => {
            let mut bundle = PerviousBundle::build(forcing, &params);
            match solver.run_pervious(info, &mut bundle) {
                Ok(report) => finish(
                    info.steps,
                    bundle.surface_runoff,
                    bundle.groundwater,
                    bundle.interflow,
                    report,
                ),
                Err(err) => HruOutcome::failure_from(&err),
            }
        }
        ParamRow::Impervious(params) => {
            let mut bundle = ImperviousBundle::build(forcing, &params);
            match solver.run_impervious(info, &mut bundle) {
                Ok(report) => finish(
                    info.steps,
                    bundle.surface_runoff,
                    bundle.groundwater,
                    bundle.interflow,
                    report,
                ),
                Err(err) => HruOutcome::failure_from(&err),
            }
        }
    };
    Ok(outcome)
}

fn finish(
    steps: usize,
    surface: Option<Vec<f64>>,
    groundwater: Option<Vec<f64>>,
    interflow: Option<Vec<f64>>,
    report: SolverReport,
) -> HruOutcome {
    for (name, slot) in [
        ("surface_runoff", &surface),
        ("groundwater_outflow", &groundwater),
        ("interflow", &interflow),
    ] {
        if let Some(series) = slot
            && series.len() != steps
        {
            return HruOutcome::Failure {
                message: format!(
                    "solver produced {} {name} values for a {steps}-step window",
                    series.len()
                ),
                detail: String::new(),
            };
        }
    }
    let normalize = |slot: Option<Vec<f64>>| match slot {
        Some(series) => series.into_iter().map(round4).collect(),
        None => vec![0.0; steps],
    };
    HruOutcome::Success(HruSuccess {
        surface_runoff: normalize(surface),
        groundwater_outflow: normalize(groundwater),
        interflow: normalize(interflow),
        messages: report.messages,
    })
}
