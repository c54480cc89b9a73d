//! gf-hydro: built-in storage-routing runoff solver.
//!
//! A compact stand-in for the full hydrology library the engine is
//! normally wired to. Water moves through a chain of storages (interception,
//! surface detention, upper and lower soil zones, interflow, groundwater)
//! with recession-constant outflows, which reproduces the response shape
//! the dispatch pipeline cares about: rain in, lagged runoff out, solver
//! failures on nonsense parameters.
//!
//! The engine crates only ever see [`gf_runner::RunoffSolver`]; swapping
//! this crate for a different solver touches nothing else.

mod impervious;
mod pervious;

use gf_core::SimInfo;
use gf_runner::{ImperviousBundle, PerviousBundle, RunoffSolver, SolverReport, SolverResult};

/// Storage-routing implementation of both physics families.
#[derive(Debug, Clone, Copy, Default)]
pub struct StorageSolver;

impl RunoffSolver for StorageSolver {
    fn run_pervious(
        &self,
        info: &SimInfo,
        bundle: &mut PerviousBundle,
    ) -> SolverResult<SolverReport> {
        pervious::simulate(info, bundle)
    }

    fn run_impervious(
        &self,
        info: &SimInfo,
        bundle: &mut ImperviousBundle,
    ) -> SolverResult<SolverReport> {
        impervious::simulate(info, bundle)
    }
}

/// Parameter guards shared by both families.
pub(crate) mod guard {
    use gf_runner::{SolverError, SolverResult};

    pub fn positive(name: &'static str, value: f64) -> SolverResult<f64> {
        if value > 0.0 && value.is_finite() {
            Ok(value)
        } else {
            Err(SolverError::InvalidParameter {
                name,
                value,
                reason: "must be positive",
            })
        }
    }

    pub fn non_negative(name: &'static str, value: f64) -> SolverResult<f64> {
        if value >= 0.0 && value.is_finite() {
            Ok(value)
        } else {
            Err(SolverError::InvalidParameter {
                name,
                value,
                reason: "must not be negative",
            })
        }
    }

    /// Daily recession constants live in (0, 1].
    pub fn recession(name: &'static str, value: f64) -> SolverResult<f64> {
        if value > 0.0 && value <= 1.0 {
            Ok(value)
        } else {
            Err(SolverError::InvalidParameter {
                name,
                value,
                reason: "must lie in (0, 1]",
            })
        }
    }

    /// Dimensionless fractions live in [0, 1].
    pub fn fraction(name: &'static str, value: f64) -> SolverResult<f64> {
        if (0.0..=1.0).contains(&value) {
            Ok(value)
        } else {
            Err(SolverError::InvalidParameter {
                name,
                value,
                reason: "must lie in [0, 1]",
            })
        }
    }
}
