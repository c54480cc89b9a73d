//! gf-runner: per-HRU simulation dispatch.
//!
//! The runoff solver itself is an external collaborator; this crate owns
//! the contract ([`RunoffSolver`]), the per-run input bundles, and the
//! isolation boundary: one HRU's failure is captured as data and never
//! aborts its siblings.

pub mod batch;
pub mod bundle;
pub mod outcome;
pub mod runner;
pub mod solver;

#[cfg(test)]
mod testutil;

pub use batch::{BatchResults, run_batch};
pub use bundle::{ImperviousBundle, PerviousBundle};
pub use outcome::{HruOutcome, HruSuccess};
pub use runner::{RunnerError, RunnerResult, run_hru};
pub use solver::{RunoffSolver, SolverError, SolverReport, SolverResult};
