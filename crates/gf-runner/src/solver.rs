//! The external-solver contract.

use gf_core::SimInfo;
use thiserror::Error;

use crate::bundle::{ImperviousBundle, PerviousBundle};

pub type SolverResult<T> = Result<T, SolverError>;

/// Errors a solver implementation may raise for a single HRU run.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Parameter {name} = {value} is invalid: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Non-finite {what} at step {step}")]
    NonFinite { what: &'static str, step: usize },

    #[error("{0}")]
    Other(String),
}

/// Bookkeeping a solver hands back on success. `messages` are warnings
/// worth persisting alongside the results, not errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverReport {
    pub messages: Vec<String>,
}

impl SolverReport {
    pub fn with_messages(messages: Vec<String>) -> Self {
        Self { messages }
    }
}

/// One entry point per physics family. Implementations fill the bundle's
/// output slots in place; which slots they populate is up to them, and
/// unfilled slots read as all-zero series downstream.
pub trait RunoffSolver: Send + Sync {
    fn run_pervious(&self, info: &SimInfo, bundle: &mut PerviousBundle)
    -> SolverResult<SolverReport>;

    fn run_impervious(
        &self,
        info: &SimInfo,
        bundle: &mut ImperviousBundle,
    ) -> SolverResult<SolverReport>;
}
