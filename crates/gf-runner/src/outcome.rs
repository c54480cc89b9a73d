//! Per-HRU result sum type.

use std::error::Error;

use crate::solver::SolverError;

/// Output series and solver warnings for one successful HRU run. All three
/// series have the window's step count; outputs the solver did not populate
/// are all-zero.
#[derive(Debug, Clone, PartialEq)]
pub struct HruSuccess {
    pub surface_runoff: Vec<f64>,
    pub groundwater_outflow: Vec<f64>,
    pub interflow: Vec<f64>,
    pub messages: Vec<String>,
}

/// What one HRU run produced: series, or a captured failure. Failures carry
/// a one-line message plus the full error chain so they can be persisted
/// and inspected later.
#[derive(Debug, Clone, PartialEq)]
pub enum HruOutcome {
    Success(HruSuccess),
    Failure { message: String, detail: String },
}

impl HruOutcome {
    pub fn failure_from(err: &SolverError) -> Self {
        let mut detail = format!("{err:?}");
        let mut source = err.source();
        while let Some(cause) = source {
            detail.push_str("\ncaused by: ");
            detail.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::Failure {
            message: err.to_string(),
            detail,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, HruOutcome::Failure { .. })
    }

    pub fn success(&self) -> Option<&HruSuccess> {
        match self {
            HruOutcome::Success(ok) => Some(ok),
            HruOutcome::Failure { .. } => None,
        }
    }
}
