//! Per-run solver input bundles.
//!
//! The solver consumes one flat bundle of equal-length series: the shared
//! forcing plus every static parameter broadcast to a constant series, the
//! shape the solver's time loop expects. Each HRU run builds a fresh bundle
//! from the shared forcing, so a solver may mutate its bundle freely
//! without corrupting sibling runs.

use gf_forcing::ForcingBundle;
use gf_params::{ImperviousParams, PerviousParams};

/// Inputs and output slots for one pervious HRU run.
#[derive(Debug, Clone, PartialEq)]
pub struct PerviousBundle {
    pub steps: usize,
    pub precip: Vec<f64>,
    pub pet: Vec<f64>,
    pub agwrc: Vec<f64>,
    pub cepsc: Vec<f64>,
    pub deepfr: Vec<f64>,
    pub infilt: Vec<f64>,
    pub intfw: Vec<f64>,
    pub irc: Vec<f64>,
    pub kvary: Vec<f64>,
    pub lzetp: Vec<f64>,
    pub lzsn: Vec<f64>,
    pub nsur: Vec<f64>,
    pub uzsn: Vec<f64>,
    pub surface_runoff: Option<Vec<f64>>,
    pub interflow: Option<Vec<f64>>,
    pub groundwater: Option<Vec<f64>>,
}

impl PerviousBundle {
    pub fn build(forcing: &ForcingBundle, params: &PerviousParams) -> Self {
        let steps = forcing.steps();
        let broadcast = |v: f64| vec![v; steps];
        Self {
            steps,
            precip: forcing.precip.clone(),
            pet: forcing.pet.clone(),
            agwrc: broadcast(params.agwrc),
            cepsc: broadcast(params.cepsc),
            deepfr: broadcast(params.deepfr),
            infilt: broadcast(params.infilt),
            intfw: broadcast(params.intfw),
            irc: broadcast(params.irc),
            kvary: broadcast(params.kvary),
            lzetp: broadcast(params.lzetp),
            lzsn: broadcast(params.lzsn),
            nsur: broadcast(params.nsur),
            uzsn: broadcast(params.uzsn),
            surface_runoff: None,
            interflow: None,
            groundwater: None,
        }
    }
}

/// Inputs and output slots for one impervious HRU run.
#[derive(Debug, Clone, PartialEq)]
pub struct ImperviousBundle {
    pub steps: usize,
    pub precip: Vec<f64>,
    pub pet: Vec<f64>,
    pub nsur: Vec<f64>,
    pub retsc: Vec<f64>,
    pub surface_runoff: Option<Vec<f64>>,
    pub interflow: Option<Vec<f64>>,
    pub groundwater: Option<Vec<f64>>,
}

impl ImperviousBundle {
    pub fn build(forcing: &ForcingBundle, params: &ImperviousParams) -> Self {
        let steps = forcing.steps();
        Self {
            steps,
            precip: forcing.precip.clone(),
            pet: forcing.pet.clone(),
            nsur: vec![params.nsur; steps],
            retsc: vec![params.retsc; steps],
            surface_runoff: None,
            interflow: None,
            groundwater: None,
        }
    }
}
