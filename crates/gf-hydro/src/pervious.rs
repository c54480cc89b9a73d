//! Pervious land water budget.
//!
//! Storage chain per step: interception overflow splits between
//! infiltration (capacity shrinks as the lower zone wets up) and excess;
//! excess splits between interflow storage and surface detention; percolation
//! recharges the lower zone and groundwater; outflows drain by roughness
//! (surface) and daily recession constants (interflow, groundwater);
//! evapotranspiration draws down interception, the upper zone, and finally
//! an LZETP-limited share of the lower zone.

use gf_core::SimInfo;
use gf_runner::{PerviousBundle, SolverError, SolverReport, SolverResult};

use crate::guard;

struct State {
    ceps: f64,
    surs: f64,
    uzs: f64,
    lzs: f64,
    ifws: f64,
    agws: f64,
}

pub(crate) fn simulate(info: &SimInfo, b: &mut PerviousBundle) -> SolverResult<SolverReport> {
    let steps = b.steps;
    if steps == 0 {
        b.surface_runoff = Some(Vec::new());
        b.interflow = Some(Vec::new());
        b.groundwater = Some(Vec::new());
        return Ok(SolverReport::default());
    }
    validate(b)?;

    let hours = f64::from(info.delt_minutes) / 60.0;
    let mut st = State {
        ceps: 0.0,
        surs: 0.0,
        uzs: 0.1 * b.uzsn[0],
        lzs: 0.5 * b.lzsn[0],
        ifws: 0.0,
        agws: 0.02,
    };
    let mut suro = vec![0.0; steps];
    let mut ifwo = vec![0.0; steps];
    let mut agwo = vec![0.0; steps];
    let mut clamped_pet = 0_usize;

    for i in 0..steps {
        let prec = b.precip[i];
        let pet = if b.pet[i] < 0.0 {
            clamped_pet += 1;
            0.0
        } else {
            b.pet[i]
        };

        // interception
        st.ceps += prec;
        let throughfall = (st.ceps - b.cepsc[i]).max(0.0);
        st.ceps -= throughfall;

        // infiltration capacity shrinks as the lower zone fills
        let lzrat = st.lzs / b.lzsn[i];
        let capacity = b.infilt[i] * hours / (1.0 + lzrat);
        let infiltrated = throughfall.min(capacity);
        let excess = throughfall - infiltrated;

        // interflow claims its share of the excess, the rest ponds
        let ifw_share = b.intfw[i] / (1.0 + b.intfw[i]);
        st.ifws += excess * ifw_share;
        st.surs += excess * (1.0 - ifw_share);

        // upper zone holds infiltrated water until it percolates
        st.uzs += infiltrated;
        let uzrat = st.uzs / b.uzsn[i];
        let perc = if uzrat > 1.0 {
            st.uzs - b.uzsn[i]
        } else {
            0.1 * b.infilt[i] * hours * uzrat * uzrat
        }
        .min(st.uzs);
        st.uzs -= perc;

        // recharge split steepens as the lower zone fills; DEEPFR of the
        // groundwater share is lost to the deep aquifer
        let to_ground = perc * lzrat.min(1.0);
        st.lzs += perc - to_ground;
        st.agws += to_ground * (1.0 - b.deepfr[i]);

        // outflows: surface release slows with roughness, interflow and
        // groundwater drain by daily recession constants
        let suro_now = st.surs * hours / (hours + b.nsur[i]);
        st.surs -= suro_now;

        let ifw_k = b.irc[i].powf(hours / 24.0);
        let ifwo_now = st.ifws * (1.0 - ifw_k);
        st.ifws -= ifwo_now;

        let agw_k = b.agwrc[i].powf(hours / 24.0);
        let linear = st.agws * (1.0 - agw_k);
        let agwo_now = (linear * (1.0 + b.kvary[i] * st.agws)).min(st.agws);
        st.agws -= agwo_now;

        // staged evapotranspiration
        let mut demand = pet;
        let from_ceps = demand.min(st.ceps);
        st.ceps -= from_ceps;
        demand -= from_ceps;
        let from_uzs = demand.min(st.uzs);
        st.uzs -= from_uzs;
        demand -= from_uzs;
        let from_lzs = (demand * b.lzetp[i]).min(st.lzs);
        st.lzs -= from_lzs;

        if !(suro_now.is_finite() && ifwo_now.is_finite() && agwo_now.is_finite()) {
            return Err(SolverError::NonFinite {
                what: "outflow",
                step: i,
            });
        }
        suro[i] = suro_now;
        ifwo[i] = ifwo_now;
        agwo[i] = agwo_now;
    }

    b.surface_runoff = Some(suro);
    b.interflow = Some(ifwo);
    b.groundwater = Some(agwo);

    let mut report = SolverReport::default();
    if clamped_pet > 0 {
        report
            .messages
            .push(format!("clamped {clamped_pet} negative PET values to zero"));
    }
    Ok(report)
}

fn validate(b: &PerviousBundle) -> SolverResult<()> {
    guard::positive("INFILT", b.infilt[0])?;
    guard::positive("LZSN", b.lzsn[0])?;
    guard::positive("UZSN", b.uzsn[0])?;
    guard::positive("NSUR", b.nsur[0])?;
    guard::recession("AGWRC", b.agwrc[0])?;
    guard::recession("IRC", b.irc[0])?;
    guard::fraction("DEEPFR", b.deepfr[0])?;
    guard::fraction("LZETP", b.lzetp[0])?;
    guard::non_negative("CEPSC", b.cepsc[0])?;
    guard::non_negative("INTFW", b.intfw[0])?;
    guard::non_negative("KVARY", b.kvary[0])?;
    Ok(())
}
