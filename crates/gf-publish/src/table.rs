//! Columnar artifact rendering.
//!
//! No parquet writer is carried here; the artifact is a CSV table with the
//! run identity repeated as constant trailing columns. The store contract is
//! format-agnostic, so a parquet renderer could replace this one without
//! touching the publisher.

use gf_core::{Hru, SimInfo};
use gf_runner::HruSuccess;

pub const TABLE_CONTENT_TYPE: &str = "text/csv";

pub const TABLE_HEADER: &str =
    "step,surface_runoff,groundwater_outflow,interflow,model,gridcell,hru,units";

/// Render one successful HRU run, one row per step. Floats print in their
/// shortest form, so zero samples render as `0`. The three series are
/// zipped, so a row exists only where every series has a sample; the runner
/// hands this function equal-length series.
pub fn render_table(info: &SimInfo, hru: Hru, success: &HruSuccess) -> String {
    let code = hru.code();
    let units = info.units.flag();
    let model = &info.model;
    let gridcell = &info.gridcell;

    let rows = success
        .surface_runoff
        .iter()
        .zip(&success.groundwater_outflow)
        .zip(&success.interflow);
    let mut out = String::new();
    out.push_str(TABLE_HEADER);
    out.push('\n');
    for (step, ((suro, agwo), ifwo)) in rows.enumerate() {
        out.push_str(&format!(
            "{step},{suro},{agwo},{ifwo},{model},{gridcell},{code},{units}\n"
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use gf_core::parse_timestamp;

    fn three_step_info() -> SimInfo {
        SimInfo::new(
            parse_timestamp("2001-07-04").unwrap(),
            parse_timestamp("2001-07-05").unwrap(),
            480,
            "HIS",
            "R17C42",
        )
        .unwrap()
    }

    #[test]
    fn rows_carry_series_and_constant_identity_columns() {
        let success = HruSuccess {
            surface_runoff: vec![0.0, 0.1234, 2.5],
            groundwater_outflow: vec![0.0, 0.0, 0.0625],
            interflow: vec![1.0, 0.0, 0.0001],
            messages: Vec::new(),
        };
        let table = render_table(&three_step_info(), "hru000".parse().unwrap(), &success);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], TABLE_HEADER);
        assert_eq!(lines[1], "0,0,0,1,HIS,R17C42,hru000,1");
        assert_eq!(lines[2], "1,0.1234,0,0,HIS,R17C42,hru000,1");
        assert_eq!(lines[3], "2,2.5,0.0625,0.0001,HIS,R17C42,hru000,1");
    }

    #[test]
    fn unequal_series_render_only_complete_rows() {
        let success = HruSuccess {
            surface_runoff: vec![0.5, 0.25, 0.125],
            groundwater_outflow: vec![0.0],
            interflow: vec![0.0, 0.0],
            messages: Vec::new(),
        };
        let table = render_table(&three_step_info(), "hru000".parse().unwrap(), &success);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "0,0.5,0,0,HIS,R17C42,hru000,1");
    }

    #[test]
    fn empty_window_renders_header_only() {
        let success = HruSuccess {
            surface_runoff: Vec::new(),
            groundwater_outflow: Vec::new(),
            interflow: Vec::new(),
            messages: Vec::new(),
        };
        let table = render_table(&three_step_info(), "hru250".parse().unwrap(), &success);
        assert_eq!(table, format!("{TABLE_HEADER}\n"));
    }
}
