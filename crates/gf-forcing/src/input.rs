//! Per-cell input document schema.

use chrono::Duration;
use gf_core::{SimInfo, parse_timestamp};
use serde::Deserialize;
use serde_json::Value;

use crate::ForcingResult;

/// A numeric series as the documents store it: values under a `data` key.
#[derive(Debug, Clone, Deserialize)]
pub struct Series {
    pub data: Vec<f64>,
}

/// One grid cell's climate input file.
///
/// `prec` is the hourly precipitation record in mm. `end_time` names the
/// final day that has data; the simulation window runs through that day's
/// last hour. An optional `petinp` carries a daily PET series in mm/day for
/// producers that supply their own instead of relying on normals.
#[derive(Debug, Clone, Deserialize)]
pub struct InputDocument {
    pub start_time: String,
    pub end_time: String,
    pub prec: Series,
    #[serde(default)]
    pub petinp: Option<Series>,
}

impl InputDocument {
    pub fn from_value(value: Value) -> ForcingResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Hourly precipitation in mm.
    pub fn prec_mm(&self) -> &[f64] {
        &self.prec.data
    }

    /// Daily PET in mm/day, when the producer bundled one.
    pub fn petinp_mm(&self) -> Option<&[f64]> {
        self.petinp.as_ref().map(|series| series.data.as_slice())
    }

    /// Simulation window this document names: `start_time` through the last
    /// hour of `end_time`'s day.
    pub fn window(&self, model: &str, gridcell: &str) -> ForcingResult<SimInfo> {
        let start = parse_timestamp(&self.start_time)?;
        let stop = parse_timestamp(&self.end_time)? + Duration::hours(23);
        Ok(SimInfo::hourly(start, stop, model, gridcell)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::ForcingError;

    use super::*;

    #[test]
    fn parses_minimal_document() {
        let doc = InputDocument::from_value(json!({
            "start_time": "1970-01-01 00:00:00",
            "end_time": "1970-01-10 00:00:00",
            "prec": {"data": [0.0, 1.5, 0.25]},
        }))
        .unwrap();
        assert_eq!(doc.prec_mm().len(), 3);
        assert!(doc.petinp_mm().is_none());
    }

    #[test]
    fn ignores_unrelated_fields() {
        let doc = InputDocument::from_value(json!({
            "start_time": "1970-01-01",
            "end_time": "1970-01-02",
            "prec": {"data": [0.0], "units": "mm"},
            "source": "WRF-NARR",
        }))
        .unwrap();
        assert_eq!(doc.prec_mm().len(), 1);
    }

    #[test]
    fn missing_series_is_an_error() {
        let err = InputDocument::from_value(json!({
            "start_time": "1970-01-01",
            "end_time": "1970-01-02",
        }))
        .unwrap_err();
        assert!(err.to_string().contains("prec"));
    }

    #[test]
    fn bare_array_without_a_data_key_is_an_error() {
        let err = InputDocument::from_value(json!({
            "start_time": "1970-01-01",
            "end_time": "1970-01-02",
            "prec": [0.0, 1.5],
        }))
        .unwrap_err();
        assert!(matches!(err, ForcingError::BadDocument(_)));
    }

    #[test]
    fn window_extends_end_day_to_its_last_hour() {
        let doc = InputDocument::from_value(json!({
            "start_time": "1970-01-01 00:00:00",
            "end_time": "1970-01-10 00:00:00",
            "prec": {"data": []},
        }))
        .unwrap();
        let info = doc.window("WRF-NARR_HIS", "R17C42").unwrap();
        assert_eq!(info.stop, parse_timestamp("1970-01-10 23:00:00").unwrap());
        // nine whole days once the trailing partial day is dropped
        assert_eq!(info.steps, 216);
        assert_eq!(info.model, "WRF-NARR_HIS");
        assert_eq!(info.gridcell, "R17C42");
    }
}
